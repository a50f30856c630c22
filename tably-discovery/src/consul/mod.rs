mod registry;

pub use registry::ConsulRegistry;

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsulConfig {
    pub addr: String,
    pub timeout: Duration,
    pub protocol: String,
    pub token: Option<String>,
}

impl Default for ConsulConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8500".to_string(),
            timeout: Duration::from_secs(30),
            protocol: "http".to_string(),
            token: None,
        }
    }
}

impl ConsulConfig {
    /// Build a config from an agent address such as "127.0.0.1:8500" or
    /// "http://consul:8500".
    pub fn with_addr(addr: impl Into<String>) -> Self {
        let addr = addr.into();
        match addr.split_once("://") {
            Some((protocol, rest)) => Self {
                addr: rest.to_string(),
                protocol: protocol.to_string(),
                ..Default::default()
            },
            None => Self {
                addr,
                ..Default::default()
            },
        }
    }

    pub fn url(&self) -> String {
        format!("{}://{}", self.protocol, self.addr)
    }

    pub async fn check_health(&self) -> bool {
        let client = reqwest::Client::new();
        match client
            .get(format!("{}/v1/status/leader", self.url()))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct AgentService {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "Port")]
    pub port: u16,
    #[serde(rename = "Check")]
    pub check: AgentCheck,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct AgentCheck {
    #[serde(rename = "HTTP")]
    pub http: String,
    #[serde(rename = "Interval")]
    pub interval: String,
    #[serde(rename = "Timeout")]
    pub timeout: String,
    #[serde(rename = "DeregisterCriticalServiceAfter")]
    pub deregister_critical_service_after: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct HealthEntry {
    #[serde(rename = "Node")]
    pub node: HealthNode,
    #[serde(rename = "Service")]
    pub service: HealthService,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct HealthNode {
    #[serde(rename = "Address")]
    pub address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct HealthService {
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "Port")]
    pub port: u16,
}

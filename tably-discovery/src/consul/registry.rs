use async_trait::async_trait;
use tably_core::{Result, TablyErr};

use super::{AgentCheck, AgentService, ConsulConfig, HealthEntry};
use crate::registry::{Registration, Registry};

/// Registry backed by a Consul agent. Registration attaches an HTTP health
/// check so the agent evicts instances that stop answering; resolution only
/// returns instances whose checks are passing.
#[derive(Clone)]
pub struct ConsulRegistry {
    client: reqwest::Client,
    config: ConsulConfig,
}

impl ConsulRegistry {
    pub async fn new(config: ConsulConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TablyErr::transport(e.to_string()))?;

        // fail fast when the agent is unreachable
        let resp = client
            .get(format!("{}/v1/status/leader", config.url()))
            .send()
            .await
            .map_err(|e| TablyErr::registration(format!("consul unreachable: {e}")))?;
        if !resp.status().is_success() {
            return Err(TablyErr::registration(format!(
                "consul status check returned {}",
                resp.status()
            )));
        }

        Ok(Self { client, config })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut req = self
            .client
            .request(method, format!("{}{}", self.config.url(), path));
        if let Some(token) = &self.config.token {
            req = req.header("X-Consul-Token", token);
        }
        req
    }
}

#[async_trait]
impl Registry for ConsulRegistry {
    async fn register(&self, registration: Registration) -> Result<()> {
        let service = AgentService {
            id: registration.id.clone(),
            name: registration.name.clone(),
            address: registration.address.clone(),
            port: registration.port,
            check: AgentCheck {
                http: format!(
                    "http://{}{}",
                    registration.host_port(),
                    registration.health_path
                ),
                interval: "10s".to_string(),
                timeout: "2s".to_string(),
                deregister_critical_service_after: "24h".to_string(),
            },
        };

        let resp = self
            .request(reqwest::Method::PUT, "/v1/agent/service/register")
            .json(&service)
            .send()
            .await
            .map_err(|e| TablyErr::registration(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(TablyErr::registration(format!(
                "consul register returned {}",
                resp.status()
            )));
        }

        log::info!(
            "registered {} as {} at {} with consul",
            registration.name,
            registration.id,
            registration.host_port()
        );
        Ok(())
    }

    async fn deregister(&self, instance_id: &str, _service_name: &str) -> Result<()> {
        let resp = self
            .request(
                reqwest::Method::PUT,
                &format!("/v1/agent/service/deregister/{instance_id}"),
            )
            .send()
            .await
            .map_err(|e| TablyErr::transport(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(TablyErr::transport(format!(
                "consul deregister returned {}",
                resp.status()
            )));
        }
        log::info!("deregistered {} from consul", instance_id);
        Ok(())
    }

    async fn resolve(&self, service_name: &str) -> Result<Vec<String>> {
        let resp = self
            .request(
                reqwest::Method::GET,
                &format!("/v1/health/service/{service_name}?passing=true"),
            )
            .send()
            .await
            .map_err(|e| TablyErr::transport(format!("consul query failed: {e}")))?;
        if !resp.status().is_success() {
            return Err(TablyErr::transport(format!(
                "consul query returned {}",
                resp.status()
            )));
        }

        let entries: Vec<HealthEntry> = resp
            .json()
            .await
            .map_err(|e| TablyErr::decode(format!("consul response: {e}")))?;
        if entries.is_empty() {
            return Err(TablyErr::not_found(format!(
                "no passing instances of {service_name}"
            )));
        }

        let addrs = entries
            .into_iter()
            .map(|entry| {
                // agents may register without a service address; fall back to
                // the node address
                let host = if entry.service.address.is_empty() {
                    entry.node.address
                } else {
                    entry.service.address
                };
                format!("{}:{}", host, entry.service.port)
            })
            .collect();
        Ok(addrs)
    }

    async fn report_healthy(&self, instance_id: &str, _service_name: &str) -> Result<()> {
        self.request(
            reqwest::Method::PUT,
            &format!("/v1/agent/check/pass/service:{instance_id}"),
        )
        .send()
        .await
        .map_err(|e| TablyErr::transport(e.to_string()))?
        .error_for_status()
        .map_err(|e| TablyErr::transport(e.to_string()))?;
        Ok(())
    }
}

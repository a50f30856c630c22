use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tably_core::Result;
use uuid::Uuid;

/// Service registry contract. Implementations map logical service names to
/// live `host:port` addresses; the backing directory may be an in-process map
/// or an external agent.
#[async_trait]
pub trait Registry: Send + Sync {
    /// Make an instance resolvable under its service name. Best-effort on
    /// retry: registering the same instance ID again replaces its address.
    async fn register(&self, registration: Registration) -> Result<()>;

    /// Remove one instance. Callers on a shutdown path treat failure as
    /// best-effort and proceed.
    async fn deregister(&self, instance_id: &str, service_name: &str) -> Result<()>;

    /// All currently known addresses for a service, in registration order.
    /// A service with zero live addresses reports `NotFound`, the same as an
    /// unknown service.
    async fn resolve(&self, service_name: &str) -> Result<Vec<String>>;

    /// Optional liveness signal; a no-op is a valid implementation.
    async fn report_healthy(&self, instance_id: &str, service_name: &str) -> Result<()>;
}

/// Everything a registry needs to make one service instance resolvable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub id: String,
    pub name: String,
    pub address: String,
    pub port: u16,
    /// Path probed by directory-side health checks, e.g. "/healthz".
    pub health_path: String,
}

impl Registration {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
        port: u16,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: address.into(),
            port,
            health_path: "/healthz".to_string(),
        }
    }

    pub fn with_health_path(mut self, path: impl Into<String>) -> Self {
        self.health_path = path.into();
        self
    }

    pub fn host_port(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

/// Instance IDs are the service name plus a generated unique suffix.
pub fn generate_instance_id(service_name: &str) -> String {
    format!("{}-{}", service_name, Uuid::new_v4())
}

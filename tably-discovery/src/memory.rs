use async_trait::async_trait;
use dashmap::DashMap;
use tably_core::{Result, TablyErr};

use crate::registry::{Registration, Registry};

/// In-process registry backed by a concurrent map. Registration order is
/// preserved per service. There is no health eviction; instances disappear
/// only through explicit deregistration.
#[derive(Clone, Default)]
pub struct MemoryRegistry {
    services: std::sync::Arc<DashMap<String, Vec<(String, String)>>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Registry for MemoryRegistry {
    async fn register(&self, registration: Registration) -> Result<()> {
        let mut entry = self.services.entry(registration.name.clone()).or_default();
        let host_port = registration.host_port();
        // re-registering an instance replaces its address instead of
        // duplicating it
        if let Some(existing) = entry.iter_mut().find(|(id, _)| *id == registration.id) {
            existing.1 = host_port;
        } else {
            entry.push((registration.id.clone(), host_port));
        }
        log::info!(
            "registered {} as {} at {}",
            registration.name,
            registration.id,
            registration.host_port()
        );
        Ok(())
    }

    async fn deregister(&self, instance_id: &str, service_name: &str) -> Result<()> {
        if let Some(mut entry) = self.services.get_mut(service_name) {
            entry.retain(|(id, _)| id != instance_id);
        }
        log::info!("deregistered {} from {}", instance_id, service_name);
        Ok(())
    }

    async fn resolve(&self, service_name: &str) -> Result<Vec<String>> {
        let addrs: Vec<String> = self
            .services
            .get(service_name)
            .map(|entry| entry.iter().map(|(_, addr)| addr.clone()).collect())
            .unwrap_or_default();
        if addrs.is_empty() {
            return Err(TablyErr::not_found(format!(
                "no addresses for service {service_name}"
            )));
        }
        Ok(addrs)
    }

    async fn report_healthy(&self, _instance_id: &str, _service_name: &str) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::generate_instance_id;

    #[tokio::test]
    async fn register_then_resolve() {
        let registry = MemoryRegistry::new();
        registry
            .register(Registration::new("m-1", "metadata", "10.0.0.1", 9000))
            .await
            .unwrap();

        let addrs = registry.resolve("metadata").await.unwrap();
        assert_eq!(addrs, vec!["10.0.0.1:9000".to_string()]);
    }

    #[tokio::test]
    async fn unknown_service_is_not_found() {
        let registry = MemoryRegistry::new();
        assert!(matches!(
            registry.resolve("unknown").await,
            Err(TablyErr::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn deregistered_service_is_not_found() {
        let registry = MemoryRegistry::new();
        let id = generate_instance_id("review");
        registry
            .register(Registration::new(&id, "review", "127.0.0.1", 8083))
            .await
            .unwrap();
        registry.deregister(&id, "review").await.unwrap();

        // zero live addresses is the same condition as unknown
        assert!(matches!(
            registry.resolve("review").await,
            Err(TablyErr::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn addresses_keep_registration_order() {
        let registry = MemoryRegistry::new();
        registry
            .register(Registration::new("m-1", "metadata", "10.0.0.1", 9000))
            .await
            .unwrap();
        registry
            .register(Registration::new("m-2", "metadata", "10.0.0.2", 9000))
            .await
            .unwrap();

        let addrs = registry.resolve("metadata").await.unwrap();
        assert_eq!(addrs, vec!["10.0.0.1:9000", "10.0.0.2:9000"]);
    }

    #[tokio::test]
    async fn reregistering_an_instance_replaces_its_address() {
        let registry = MemoryRegistry::new();
        registry
            .register(Registration::new("m-1", "metadata", "10.0.0.1", 9000))
            .await
            .unwrap();
        registry
            .register(Registration::new("m-1", "metadata", "10.0.0.1", 9001))
            .await
            .unwrap();

        let addrs = registry.resolve("metadata").await.unwrap();
        assert_eq!(addrs, vec!["10.0.0.1:9001"]);
    }

    #[tokio::test]
    async fn deregister_leaves_other_instances() {
        let registry = MemoryRegistry::new();
        registry
            .register(Registration::new("m-1", "metadata", "10.0.0.1", 9000))
            .await
            .unwrap();
        registry
            .register(Registration::new("m-2", "metadata", "10.0.0.2", 9000))
            .await
            .unwrap();
        registry.deregister("m-1", "metadata").await.unwrap();

        let addrs = registry.resolve("metadata").await.unwrap();
        assert_eq!(addrs, vec!["10.0.0.2:9000"]);
    }
}

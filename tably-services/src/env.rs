use std::sync::Arc;

use tably_discovery::{ConsulConfig, ConsulRegistry, MemoryRegistry, Registry};

pub fn var_or(key: &str, default: &str) -> String {
    std::env::var(key).ok().filter(|v| !v.is_empty()).unwrap_or_else(|| default.to_string())
}

pub fn port_or(default: u16) -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Consul-backed registry when `CONSUL_HTTP_ADDR` is set, otherwise the
/// in-process registry (single-process setups and tests).
pub async fn registry_from_env() -> anyhow::Result<Arc<dyn Registry>> {
    match std::env::var("CONSUL_HTTP_ADDR") {
        Ok(addr) if !addr.is_empty() => {
            let registry = ConsulRegistry::new(ConsulConfig::with_addr(addr)).await?;
            Ok(Arc::new(registry))
        }
        _ => {
            log::info!("CONSUL_HTTP_ADDR not set, using in-process registry");
            Ok(Arc::new(MemoryRegistry::new()))
        }
    }
}

use std::sync::Arc;

use tably_core::{Metadata, Result};
use tably_discovery::{ClientConfig, Registry, ServiceClient};

pub const METADATA_SERVICE: &str = "metadata";

/// Client for the metadata service. Error kinds pass through unchanged so
/// callers can tell NotFound from Resolution and Transport failures.
pub struct MetadataGateway {
    client: ServiceClient,
}

impl MetadataGateway {
    pub fn new(registry: Arc<dyn Registry>) -> Result<Self> {
        Ok(Self {
            client: ServiceClient::new(METADATA_SERVICE, registry)?,
        })
    }

    pub fn with_config(registry: Arc<dyn Registry>, config: ClientConfig) -> Result<Self> {
        Ok(Self {
            client: ServiceClient::with_config(METADATA_SERVICE, registry, config)?,
        })
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Metadata> {
        self.client.get_json(&format!("/metadata?id={id}")).await
    }

    pub async fn health(&self) -> Result<u16> {
        self.client.health().await
    }

    pub async fn resolved_base(&self) -> Result<String> {
        self.client.resolved_base().await
    }
}

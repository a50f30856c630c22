use std::future::Future;
use std::sync::Arc;

use log::{error, info};
use tokio::sync::oneshot;

use crate::registry::{generate_instance_id, Registration, Registry};

/// Service process configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Instance ID, unique per process.
    pub id: String,
    /// Logical service name other services resolve.
    pub name: String,
    pub host: String,
    pub port: u16,
    pub health_path: String,
}

impl AppConfig {
    pub fn new(name: &str, host: &str, port: u16) -> Self {
        Self {
            id: generate_instance_id(name),
            name: name.to_string(),
            host: host.to_string(),
            port,
            health_path: "/healthz".to_string(),
        }
    }
}

/// Runs one service process through its registry lifecycle: register, serve
/// until shutdown, deregister.
pub struct App {
    pub config: AppConfig,
    registry: Arc<dyn Registry>,
}

impl App {
    pub fn new(config: AppConfig, registry: Arc<dyn Registry>) -> Self {
        Self { config, registry }
    }

    /// Register the instance, run `serve_fn` until ctrl-c, then deregister.
    /// `serve_fn` receives a shutdown receiver it must honor for graceful
    /// termination. Deregistration failures are logged, never fatal: the
    /// shutdown path always completes.
    pub async fn run<F, Fut>(self, serve_fn: F) -> anyhow::Result<()>
    where
        F: FnOnce(oneshot::Receiver<()>) -> Fut,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let registration = Registration::new(
            self.config.id.clone(),
            self.config.name.clone(),
            self.config.host.clone(),
            self.config.port,
        )
        .with_health_path(self.config.health_path.clone());

        self.registry.register(registration).await?;
        info!(
            "{} listening on {}:{} as {}",
            self.config.name, self.config.host, self.config.port, self.config.id
        );

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let server = tokio::spawn(serve_fn(shutdown_rx));

        tokio::signal::ctrl_c().await?;
        info!("{} shutting down", self.config.name);
        let _ = shutdown_tx.send(());

        if let Err(e) = self
            .registry
            .deregister(&self.config.id, &self.config.name)
            .await
        {
            error!("deregister {} failed: {e}", self.config.id);
        }

        server.await??;
        info!("{} stopped", self.config.name);
        Ok(())
    }
}

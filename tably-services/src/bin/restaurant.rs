use std::sync::Arc;

use tably_core::MemStore;
use tably_discovery::{App, AppConfig, ClientConfig};
use tably_services::env;
use tably_services::handler;
use tably_services::{MetadataGateway, RestaurantController};

const SERVICE_NAME: &str = "restaurant";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let host = env::var_or("HOST", "127.0.0.1");
    let port = env::port_or(8082);
    let registry = env::registry_from_env().await?;

    let client_config = ClientConfig {
        fallback: std::env::var("METADATA_FALLBACK_ADDR")
            .ok()
            .filter(|v| !v.is_empty()),
        ..Default::default()
    };
    let gateway = Arc::new(MetadataGateway::with_config(
        registry.clone(),
        client_config,
    )?);
    let controller = Arc::new(RestaurantController::new(
        Arc::new(MemStore::new()),
        gateway,
    ));
    let router = handler::restaurant_router(controller);

    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    let app = App::new(AppConfig::new(SERVICE_NAME, &host, port), registry);
    app.run(move |shutdown| async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = shutdown.await;
            })
            .await?;
        Ok(())
    })
    .await
}

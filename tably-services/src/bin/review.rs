use std::sync::Arc;

use tably_core::MemStore;
use tably_discovery::{App, AppConfig};
use tably_services::env;
use tably_services::handler;
use tably_services::ReviewController;

const SERVICE_NAME: &str = "review";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let host = env::var_or("HOST", "127.0.0.1");
    let port = env::port_or(8083);
    let registry = env::registry_from_env().await?;

    let controller = Arc::new(ReviewController::new(Arc::new(MemStore::new())));
    let router = handler::review_router(controller);

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

use std::sync::Arc;

use tably_core::{MemStore, Metadata, Restaurant, TablyErr};
use tably_discovery::{ClientConfig, MemoryRegistry, Registration, Registry};
use tably_services::handler;
use tably_services::{MetadataController, MetadataGateway, RestaurantController, ReviewController};

/// Serve the metadata service on an ephemeral port and return its address.
async fn spawn_metadata_service(controller: Arc<MetadataController>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = handler::metadata_router(controller);
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr.to_string()
}

#[tokio::test]
async fn restaurant_creation_verifies_metadata_through_the_registry() {
    let registry = Arc::new(MemoryRegistry::new());

    let metadata_controller = Arc::new(MetadataController::new(Arc::new(MemStore::new())));
    metadata_controller
        .create(Metadata {
            name: "Casa Verde".to_string(),
            cuisine_type: "mexican".to_string(),
            ..Default::default()
        })
        .unwrap();

    let addr = spawn_metadata_service(metadata_controller).await;
    let (host, port) = addr.rsplit_once(':').unwrap();
    registry
        .register(Registration::new("m-1", "metadata", host, port.parse().unwrap()))
        .await
        .unwrap();

    let registry: Arc<dyn Registry> = registry;
    let store = Arc::new(MemStore::new());
    let controller = RestaurantController::new(
        store.clone(),
        Arc::new(MetadataGateway::new(registry).unwrap()),
    );

    // referenced metadata exists: accepted, ID assigned
    let created = controller
        .create(Restaurant {
            metadata_id: 1,
            display_name: "Casa Verde - Centro".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(created.id, 1);

    // unknown metadata_id: rejected, store untouched
    let rejected = controller
        .create(Restaurant {
            metadata_id: 99,
            display_name: "Ghost Kitchen".to_string(),
            ..Default::default()
        })
        .await;
    assert!(matches!(rejected, Err(TablyErr::Validation(_))));
    assert_eq!(store.len(), 1);

    // read side enriches with the metadata record
    let (restaurant, metadata) = controller.get_by_id(1).await.unwrap();
    assert_eq!(restaurant.display_name, "Casa Verde - Centro");
    assert_eq!(metadata.unwrap().name, "Casa Verde");
}

#[tokio::test]
async fn enrichment_is_best_effort_when_metadata_is_unresolvable() {
    // nothing registered under "metadata": every resolution is NotFound
    let registry: Arc<dyn Registry> = Arc::new(MemoryRegistry::new());
    let store = Arc::new(MemStore::new());
    store
        .add(Restaurant {
            id: 1,
            metadata_id: 1,
            display_name: "Tokyo Bite".to_string(),
        })
        .unwrap();

    let controller =
        RestaurantController::new(store, Arc::new(MetadataGateway::new(registry).unwrap()));

    let (restaurant, metadata) = controller.get_by_id(1).await.unwrap();
    assert_eq!(restaurant.id, 1);
    assert!(metadata.is_none());
}

#[tokio::test]
async fn fallback_address_covers_a_missing_registration() {
    let metadata_controller = Arc::new(MetadataController::new(Arc::new(MemStore::new())));
    metadata_controller
        .create(Metadata {
            name: "Pasta Nostra".to_string(),
            cuisine_type: "italian".to_string(),
            ..Default::default()
        })
        .unwrap();
    let addr = spawn_metadata_service(metadata_controller).await;

    // metadata is reachable but never registered; the gateway has to lean on
    // the configured fallback
    let registry: Arc<dyn Registry> = Arc::new(MemoryRegistry::new());
    let gateway = MetadataGateway::with_config(
        registry,
        ClientConfig {
            fallback: Some(addr),
            ..Default::default()
        },
    )
    .unwrap();

    let metadata = gateway.get_by_id(1).await.unwrap();
    assert_eq!(metadata.name, "Pasta Nostra");
}

#[tokio::test]
async fn review_service_over_http() {
    let controller = Arc::new(ReviewController::new(Arc::new(MemStore::new())));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let router = handler::review_router(controller);
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let http = reqwest::Client::new();

    // out-of-range rating is a validation error, no record stored
    let resp = http
        .post(format!("{base}/review"))
        .json(&serde_json::json!({"restaurant_id": 1, "rating": 6}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);

    // an omitted rating decodes to zero and is rejected by validation, not
    // by the JSON extractor
    let resp = http
        .post(format!("{base}/review"))
        .json(&serde_json::json!({"restaurant_id": 1}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);

    // valid review gets an incrementing ID
    let resp = http
        .post(format!("{base}/review"))
        .json(&serde_json::json!({"restaurant_id": 1, "rating": 3, "comment": "solid"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    let created: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(created["id"], 1);

    let resp = http
        .post(format!("{base}/review"))
        .json(&serde_json::json!({"restaurant_id": 2, "rating": 5}))
        .send()
        .await
        .unwrap();
    let second: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(second["id"], 2);

    // list filtered by foreign key
    let reviews: serde_json::Value = http
        .get(format!("{base}/review?restaurant_id=1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(reviews.as_array().unwrap().len(), 1);

    let health = http
        .get(format!("{base}/healthz"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(health, "ok");
}

#[tokio::test]
async fn restaurant_service_over_http() {
    let registry = Arc::new(MemoryRegistry::new());

    let metadata_controller = Arc::new(MetadataController::new(Arc::new(MemStore::new())));
    metadata_controller
        .create(Metadata {
            name: "Casa Verde".to_string(),
            cuisine_type: "mexican".to_string(),
            ..Default::default()
        })
        .unwrap();
    let addr = spawn_metadata_service(metadata_controller).await;
    let (host, port) = addr.rsplit_once(':').unwrap();
    registry
        .register(Registration::new("m-1", "metadata", host, port.parse().unwrap()))
        .await
        .unwrap();

    let registry: Arc<dyn Registry> = registry;
    let controller = Arc::new(RestaurantController::new(
        Arc::new(MemStore::new()),
        Arc::new(MetadataGateway::new(registry).unwrap()),
    ));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let router = handler::restaurant_router(controller);
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let http = reqwest::Client::new();

    let resp = http
        .post(format!("{base}/restaurant"))
        .json(&serde_json::json!({"metadata_id": 1, "display_name": "Casa Verde - Centro"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);

    // single-record read embeds the metadata enrichment
    let body: serde_json::Value = http
        .get(format!("{base}/restaurant?id=1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["display_name"], "Casa Verde - Centro");
    assert_eq!(body["metadata"]["name"], "Casa Verde");

    // missing display_name is rejected
    let resp = http
        .post(format!("{base}/restaurant"))
        .json(&serde_json::json!({"metadata_id": 1, "display_name": ""}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);

    // same when the field is absent entirely
    let resp = http
        .post(format!("{base}/restaurant"))
        .json(&serde_json::json!({"metadata_id": 1}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);

    let resp = http
        .get(format!("{base}/restaurant?id=42"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}

use std::sync::Arc;

use axum::extract::{Query, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tably_core::{Metadata, Restaurant, Review, TablyErr};

use crate::controller::{MetadataController, RestaurantController, ReviewController};

#[derive(Deserialize)]
struct IdQuery {
    id: Option<i64>,
}

#[derive(Deserialize)]
struct ReviewQuery {
    id: Option<i64>,
    restaurant_id: Option<i64>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Restaurant record plus its best-effort metadata enrichment.
#[derive(Serialize)]
struct RestaurantWithMetadata {
    #[serde(flatten)]
    restaurant: Restaurant,
    metadata: Option<Metadata>,
}

fn error_response(e: TablyErr) -> Response {
    let status =
        StatusCode::from_u16(e.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorBody { error: e.to_string() })).into_response()
}

async fn health() -> &'static str {
    "ok"
}

async fn log_requests(req: Request, next: Next) -> Response {
    log::info!("{} {}", req.method(), req.uri().path());
    next.run(req).await
}

pub fn metadata_router(controller: Arc<MetadataController>) -> Router {
    Router::new()
        .route("/metadata", get(get_metadata).post(post_metadata))
        .route("/healthz", get(health))
        .route("/health", get(health))
        .layer(middleware::from_fn(log_requests))
        .with_state(controller)
}

async fn get_metadata(
    State(c): State<Arc<MetadataController>>,
    Query(q): Query<IdQuery>,
) -> Response {
    match q.id {
        None => Json(c.list()).into_response(),
        Some(id) => match c.get_by_id(id) {
            Ok(m) => Json(m).into_response(),
            Err(e) => error_response(e),
        },
    }
}

async fn post_metadata(
    State(c): State<Arc<MetadataController>>,
    Json(body): Json<Metadata>,
) -> Response {
    match c.create(body) {
        Ok(m) => (StatusCode::CREATED, Json(m)).into_response(),
        Err(e) => error_response(e),
    }
}

pub fn restaurant_router(controller: Arc<RestaurantController>) -> Router {
    Router::new()
        .route("/restaurant", get(get_restaurant).post(post_restaurant))
        .route("/healthz", get(health))
        .route("/health", get(health))
        .layer(middleware::from_fn(log_requests))
        .with_state(controller)
}

async fn get_restaurant(
    State(c): State<Arc<RestaurantController>>,
    Query(q): Query<IdQuery>,
) -> Response {
    match q.id {
        None => Json(c.list()).into_response(),
        Some(id) => match c.get_by_id(id).await {
            Ok((restaurant, metadata)) => Json(RestaurantWithMetadata {
                restaurant,
                metadata,
            })
            .into_response(),
            Err(e) => error_response(e),
        },
    }
}

async fn post_restaurant(
    State(c): State<Arc<RestaurantController>>,
    Json(body): Json<Restaurant>,
) -> Response {
    match c.create(body).await {
        Ok(r) => (StatusCode::CREATED, Json(r)).into_response(),
        Err(e) => error_response(e),
    }
}

pub fn review_router(controller: Arc<ReviewController>) -> Router {
    Router::new()
        .route("/review", get(get_review).post(post_review))
        .route("/healthz", get(health))
        .route("/health", get(health))
        .layer(middleware::from_fn(log_requests))
        .with_state(controller)
}

async fn get_review(
    State(c): State<Arc<ReviewController>>,
    Query(q): Query<ReviewQuery>,
) -> Response {
    if let Some(id) = q.id {
        return match c.get_by_id(id) {
            Ok(r) => Json(r).into_response(),
            Err(e) => error_response(e),
        };
    }
    match q.restaurant_id {
        Some(restaurant_id) => Json(c.list_for_restaurant(restaurant_id)).into_response(),
        None => Json(c.list()).into_response(),
    }
}

async fn post_review(
    State(c): State<Arc<ReviewController>>,
    Json(body): Json<Review>,
) -> Response {
    match c.create(body) {
        Ok(r) => (StatusCode::CREATED, Json(r)).into_response(),
        Err(e) => error_response(e),
    }
}

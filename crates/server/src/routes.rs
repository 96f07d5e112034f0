pub mod subscriptions;

use std::{any::Any, sync::Arc, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use service::subscription::service::DynSubscriptionService;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    timeout::TimeoutLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::{error, Level};
use utoipa::OpenApi;

use common::types::Health;

use crate::errors::JsonApiError;
use crate::openapi::ApiDoc;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub subscriptions: Arc<DynSubscriptionService>,
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// A panicking handler becomes a 500 with the usual JSON error body.
fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = %detail, "handler panicked");
    JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Error", None).into_response()
}

/// Build the full application router
pub fn build_router(state: AppState, cors: CorsLayer, request_timeout: Duration) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json));

    let api = Router::new()
        .route(
            "/api/v1/subscriptions/",
            get(subscriptions::list).post(subscriptions::create),
        )
        .route(
            "/api/v1/subscriptions",
            get(subscriptions::list).post(subscriptions::create),
        )
        .route("/api/v1/subscriptions/total", get(subscriptions::total))
        .route(
            "/api/v1/subscriptions/:id",
            get(subscriptions::get).put(subscriptions::update).delete(subscriptions::delete),
        )
        .with_state(state);

    public
        .merge(api)
        .layer(CatchPanicLayer::custom(panic_response))
        // 408 once a request runs past the configured bound
        .layer(TimeoutLayer::new(request_timeout))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one INFO span per request carrying method and path
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // status code and latency
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx and friends at ERROR
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}

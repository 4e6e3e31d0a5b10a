//! Axum router construction.
//!
//! The [`app`] function wires the bucket endpoints of the JSON API, plus a
//! few infrastructure routes, to their handlers and returns a ready-to-serve
//! [`axum::Router`].

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderValue, Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::errors::{generate_request_id, ApiError};
use crate::json::{BucketResource, ErrorDetail, ErrorResponse, ListBucketsResponse};
use crate::metrics::{metrics_handler, metrics_middleware};
use crate::Server;

// -- OpenAPI specification ----------------------------------------------------

/// OpenAPI documentation for the emulated bucket endpoints.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "fakegcs",
        version = "0.1.0",
        description = "Local emulator for the Cloud Storage JSON API bucket endpoints"
    ),
    paths(
        health_check,
        crate::handlers::bucket::create_bucket,
        crate::handlers::bucket::list_buckets,
        crate::handlers::bucket::get_bucket,
    ),
    components(schemas(
        crate::handlers::bucket::CreateBucketRequest,
        BucketResource,
        ListBucketsResponse,
        ErrorResponse,
        ErrorDetail,
    )),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Bucket", description = "Bucket operations"),
    )
)]
struct ApiDoc;

/// Build the axum [`Router`] for `server`.
pub fn app(server: Arc<Server>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/openapi.json", get(openapi_json))
        .route(
            "/storage/v1/b",
            get(handle_list_buckets).post(handle_create_bucket),
        )
        .route("/storage/v1/b/:bucket", get(handle_get_bucket))
        .with_state(server)
        // Inner layers run first, outer layers wrap them.
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(common_headers_middleware))
        // metrics_middleware is outer (captures full request lifecycle).
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
}

// -- Common headers middleware -----------------------------------------------

/// Adds `x-request-id` (unless already set), `date` and `server` to every
/// response.
async fn common_headers_middleware(req: Request<axum::body::Body>, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    if !headers.contains_key("x-request-id") {
        if let Ok(value) = HeaderValue::from_str(&generate_request_id()) {
            headers.insert("x-request-id", value);
        }
    }

    let date = httpdate::fmt_http_date(std::time::SystemTime::now());
    if let Ok(value) = HeaderValue::from_str(&date) {
        headers.insert("date", value);
    }
    headers.insert("server", HeaderValue::from_static("fakegcs"));

    response
}

// -- Infrastructure routes ---------------------------------------------------

/// `GET /health` -- Returns `{"status": "ok"}` with 200 OK.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    operation_id = "HealthCheck",
    responses(
        (status = 200, description = "Health check OK")
    )
)]
async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "application/json")],
        r#"{"status":"ok"}"#,
    )
}

/// `GET /openapi.json`
async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

// -- Bucket dispatch ---------------------------------------------------------

/// `POST /storage/v1/b` -- CreateBucket
async fn handle_create_bucket(
    State(server): State<Arc<Server>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    crate::handlers::bucket::create_bucket(server, &body).await
}

/// `GET /storage/v1/b` -- ListBuckets
async fn handle_list_buckets(State(server): State<Arc<Server>>) -> Result<Response, ApiError> {
    crate::handlers::bucket::list_buckets(server).await
}

/// `GET /storage/v1/b/:bucket` -- GetBucket
async fn handle_get_bucket(
    State(server): State<Arc<Server>>,
    Path(bucket): Path<String>,
) -> Result<Response, ApiError> {
    crate::handlers::bucket::get_bucket(server, &bucket).await
}

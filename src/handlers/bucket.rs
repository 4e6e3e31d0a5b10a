//! Bucket-level JSON API handlers.
//!
//! Each handler takes the lock mode it needs, calls the backend, builds the
//! response envelope and releases the lock before returning.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use tracing::{debug, warn};
use utoipa::ToSchema;

use crate::errors::ApiError;
use crate::json::{self, BucketResource, ErrorResponse, ListBucketsResponse};
use crate::metrics::record_bucket_operation;
use crate::Server;

/// Request body of `POST /storage/v1/b`.
///
/// Only the name is read; any other bucket fields a client sends are
/// ignored. The key matches `Name` case-insensitively and the last matching
/// key wins. A body without a string name (missing or `null`) is malformed.
#[derive(Debug, ToSchema)]
pub struct CreateBucketRequest {
    #[schema(rename = "Name")]
    pub name: String,
}

impl<'de> Deserialize<'de> for CreateBucketRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RequestVisitor;

        impl<'de> Visitor<'de> for RequestVisitor {
            type Value = CreateBucketRequest;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a bucket object with a Name field")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut name = None;
                while let Some(key) = map.next_key::<String>()? {
                    if key.eq_ignore_ascii_case("name") {
                        // null leaves any earlier value in place
                        if let Some(value) = map.next_value::<Option<String>>()? {
                            name = Some(value);
                        }
                    } else {
                        map.next_value::<IgnoredAny>()?;
                    }
                }
                name.map(|name| CreateBucketRequest { name })
                    .ok_or_else(|| de::Error::missing_field("Name"))
            }
        }

        deserializer.deserialize_map(RequestVisitor)
    }
}

/// Record the outcome of `operation` and pass the result through.
fn observe(
    operation: &'static str,
    result: Result<Response, ApiError>,
) -> Result<Response, ApiError> {
    match &result {
        Ok(response) => record_bucket_operation(operation, response.status()),
        Err(err) => {
            if err.status_code().is_server_error() {
                warn!("{} failed: {}", operation, err);
            }
            record_bucket_operation(operation, err.status_code());
        }
    }
    result
}

// -- Handlers -----------------------------------------------------------------

/// `POST /storage/v1/b` -- Create a bucket.
///
/// A malformed body is rejected before any lock is taken. The backend call
/// runs under the exclusive lock since backends are not required to
/// synchronize concurrent creates themselves.
#[utoipa::path(
    post,
    path = "/storage/v1/b",
    tag = "Bucket",
    operation_id = "CreateBucket",
    request_body = CreateBucketRequest,
    responses(
        (status = 200, description = "Bucket created (or already present)", body = BucketResource),
        (status = 400, description = "Malformed request body"),
        (status = 500, description = "Backend failure")
    )
)]
pub async fn create_bucket(server: Arc<Server>, body: &[u8]) -> Result<Response, ApiError> {
    let result = async {
        let request: CreateBucketRequest = serde_json::from_slice(body)
            .map_err(|e| ApiError::MalformedBody(e.to_string()))?;

        let backend = server.exclusive().await;
        backend.create_bucket(&request.name).await?;
        let resource = json::bucket_resource(&request.name);
        drop(backend);

        debug!("Created bucket {}", request.name);
        Ok::<_, ApiError>((StatusCode::OK, Json(resource)).into_response())
    }
    .await;
    observe("create_bucket", result)
}

/// `GET /storage/v1/b` -- List all buckets.
#[utoipa::path(
    get,
    path = "/storage/v1/b",
    tag = "Bucket",
    operation_id = "ListBuckets",
    responses(
        (status = 200, description = "Bucket list", body = ListBucketsResponse),
        (status = 500, description = "Backend failure")
    )
)]
pub async fn list_buckets(server: Arc<Server>) -> Result<Response, ApiError> {
    let result = async {
        let backend = server.shared().await;
        let names = backend.list_buckets().await?;
        let resp = json::list_buckets_response(&names);
        drop(backend);

        debug!("Listed {} buckets", names.len());
        Ok::<_, ApiError>((StatusCode::OK, Json(resp)).into_response())
    }
    .await;
    observe("list_buckets", result)
}

/// `GET /storage/v1/b/{bucket}` -- Fetch one bucket.
#[utoipa::path(
    get,
    path = "/storage/v1/b/{bucket}",
    tag = "Bucket",
    operation_id = "GetBucket",
    params(("bucket" = String, Path, description = "Bucket name")),
    responses(
        (status = 200, description = "Bucket found", body = BucketResource),
        (status = 404, description = "Bucket not found", body = ErrorResponse),
        (status = 500, description = "Backend failure")
    )
)]
pub async fn get_bucket(server: Arc<Server>, bucket: &str) -> Result<Response, ApiError> {
    let result = async {
        let backend = server.shared().await;
        backend.get_bucket(bucket).await?;
        let resource = json::bucket_resource(bucket);
        drop(backend);

        Ok::<_, ApiError>((StatusCode::OK, Json(resource)).into_response())
    }
    .await;
    observe("get_bucket", result)
}

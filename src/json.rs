//! JSON response envelopes.
//!
//! These mirror the minimal shapes of the Cloud Storage JSON API that
//! client libraries need to decode: a bucket resource, a bucket list and an
//! error body. All builders borrow their input and allocate a fresh value.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// `kind` discriminator of a single bucket resource.
pub const BUCKET_KIND: &str = "storage#bucket";

/// `kind` discriminator of a bucket list.
pub const BUCKET_LIST_KIND: &str = "storage#buckets";

// ── Bucket resource ─────────────────────────────────────────────────

/// Minimal bucket resource.
///
/// ```json
/// {"kind":"storage#bucket","id":"photos","name":"photos"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BucketResource {
    pub kind: String,
    pub id: String,
    pub name: String,
}

/// Build the bucket resource for `name`.
pub fn bucket_resource(name: &str) -> BucketResource {
    BucketResource {
        kind: BUCKET_KIND.to_string(),
        id: name.to_string(),
        name: name.to_string(),
    }
}

// ── Bucket list ─────────────────────────────────────────────────────

/// Response body of `GET /storage/v1/b`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ListBucketsResponse {
    pub kind: String,
    pub items: Vec<BucketResource>,
}

/// Build the list envelope, one item per name, in the order given.
pub fn list_buckets_response<S: AsRef<str>>(names: &[S]) -> ListBucketsResponse {
    ListBucketsResponse {
        kind: BUCKET_LIST_KIND.to_string(),
        items: names.iter().map(|n| bucket_resource(n.as_ref())).collect(),
    }
}

// ── Errors ──────────────────────────────────────────────────────────

/// One entry of the `errors` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    pub domain: String,
    pub reason: String,
    pub message: String,
}

/// Structured error body.
///
/// ```json
/// {"errors":[],"code":404,"message":"Not found"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub errors: Vec<ErrorDetail>,
    pub code: u16,
    pub message: String,
}

/// Build an error envelope. `errors` may be empty; it is always serialized
/// as an array.
pub fn error_response(code: u16, message: &str, errors: &[ErrorDetail]) -> ErrorResponse {
    ErrorResponse {
        errors: errors.to_vec(),
        code,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bucket_resource_shape() {
        let value = serde_json::to_value(bucket_resource("photos")).unwrap();
        assert_eq!(
            value,
            json!({"kind": "storage#bucket", "id": "photos", "name": "photos"})
        );
    }

    #[test]
    fn test_list_preserves_order() {
        let resp = list_buckets_response(&["b", "a"]);
        assert_eq!(resp.kind, BUCKET_LIST_KIND);
        let names: Vec<_> = resp.items.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
    }

    #[test]
    fn test_empty_list_serializes_items_array() {
        let value = serde_json::to_value(list_buckets_response::<String>(&[])).unwrap();
        assert_eq!(value, json!({"kind": "storage#buckets", "items": []}));
    }

    #[test]
    fn test_error_response_without_details() {
        let value = serde_json::to_value(error_response(404, "Not found", &[])).unwrap();
        assert_eq!(
            value,
            json!({"errors": [], "code": 404, "message": "Not found"})
        );
    }

    #[test]
    fn test_error_response_with_details() {
        let detail = ErrorDetail {
            domain: "global".to_string(),
            reason: "notFound".to_string(),
            message: "Not found".to_string(),
        };
        let resp = error_response(404, "Not found", std::slice::from_ref(&detail));
        assert_eq!(resp.errors, vec![detail]);
    }
}

//! Abstract bucket backend trait.
//!
//! Any bucket store must implement [`BucketBackend`].  The trait uses
//! manually desugared async methods (pinned boxed futures) so it stays
//! object safe and can sit behind a `Box<dyn BucketBackend>`.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

/// Errors a backend can report.
///
/// Only [`BackendError::NotFound`] is treated specially by the HTTP layer;
/// every other variant becomes an internal failure.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The named bucket does not exist.
    #[error("bucket not found: {0}")]
    NotFound(String),

    /// The backend cannot store a bucket under this name.
    #[error("invalid bucket name: {0:?}")]
    InvalidName(String),

    /// Filesystem failure in a disk-backed store.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Anything else.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl BackendError {
    /// Whether this error means "the bucket is absent".
    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::NotFound(_))
    }
}

/// Async bucket store contract.
///
/// Implementations need not be internally synchronized for concurrent
/// creates: [`crate::Server`] serializes mutating calls behind its
/// exclusive lock.
pub trait BucketBackend: Send + Sync + 'static {
    /// Create a bucket. Creating a bucket that already exists succeeds.
    fn create_bucket(
        &self,
        name: &str,
    ) -> Pin<Box<dyn Future<Output = Result<(), BackendError>> + Send + '_>>;

    /// List all bucket names. Callers must not rely on the order unless the
    /// implementation documents one.
    fn list_buckets(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<String>, BackendError>> + Send + '_>>;

    /// Check that a bucket exists, returning [`BackendError::NotFound`] if it
    /// does not.
    fn get_bucket(
        &self,
        name: &str,
    ) -> Pin<Box<dyn Future<Output = Result<(), BackendError>> + Send + '_>>;
}

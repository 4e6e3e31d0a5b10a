//! In-memory bucket store.
//!
//! Keeps bucket names in a `RwLock<BTreeSet>`. Nothing is persisted, which
//! makes it the default for tests and throwaway emulator instances.

use std::collections::BTreeSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::RwLock;

use super::store::{BackendError, BucketBackend};

#[derive(Debug, Default)]
pub struct MemoryBackend {
    buckets: RwLock<BTreeSet<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> BackendError {
    BackendError::Internal(anyhow::anyhow!("bucket set lock poisoned"))
}

impl BucketBackend for MemoryBackend {
    fn create_bucket(
        &self,
        name: &str,
    ) -> Pin<Box<dyn Future<Output = Result<(), BackendError>> + Send + '_>> {
        let name = name.to_string();
        Box::pin(async move {
            let mut buckets = self.buckets.write().map_err(|_| poisoned())?;
            buckets.insert(name);
            Ok(())
        })
    }

    /// Names are returned in ascending order.
    fn list_buckets(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<String>, BackendError>> + Send + '_>> {
        Box::pin(async move {
            let buckets = self.buckets.read().map_err(|_| poisoned())?;
            Ok(buckets.iter().cloned().collect())
        })
    }

    fn get_bucket(
        &self,
        name: &str,
    ) -> Pin<Box<dyn Future<Output = Result<(), BackendError>> + Send + '_>> {
        let name = name.to_string();
        Box::pin(async move {
            let buckets = self.buckets.read().map_err(|_| poisoned())?;
            if buckets.contains(&name) {
                Ok(())
            } else {
                Err(BackendError::NotFound(name))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get_bucket() {
        let store = MemoryBackend::new();
        store.create_bucket("photos").await.unwrap();
        store.get_bucket("photos").await.unwrap();
    }

    #[tokio::test]
    async fn test_get_missing_bucket() {
        let store = MemoryBackend::new();
        let err = store.get_bucket("missing").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_create_is_idempotent() {
        let store = MemoryBackend::new();
        store.create_bucket("photos").await.unwrap();
        store.create_bucket("photos").await.unwrap();
        assert_eq!(store.list_buckets().await.unwrap(), vec!["photos"]);
    }

    #[tokio::test]
    async fn test_list_is_sorted() {
        let store = MemoryBackend::new();
        for name in ["zeta", "alpha", "mid"] {
            store.create_bucket(name).await.unwrap();
        }
        assert_eq!(
            store.list_buckets().await.unwrap(),
            vec!["alpha", "mid", "zeta"]
        );
    }

    #[tokio::test]
    async fn test_empty_store_lists_nothing() {
        let store = MemoryBackend::new();
        assert!(store.list_buckets().await.unwrap().is_empty());
    }
}

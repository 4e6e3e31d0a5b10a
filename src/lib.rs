//! fakegcs library: a local stand-in for the Cloud Storage JSON API's
//! bucket endpoints.
//!
//! A [`Server`] owns one [`BucketBackend`] behind a reader/writer lock.
//! The HTTP layer in [`server`] and [`handlers`] translates JSON requests
//! into calls on that backend and shapes the results with [`json`].

use anyhow::Context;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::info;

pub mod backend;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod json;
pub mod metrics;
pub mod server;

pub use backend::store::{BackendError, BucketBackend};
use crate::config::Config;

/// Shared emulator state passed to all handlers via `axum::extract::State`.
///
/// The backend is only reachable through the lock, so every call runs in
/// either a shared or an exclusive critical section. Guards are scoped and
/// released on every exit path, including an aborted request future.
pub struct Server {
    backend: RwLock<Box<dyn BucketBackend>>,
}

impl Server {
    /// Wrap `backend`. The backend is never replaced afterwards.
    pub fn new(backend: Box<dyn BucketBackend>) -> Self {
        Self {
            backend: RwLock::new(backend),
        }
    }

    /// Build the backend named in `config` and create every configured
    /// bucket. Any failure here means the emulator is not usable.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let server = Self::new(backend::open(&config.backend)?);
        for name in &config.buckets {
            server
                .create_bucket(name)
                .await
                .with_context(|| format!("failed to create initial bucket {name:?}"))?;
            info!("Created initial bucket {}", name);
        }
        Ok(server)
    }

    /// Create a bucket ahead of serving requests, e.g. from test setup.
    ///
    /// Runs under the exclusive lock. Creating an existing bucket succeeds.
    /// An error means the emulator could not be set up as asked; callers
    /// normally abort rather than retry.
    pub async fn create_bucket(&self, name: &str) -> Result<(), BackendError> {
        let backend = self.exclusive().await;
        backend.create_bucket(name).await
    }

    pub(crate) async fn shared(&self) -> RwLockReadGuard<'_, Box<dyn BucketBackend>> {
        self.backend.read().await
    }

    pub(crate) async fn exclusive(&self) -> RwLockWriteGuard<'_, Box<dyn BucketBackend>> {
        self.backend.write().await
    }
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::MemoryBackend;
    use crate::config::{BackendKind, Config};

    #[tokio::test]
    async fn test_create_bucket_is_idempotent() {
        let server = Server::new(Box::new(MemoryBackend::new()));
        server.create_bucket("photos").await.unwrap();
        server.create_bucket("photos").await.unwrap();

        let names = server.shared().await.list_buckets().await.unwrap();
        assert_eq!(names, vec!["photos"]);
    }

    #[tokio::test]
    async fn test_from_config_seeds_buckets() {
        let config = Config {
            buckets: vec!["a".to_string(), "b".to_string(), "a".to_string()],
            ..Config::default()
        };
        let server = Server::from_config(&config).await.unwrap();

        let names = server.shared().await.list_buckets().await.unwrap();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_from_config_fails_on_unstorable_bucket() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut config = Config {
            buckets: vec!["../outside".to_string()],
            ..Config::default()
        };
        config.backend.kind = BackendKind::Local;
        config.backend.root_dir = tmp.path().to_string_lossy().into_owned();

        let err = Server::from_config(&config).await.unwrap_err();
        assert!(err.to_string().contains("../outside"));
    }

    #[tokio::test]
    async fn test_create_bucket_waits_for_readers() {
        let server = std::sync::Arc::new(Server::new(Box::new(MemoryBackend::new())));
        let reader = server.shared().await;

        let writer = server.clone();
        let handle = tokio::spawn(async move { writer.create_bucket("photos").await });
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(!handle.is_finished(), "create ran while a reader held the lock");

        drop(reader);
        handle.await.unwrap().unwrap();
        let names = server.shared().await.list_buckets().await.unwrap();
        assert_eq!(names, vec!["photos"]);
    }
}

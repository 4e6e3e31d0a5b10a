//! Bucket storage backends.
//!
//! The [`store::BucketBackend`] trait is the only thing the server and the
//! HTTP layer know about.  [`memory::MemoryBackend`] keeps bucket names in
//! memory; [`local::LocalBackend`] keeps one directory per bucket on disk.

pub mod local;
pub mod memory;
pub mod store;

use tracing::info;

use crate::config::{BackendConfig, BackendKind};
use store::BucketBackend;

/// Construct the backend selected by `config`.
pub fn open(config: &BackendConfig) -> anyhow::Result<Box<dyn BucketBackend>> {
    match config.kind {
        BackendKind::Memory => {
            info!("Memory bucket backend initialized");
            Ok(Box::new(memory::MemoryBackend::new()))
        }
        BackendKind::Local => {
            let backend = local::LocalBackend::new(&config.root_dir)?;
            info!("Local bucket backend initialized at {}", config.root_dir);
            Ok(Box::new(backend))
        }
    }
}

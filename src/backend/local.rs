//! Local filesystem bucket store.
//!
//! Every bucket is a directory directly under a configurable root. Creating
//! a bucket is `create_dir_all`, so it is idempotent and survives restarts.
//! Hidden entries and plain files under the root are ignored.

use std::future::Future;
use std::path::{Component, Path, PathBuf};
use std::pin::Pin;

use super::store::{BackendError, BucketBackend};

/// Stores buckets as directories on the local filesystem.
#[derive(Debug)]
pub struct LocalBackend {
    /// Root directory holding one subdirectory per bucket.
    root: PathBuf,
}

impl LocalBackend {
    /// Create a new `LocalBackend` rooted at `root`.
    ///
    /// The directory will be created if it does not exist.
    pub fn new(root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a bucket name to its directory.
    ///
    /// The name must be a single normal path component so the result always
    /// stays inside the root.
    fn resolve(&self, name: &str) -> Result<PathBuf, BackendError> {
        let mut components = Path::new(name).components();
        let single_normal = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !single_normal || name.starts_with('.') || name.contains(&['/', '\\'][..]) {
            return Err(BackendError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

impl BucketBackend for LocalBackend {
    fn create_bucket(
        &self,
        name: &str,
    ) -> Pin<Box<dyn Future<Output = Result<(), BackendError>> + Send + '_>> {
        let name = name.to_string();
        Box::pin(async move {
            let path = self.resolve(&name)?;
            std::fs::create_dir_all(&path)?;
            Ok(())
        })
    }

    /// Names are returned in ascending order.
    fn list_buckets(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<String>, BackendError>> + Send + '_>> {
        Box::pin(async move {
            let mut names = Vec::new();
            for entry in std::fs::read_dir(&self.root)? {
                let entry = entry?;
                if !entry.file_type()?.is_dir() {
                    continue;
                }
                // Non UTF-8 directory names cannot have been created by us.
                let Ok(name) = entry.file_name().into_string() else {
                    continue;
                };
                if name.starts_with('.') {
                    continue;
                }
                names.push(name);
            }
            names.sort();
            Ok(names)
        })
    }

    fn get_bucket(
        &self,
        name: &str,
    ) -> Pin<Box<dyn Future<Output = Result<(), BackendError>> + Send + '_>> {
        let name = name.to_string();
        Box::pin(async move {
            // A name we could never have stored is simply absent.
            let path = match self.resolve(&name) {
                Ok(path) => path,
                Err(_) => return Err(BackendError::NotFound(name)),
            };
            if path.is_dir() {
                Ok(())
            } else {
                Err(BackendError::NotFound(name))
            }
        })
    }
}

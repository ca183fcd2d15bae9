//! Local filesystem storage backend
//!
//! Stands in for remote object storage during tests and local development.
//! Writes are atomic (write to temp, then rename) to prevent partial files.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use store_core::config::{LocalOptions, SuffixMode};
use store_core::{Error, Result};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::StorageBackend;

/// Local filesystem storage backend
///
/// Maps keys to relative file paths under a root directory, with:
/// - Atomic writes (write to .tmp, then rename)
/// - Automatic parent directory creation
/// - Optional generated root suffix to isolate concurrent instances
#[derive(Debug, Clone)]
pub struct LocalStorage {
    /// Base path for all storage operations
    root: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance rooted at the given directory
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Build a LocalStorage from configuration
    ///
    /// With `SuffixMode::Generated` the configured root gains a unique
    /// token, computed here once and fixed for the instance's lifetime.
    pub fn from_options(options: &LocalOptions) -> Self {
        let root = PathBuf::from(&options.folder);

        let root = match options.suffix {
            SuffixMode::None => root,
            SuffixMode::Generated => {
                let token = Uuid::new_v4().simple().to_string();
                match root.file_name() {
                    Some(name) => {
                        root.with_file_name(format!("{}-{}", name.to_string_lossy(), token))
                    }
                    None => root.join(token),
                }
            }
        };

        Self { root }
    }

    /// Get the root path, including any generated suffix
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a key to an absolute path
    fn resolve_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    /// Generate a unique temporary file path next to the target
    fn temp_path(&self, key: &str) -> PathBuf {
        let full_path = self.resolve_path(key);
        let temp_name = format!(
            ".{}.{}.tmp",
            full_path.file_name().unwrap_or_default().to_string_lossy(),
            Uuid::new_v4()
        );
        full_path.with_file_name(temp_name)
    }
}

#[async_trait]
impl StorageBackend for LocalStorage {
    #[instrument(skip(self, data), fields(backend = "local", size = data.len()))]
    async fn put(&self, key: &str, data: Bytes) -> Result<()> {
        let full_path = self.resolve_path(key);
        let temp_path = self.temp_path(key);

        debug!(?full_path, ?temp_path, "Writing object atomically");

        // Ensure parent directory exists
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::Storage {
                    message: format!("Failed to create directory {:?}: {}", parent, e),
                })?;
        }

        // Write to temporary file
        let mut file = fs::File::create(&temp_path)
            .await
            .map_err(|e| Error::Storage {
                message: format!("Failed to create temp file {:?}: {}", temp_path, e),
            })?;

        file.write_all(&data).await.map_err(|e| Error::Storage {
            message: format!("Failed to write data: {}", e),
        })?;

        file.sync_all().await.map_err(|e| Error::Storage {
            message: format!("Failed to sync file: {}", e),
        })?;

        // Atomic rename
        fs::rename(&temp_path, &full_path)
            .await
            .map_err(|e| Error::Storage {
                message: format!("Failed to rename {:?} to {:?}: {}", temp_path, full_path, e),
            })?;

        debug!(?full_path, "Object written");
        Ok(())
    }

    #[instrument(skip(self), fields(backend = "local"))]
    async fn get(&self, key: &str) -> Result<Bytes> {
        let full_path = self.resolve_path(key);
        debug!(?full_path, "Reading object");

        match fs::read(&full_path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::NotFound {
                key: key.to_string(),
            }),
            Err(e) => Err(Error::Storage {
                message: format!("Failed to read {}: {}", key, e),
            }),
        }
    }

    #[instrument(skip(self), fields(backend = "local"))]
    async fn delete(&self, key: &str) -> Result<()> {
        let full_path = self.resolve_path(key);
        debug!(?full_path, "Deleting object");

        match fs::remove_file(&full_path).await {
            Ok(()) => Ok(()),
            // Already absent counts as deleted
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Storage {
                message: format!("Failed to delete {}: {}", key, e),
            }),
        }
    }
}

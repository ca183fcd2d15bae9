//! Storage backend trait definition
//!
//! Defines the async interface that all storage backends must implement.

use async_trait::async_trait;
use bytes::Bytes;
use store_core::Result;

/// Async trait for object-storage backends
///
/// Implementors provide put/get/delete against opaque string keys, for both
/// the local filesystem and remote object storage (S3, etc.). Payloads are
/// raw bytes; the backend never interprets content.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Write the payload under the given key
    ///
    /// Creates whatever intermediate structure the backend needs
    /// (directories for the local variant; nothing for object storage).
    ///
    /// # Errors
    /// Returns `Error::Storage` if the write fails.
    async fn put(&self, key: &str, data: Bytes) -> Result<()>;

    /// Read the payload stored under the given key
    ///
    /// # Returns
    /// The object contents as `Bytes`
    ///
    /// # Errors
    /// Returns `Error::NotFound` if no object exists under the key, and
    /// `Error::Storage` for any other backend failure.
    async fn get(&self, key: &str) -> Result<Bytes>;

    /// Delete the object stored under the given key
    ///
    /// Deleting a missing key is not an error; the key is treated as
    /// already absent.
    ///
    /// # Errors
    /// Returns `Error::Storage` if the deletion fails for any other reason.
    async fn delete(&self, key: &str) -> Result<()>;
}

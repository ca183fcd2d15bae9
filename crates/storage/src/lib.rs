//! Storage - Pluggable object-storage backends for the entity store
//!
//! Provides async put/get/delete keyed by string key, with support for:
//! - Local filesystem (default feature)
//! - Amazon S3 / S3-compatible storage (with `s3` feature)
//!
//! Both variants report a missing key through the same structured
//! `NotFound` sentinel, so callers get identical semantics regardless of
//! which backend was selected at construction time.
//!
//! # Example
//!
//! ```no_run
//! use storage::{StorageBackend, LocalStorage};
//! use bytes::Bytes;
//!
//! # async fn example() -> store_core::Result<()> {
//! let storage = LocalStorage::new("/tmp/entities");
//! storage.put("seneca/db01/foo/a1.json", Bytes::from_static(b"{}")).await?;
//! let data = storage.get("seneca/db01/foo/a1.json").await?;
//! # Ok(())
//! # }
//! ```

mod backend;
mod local;

#[cfg(feature = "s3")]
mod s3;

pub use backend::StorageBackend;
pub use local::LocalStorage;

#[cfg(feature = "s3")]
pub use s3::S3Storage;

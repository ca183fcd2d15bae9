//! Store Core - Foundation for the entity object-store adapter
//!
//! Provides the entity model, error handling, and configuration types
//! shared by the storage backends and the store façade.

pub mod config;
pub mod entity;
pub mod error;

pub use config::{EntitySpec, LocalOptions, S3Options, SharedOptions, StoreConfig, SuffixMode};
pub use entity::{Directive, Entity, FieldValue};
pub use error::{Error, Result};

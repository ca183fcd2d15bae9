//! Error types for the entity object-store adapter

use thiserror::Error;

/// Result type alias using the adapter Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the entity object-store adapter
#[derive(Error, Debug)]
pub enum Error {
    /// The backend's missing-key sentinel. Backends produce this variant
    /// themselves; call sites never compare backend-specific error codes.
    #[error("Object not found: {key}")]
    NotFound { key: String },

    /// Any other backend failure, carrying the backend's native message
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Lines-mode encoding requires the named field to be an array
    #[error("Field is not an array: {field}")]
    FieldNotArray { field: String },

    /// Binary-mode encoding requires the named field to hold bytes
    #[error("Field is missing: {field}")]
    FieldMissing { field: String },

    /// Stored bytes failed to parse under the resolved encoding
    #[error("Decode failed: {message}")]
    Decode { message: String },

    /// Configuration rejected at store construction
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl Error {
    /// Returns true for the missing-key sentinel
    ///
    /// The façade maps this to an empty result on load and to success on
    /// remove; it is never surfaced to the caller as an error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Returns true if encoding a field for an alternate representation
    /// (lines or binary) failed before any backend write
    pub fn is_encoding(&self) -> bool {
        matches!(
            self,
            Error::FieldNotArray { .. } | Error::FieldMissing { .. }
        )
    }
}

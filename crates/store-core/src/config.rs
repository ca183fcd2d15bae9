//! Store configuration types
//!
//! Configuration is immutable for the lifetime of a store instance: backend
//! selection, key layout, and per-canon encoding specs are all fixed at
//! construction time.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Main store configuration
///
/// The key layout values (`prefix`, `suffix`, `folder`) are a persisted
/// format: objects written under one configuration are only reachable again
/// under the same values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Key prefix for the default layout, `prefix + canon + "/" + id`
    pub prefix: String,

    /// Key suffix for non-binary objects
    pub suffix: String,

    /// Fixed base path overriding the prefix-based layout
    ///
    /// When set, all canons share one flat key namespace; identifiers must
    /// be disjoint across canons unless cross-canon aliasing is intended.
    pub folder: Option<String>,

    /// Per-canon encoding specs, keyed by canon name
    #[serde(default)]
    pub ent: HashMap<String, EntitySpec>,

    /// Connection options passed through to the S3 client
    #[serde(default)]
    pub s3: S3Options,

    /// Request defaults merged into every remote call
    #[serde(default)]
    pub shared: SharedOptions,

    /// Local filesystem stand-in settings
    #[serde(default)]
    pub local: LocalOptions,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            prefix: "seneca/db01/".to_string(),
            suffix: ".json".to_string(),
            folder: None,
            ent: HashMap::new(),
            s3: S3Options::default(),
            shared: SharedOptions::default(),
            local: LocalOptions::default(),
        }
    }
}

/// Per-canon encoding declaration
///
/// At most one of the two fields may be set; both set is rejected at store
/// construction. An empty spec means whole-document JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntitySpec {
    /// Array field persisted as JSON-Lines
    pub jsonl_field: Option<String>,

    /// Byte field persisted raw, with no key suffix
    pub binary_field: Option<String>,
}

/// Connection options for the S3 client
///
/// Opaque pass-through configuration: the adapter hands these to the SDK
/// and never reinterprets them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Options {
    /// Custom endpoint URL (MinIO, LocalStack, s3rver, etc.)
    pub endpoint_url: Option<String>,

    /// AWS region (default: "us-east-1")
    pub region: Option<String>,

    /// Static access key, for local stacks; omit to use the default chain
    pub access_key_id: Option<String>,

    /// Static secret key, paired with `access_key_id`
    pub secret_access_key: Option<String>,

    /// Path-style addressing (default: on, required for most local stacks)
    pub force_path_style: bool,
}

impl Default for S3Options {
    fn default() -> Self {
        Self {
            endpoint_url: None,
            region: Some("us-east-1".to_string()),
            access_key_id: None,
            secret_access_key: None,
            force_path_style: true,
        }
    }
}

/// Request defaults merged into every remote call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedOptions {
    /// Target bucket for every object operation
    pub bucket: String,
}

impl Default for SharedOptions {
    fn default() -> Self {
        Self {
            // Invalid bucket name; remote calls fail until one is configured
            bucket: "!not-a-bucket!".to_string(),
        }
    }
}

/// Local filesystem stand-in configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalOptions {
    /// Select the local backend instead of the remote one
    pub active: bool,

    /// Root directory for stored objects
    pub folder: String,

    /// How the root directory is suffixed at construction
    #[serde(default)]
    pub suffix: SuffixMode,
}

impl Default for LocalOptions {
    fn default() -> Self {
        Self {
            active: false,
            folder: ".".to_string(),
            suffix: SuffixMode::None,
        }
    }
}

/// Suffix applied to the local root directory
///
/// `Generated` appends a unique token once per store instance, so that
/// concurrent test/dev instances sharing a parent directory stay isolated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuffixMode {
    /// Use the configured root as-is
    #[default]
    None,

    /// Append a generated unique token to the root
    Generated,
}

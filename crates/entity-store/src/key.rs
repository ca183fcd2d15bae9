//! Storage key construction
//!
//! Keys follow the layout `<folder-or-(prefix+canon)>/<id><suffix>`. The
//! layout is a persisted format: objects written under one configuration
//! are only reachable again under the same prefix/folder/suffix values.

use store_core::StoreConfig;

/// Compute the storage key for an entity identifier
///
/// Returns `None` iff `id` is `None` — "no identity" propagates instead of
/// erroring. The base path is `config.folder` when set and non-empty,
/// otherwise `config.prefix + canon`. Binary-mode objects carry no suffix.
///
/// When `folder` is configured, every canon shares one flat key namespace:
/// identical identifiers across canons yield identical keys. Callers either
/// keep identifier spaces disjoint or rely on the overlap for aliasing.
pub fn build_key(
    id: Option<&str>,
    canon: &str,
    config: &StoreConfig,
    is_binary: bool,
) -> Option<String> {
    let id = id?;

    let base = match config.folder.as_deref() {
        Some(folder) if !folder.is_empty() => folder.to_string(),
        _ => format!("{}{}", config.prefix, canon),
    };

    let separator = if base.is_empty() || base.ends_with('/') {
        ""
    } else {
        "/"
    };

    let suffix = if is_binary { "" } else { config.suffix.as_str() };

    Some(format!("{}{}{}{}", base, separator, id, suffix))
}

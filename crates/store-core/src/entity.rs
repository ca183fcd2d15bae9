//! Entity model: one record instance of a canon plus its field map

use std::collections::BTreeMap;

use bytes::Bytes;
use serde_json::Value;

/// The type name of an entity record (its "table"/"collection" name)
pub type Canon = String;

/// A single field value
///
/// Every field is JSON-valued except a designated binary field, which holds
/// its payload as raw bytes and is persisted unmodified in binary mode.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// JSON-serializable data
    Json(Value),

    /// Raw bytes
    Bytes(Bytes),
}

impl FieldValue {
    /// The JSON value, if this field holds one
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            FieldValue::Json(value) => Some(value),
            FieldValue::Bytes(_) => None,
        }
    }

    /// The byte payload, if this field holds one
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            FieldValue::Json(_) => None,
            FieldValue::Bytes(bytes) => Some(bytes),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        FieldValue::Json(value)
    }
}

impl From<Bytes> for FieldValue {
    fn from(bytes: Bytes) -> Self {
        FieldValue::Bytes(bytes)
    }
}

/// One record instance of a canon
///
/// Carries an optional string identifier (caller-supplied or generated at
/// save time) and an ordered field map. The identifier lives outside the
/// field map; document-mode encoding folds it in under `"id"`.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    canon: String,
    id: Option<String>,
    fields: BTreeMap<String, FieldValue>,
}

impl Entity {
    /// Create an empty entity of the given canon, with no identifier
    pub fn new(canon: impl Into<String>) -> Self {
        Self {
            canon: canon.into(),
            id: None,
            fields: BTreeMap::new(),
        }
    }

    /// Create an empty entity with a caller-supplied identifier
    pub fn with_id(canon: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            canon: canon.into(),
            id: Some(id.into()),
            fields: BTreeMap::new(),
        }
    }

    /// Rebuild an entity from a decoded field map
    ///
    /// A string `"id"` member in the map (present in document-mode
    /// payloads) moves into the identifier slot; the caller is expected to
    /// overwrite it with the queried identifier afterwards.
    pub fn from_fields(canon: impl Into<String>, mut fields: BTreeMap<String, FieldValue>) -> Self {
        let id = match fields.remove("id") {
            Some(FieldValue::Json(Value::String(id))) => Some(id),
            Some(other) => {
                fields.insert("id".to_string(), other);
                None
            }
            None => None,
        };

        Self {
            canon: canon.into(),
            id,
            fields,
        }
    }

    /// The canon this entity belongs to
    pub fn canon(&self) -> &str {
        &self.canon
    }

    /// The entity identifier, if assigned
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Assign or overwrite the identifier
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    /// Add a JSON field (builder style)
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields
            .insert(name.into(), FieldValue::Json(value.into()));
        self
    }

    /// Add a binary field (builder style)
    pub fn binary(mut self, name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        self.fields
            .insert(name.into(), FieldValue::Bytes(bytes.into()));
        self
    }

    /// Insert or replace a field
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    /// Look up a field by name
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// The full field map, in name order
    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }
}

/// Per-call override of the per-canon entity spec
///
/// Instructs the store which field to use for an alternate encoding for one
/// save/load call. Takes precedence over the configured spec.
#[derive(Debug, Clone, Default)]
pub struct Directive {
    /// Persist the named array field as JSON-Lines for this call
    pub jsonl_field: Option<String>,

    /// Persist the named byte field raw for this call
    pub binary_field: Option<String>,
}

impl Directive {
    /// Directive selecting JSON-Lines encoding of the named field
    pub fn jsonl(field: impl Into<String>) -> Self {
        Self {
            jsonl_field: Some(field.into()),
            binary_field: None,
        }
    }

    /// Directive selecting raw binary encoding of the named field
    pub fn binary(field: impl Into<String>) -> Self {
        Self {
            jsonl_field: None,
            binary_field: Some(field.into()),
        }
    }
}

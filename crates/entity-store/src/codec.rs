//! Entity payload encoding and decoding
//!
//! Three physical representations of one logical entity: a whole-entity
//! JSON document, a JSON-Lines projection of one array field, or the raw
//! bytes of one binary field. The representation is resolved once per call
//! from configuration and directives — never from payload content — so the
//! decode mode is known before the object is read.

use std::collections::BTreeMap;

use bytes::Bytes;
use serde_json::{Map, Value};
use store_core::{Directive, Entity, EntitySpec, Error, FieldValue, Result};

/// Physical encoding of an entity payload, resolved once per call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoding {
    /// The whole entity as one JSON document
    Document,

    /// The named array field, one JSON line per element
    Lines(String),

    /// The named byte field, written raw
    Binary(String),
}

impl Encoding {
    /// Resolve the encoding for one call
    ///
    /// Precedence: call-level directive, then the per-canon entity spec,
    /// then whole-document JSON. Within each level a jsonl declaration wins
    /// over a binary one.
    pub fn resolve(directive: Option<&Directive>, spec: Option<&EntitySpec>) -> Self {
        if let Some(directive) = directive {
            if let Some(field) = &directive.jsonl_field {
                return Encoding::Lines(field.clone());
            }
            if let Some(field) = &directive.binary_field {
                return Encoding::Binary(field.clone());
            }
        }

        if let Some(spec) = spec {
            if let Some(field) = &spec.jsonl_field {
                return Encoding::Lines(field.clone());
            }
            if let Some(field) = &spec.binary_field {
                return Encoding::Binary(field.clone());
            }
        }

        Encoding::Document
    }

    /// True when objects of this encoding carry no key suffix
    pub fn is_binary(&self) -> bool {
        matches!(self, Encoding::Binary(_))
    }
}

/// Encode an entity's field data into the byte payload for its key
///
/// The identifier is expected to be resolved before encoding; document mode
/// folds it into the payload under `"id"`, the other modes leave it to the
/// key alone.
pub fn encode(entity: &Entity, encoding: &Encoding) -> Result<Bytes> {
    match encoding {
        Encoding::Document => {
            let mut map = Map::new();
            if let Some(id) = entity.id() {
                map.insert("id".to_string(), Value::String(id.to_string()));
            }
            for (name, value) in entity.fields() {
                map.insert(name.clone(), field_to_value(value));
            }
            Ok(Bytes::from(Value::Object(map).to_string()))
        }
        Encoding::Lines(field) => {
            let items = match entity.get(field).and_then(FieldValue::as_json) {
                Some(Value::Array(items)) => items,
                _ => {
                    return Err(Error::FieldNotArray {
                        field: field.clone(),
                    })
                }
            };

            let mut out = String::new();
            for item in items {
                out.push_str(&item.to_string());
                out.push('\n');
            }
            Ok(Bytes::from(out))
        }
        Encoding::Binary(field) => match entity.get(field) {
            Some(FieldValue::Bytes(bytes)) => Ok(bytes.clone()),
            _ => Err(Error::FieldMissing {
                field: field.clone(),
            }),
        },
    }
}

/// Decode a stored payload back into an entity field map
///
/// The caller sets the identifier on the reconstructed entity afterwards;
/// lines and binary payloads do not carry it at all.
pub fn decode(data: Bytes, encoding: &Encoding) -> Result<BTreeMap<String, FieldValue>> {
    match encoding {
        Encoding::Document => {
            let value: Value = serde_json::from_slice(&data).map_err(|e| Error::Decode {
                message: format!("invalid JSON document: {}", e),
            })?;

            let Value::Object(map) = value else {
                return Err(Error::Decode {
                    message: "stored document is not a JSON object".to_string(),
                });
            };

            Ok(map
                .into_iter()
                .map(|(name, value)| (name, FieldValue::Json(value)))
                .collect())
        }
        Encoding::Lines(field) => {
            let text = std::str::from_utf8(&data).map_err(|e| Error::Decode {
                message: format!("invalid UTF-8 in JSON-Lines payload: {}", e),
            })?;

            let mut items = Vec::new();
            for line in text.split('\n').filter(|line| !line.is_empty()) {
                let item: Value = serde_json::from_str(line).map_err(|e| Error::Decode {
                    message: format!("invalid JSON line: {}", e),
                })?;
                items.push(item);
            }

            let mut fields = BTreeMap::new();
            fields.insert(field.clone(), FieldValue::Json(Value::Array(items)));
            Ok(fields)
        }
        Encoding::Binary(field) => {
            let mut fields = BTreeMap::new();
            fields.insert(field.clone(), FieldValue::Bytes(data));
            Ok(fields)
        }
    }
}

/// Project a field into document-mode JSON
///
/// A byte field appearing in document mode serializes as an array of
/// numbers (serde's representation of byte vectors).
fn field_to_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Json(value) => value.clone(),
        FieldValue::Bytes(bytes) => Value::Array(bytes.iter().map(|b| Value::from(*b)).collect()),
    }
}

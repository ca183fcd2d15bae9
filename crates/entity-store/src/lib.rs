//! Entity Store - persistence façade over bucket-style object storage
//!
//! Maps the entity verb set (save/load/remove/list/close) onto put/get/
//! delete against string keys, with three physical encodings of the same
//! logical entity: whole-entity JSON document, JSON-Lines projection of one
//! array field, or the raw bytes of one binary field.
//!
//! # Example
//!
//! ```no_run
//! use entity_store::EntityStore;
//! use store_core::{Entity, StoreConfig};
//!
//! # async fn example() -> store_core::Result<()> {
//! let mut config = StoreConfig::default();
//! config.local.active = true;
//! config.local.folder = "/tmp/entities".to_string();
//!
//! let store = EntityStore::new(config).await?;
//! let saved = store.save(Entity::new("foo").field("x", 1)).await?;
//! let loaded = store.load("foo", saved.id().unwrap()).await?;
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod key;
pub mod store;

pub use codec::Encoding;
pub use store::{EntityStore, IdGenerator};

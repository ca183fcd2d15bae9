//! Store façade: the entity verb set over a storage backend
//!
//! Each verb runs one short pipeline: resolve key and encoding, encode
//! (save only), backend I/O, decode (load only), reply. The first failing
//! stage aborts the call; nothing is retried or compensated here.

use std::sync::Arc;

use storage::{LocalStorage, S3Storage, StorageBackend};
use store_core::{Directive, Entity, Error, Result, StoreConfig};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::codec::{self, Encoding};
use crate::key::build_key;

/// Generates identifiers for entities saved without one
pub type IdGenerator = Arc<dyn Fn() -> String + Send + Sync>;

/// Entity persistence façade over a construction-time-selected backend
///
/// The backend choice (`local.active`) and the configuration are fixed for
/// the instance's lifetime. Operations on different keys are independent
/// and may run concurrently; the store holds no per-call state.
pub struct EntityStore {
    config: StoreConfig,
    backend: Arc<dyn StorageBackend>,
    generate_id: IdGenerator,
}

impl EntityStore {
    /// Construct a store, selecting the backend from configuration
    pub async fn new(config: StoreConfig) -> Result<Self> {
        validate(&config)?;

        let backend: Arc<dyn StorageBackend> = if config.local.active {
            Arc::new(LocalStorage::from_options(&config.local))
        } else {
            Arc::new(S3Storage::new(&config.s3, &config.shared).await)
        };

        Ok(Self::assemble(config, backend))
    }

    /// Construct a store over an existing backend (tests, shared clients)
    pub fn with_backend(config: StoreConfig, backend: Arc<dyn StorageBackend>) -> Result<Self> {
        validate(&config)?;
        Ok(Self::assemble(config, backend))
    }

    fn assemble(config: StoreConfig, backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            config,
            backend,
            generate_id: Arc::new(|| Uuid::new_v4().simple().to_string()),
        }
    }

    /// Replace the generator used for identifier-less saves
    pub fn with_id_generator(mut self, generate_id: IdGenerator) -> Self {
        self.generate_id = generate_id;
        self
    }

    /// The live backend handle, for diagnostic use
    pub fn native(&self) -> Arc<dyn StorageBackend> {
        Arc::clone(&self.backend)
    }

    /// The store configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Save an entity, assigning a generated identifier when it has none
    ///
    /// Returns the confirmation entity with the identifier set.
    pub async fn save(&self, entity: Entity) -> Result<Entity> {
        self.save_with(entity, &Directive::default()).await
    }

    /// Save with a per-call encoding directive
    #[instrument(skip(self, entity, directive), fields(canon = %entity.canon()))]
    pub async fn save_with(&self, mut entity: Entity, directive: &Directive) -> Result<Entity> {
        let id = match entity.id() {
            Some(id) => id.to_string(),
            None => (self.generate_id)(),
        };
        entity.set_id(id.clone());

        let encoding = self.resolve_encoding(entity.canon(), directive);
        let key = self.key_for(&id, entity.canon(), &encoding)?;
        let payload = codec::encode(&entity, &encoding)?;

        debug!(%key, size = payload.len(), "Saving entity");
        self.backend.put(&key, payload).await?;

        Ok(entity)
    }

    /// Load the entity stored under the identifier
    ///
    /// A missing object is an empty result, not an error.
    pub async fn load(&self, canon: &str, id: &str) -> Result<Option<Entity>> {
        self.load_with(canon, id, &Directive::default()).await
    }

    /// Load with a per-call encoding directive
    ///
    /// The decode mode comes from configuration and the directive alone,
    /// resolved before the object is read.
    #[instrument(skip(self, directive), fields(canon = %canon))]
    pub async fn load_with(
        &self,
        canon: &str,
        id: &str,
        directive: &Directive,
    ) -> Result<Option<Entity>> {
        let encoding = self.resolve_encoding(canon, directive);
        let key = self.key_for(id, canon, &encoding)?;

        let payload = match self.backend.get(&key).await {
            Ok(payload) => payload,
            Err(e) if e.is_not_found() => {
                debug!(%key, "No entity under key");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let fields = codec::decode(payload, &encoding)?;
        let mut entity = Entity::from_fields(canon, fields);
        entity.set_id(id);

        Ok(Some(entity))
    }

    /// Remove the entity stored under the identifier
    ///
    /// Removing an absent entity succeeds; remove is idempotent.
    pub async fn remove(&self, canon: &str, id: &str) -> Result<()> {
        self.remove_with(canon, id, &Directive::default()).await
    }

    /// Remove with a per-call encoding directive (the directive decides
    /// whether the key carries a suffix)
    #[instrument(skip(self, directive), fields(canon = %canon))]
    pub async fn remove_with(&self, canon: &str, id: &str, directive: &Directive) -> Result<()> {
        let encoding = self.resolve_encoding(canon, directive);
        let key = self.key_for(id, canon, &encoding)?;

        debug!(%key, "Removing entity");
        match self.backend.delete(&key).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Listing by attribute is unsupported; the result is always empty
    pub async fn list(&self, _canon: &str) -> Result<Vec<Entity>> {
        Ok(Vec::new())
    }

    /// Release the store
    ///
    /// The backend owns whatever it holds; there is nothing else to free.
    pub async fn close(&self) -> Result<()> {
        Ok(())
    }

    fn resolve_encoding(&self, canon: &str, directive: &Directive) -> Encoding {
        Encoding::resolve(Some(directive), self.config.ent.get(canon))
    }

    fn key_for(&self, id: &str, canon: &str, encoding: &Encoding) -> Result<String> {
        build_key(Some(id), canon, &self.config, encoding.is_binary()).ok_or_else(|| {
            Error::InvalidConfig {
                message: "entity identifier is required to build a storage key".to_string(),
            }
        })
    }
}

/// Reject configurations that cannot be honored
fn validate(config: &StoreConfig) -> Result<()> {
    for (canon, spec) in &config.ent {
        if spec.jsonl_field.is_some() && spec.binary_field.is_some() {
            return Err(Error::InvalidConfig {
                message: format!(
                    "entity spec for '{}' declares both a jsonl and a binary field",
                    canon
                ),
            });
        }
    }
    Ok(())
}

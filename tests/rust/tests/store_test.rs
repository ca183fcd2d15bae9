use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use bytes::Bytes;
use entity_store::EntityStore;
use serde_json::{json, Value};
use store_core::{Directive, Entity, EntitySpec, FieldValue, StoreConfig, SuffixMode};
use tempfile::TempDir;

fn local_config(root: &Path) -> StoreConfig {
    let mut config = StoreConfig::default();
    config.local.active = true;
    config.local.folder = root.to_string_lossy().to_string();
    config
}

async fn local_store(root: &Path) -> Result<EntityStore> {
    Ok(EntityStore::new(local_config(root)).await?)
}

// Recursively collect every file under a directory
fn files_under(dir: &Path) -> Vec<std::path::PathBuf> {
    let mut files = Vec::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else {
                files.push(path);
            }
        }
    }
    files
}

#[tokio::test]
async fn test_save_without_id_generates_one() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = local_store(temp_dir.path()).await?;

    let saved = store.save(Entity::new("foo").field("x", 1)).await?;
    let id = saved.id().expect("save must assign an identifier");
    assert!(!id.is_empty());

    let loaded = store.load("foo", id).await?.expect("entity should exist");
    assert_eq!(loaded.id(), Some(id));
    assert_eq!(loaded.get("x").and_then(FieldValue::as_json), Some(&json!(1)));
    Ok(())
}

#[tokio::test]
async fn test_save_keeps_caller_supplied_id() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = local_store(temp_dir.path()).await?;

    let saved = store
        .save(Entity::with_id("foo", "a1").field("x", 2))
        .await?;
    assert_eq!(saved.id(), Some("a1"));

    let loaded = store.load("foo", "a1").await?.expect("entity should exist");
    assert_eq!(loaded.get("x").and_then(FieldValue::as_json), Some(&json!(2)));
    Ok(())
}

#[tokio::test]
async fn test_load_of_unknown_id_is_empty_not_error() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = local_store(temp_dir.path()).await?;

    assert!(store.load("foo", "not-a-file").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_remove_is_idempotent() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = local_store(temp_dir.path()).await?;

    let saved = store.save(Entity::new("foo").field("x", 1)).await?;
    let id = saved.id().unwrap().to_string();

    store.remove("foo", &id).await?;
    store.remove("foo", &id).await?;

    assert!(store.load("foo", &id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_document_layout_on_disk() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = local_store(temp_dir.path()).await?;

    store
        .save(Entity::with_id("foo", "a1").field("x", 1))
        .await?;

    let stored = std::fs::read(temp_dir.path().join("seneca/db01/foo/a1.json"))?;
    let doc: Value = serde_json::from_slice(&stored)?;
    assert_eq!(doc, json!({"id": "a1", "x": 1}));
    Ok(())
}

#[tokio::test]
async fn test_jsonl_entity_round_trip() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut config = local_config(temp_dir.path());
    config.ent.insert(
        "bar".to_string(),
        EntitySpec {
            jsonl_field: Some("items".to_string()),
            binary_field: None,
        },
    );
    let store = EntityStore::new(config).await?;

    let items = json!([{"v": 1}, {"v": 2}]);
    let saved = store
        .save(Entity::new("bar").field("items", items.clone()))
        .await?;
    let id = saved.id().unwrap();

    // The stored payload is one JSON line per element
    let path = temp_dir.path().join(format!("seneca/db01/bar/{}.json", id));
    assert_eq!(std::fs::read(&path)?, b"{\"v\":1}\n{\"v\":2}\n");

    let loaded = store.load("bar", id).await?.expect("entity should exist");
    assert_eq!(
        loaded.get("items").and_then(FieldValue::as_json),
        Some(&items)
    );
    assert_eq!(loaded.id(), Some(id));
    Ok(())
}

#[tokio::test]
async fn test_binary_entity_round_trip() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut config = local_config(temp_dir.path());
    config.ent.insert(
        "zed".to_string(),
        EntitySpec {
            jsonl_field: None,
            binary_field: Some("blob".to_string()),
        },
    );
    let store = EntityStore::new(config).await?;

    let payload = Bytes::from_static(&[0, 1, 2]);
    let saved = store
        .save(Entity::new("zed").binary("blob", payload.clone()))
        .await?;
    let id = saved.id().unwrap();

    // Binary objects carry no key suffix and are stored verbatim
    let path = temp_dir.path().join(format!("seneca/db01/zed/{}", id));
    assert_eq!(std::fs::read(&path)?, &payload[..]);

    let loaded = store.load("zed", id).await?.expect("entity should exist");
    assert_eq!(
        loaded.get("blob").and_then(FieldValue::as_bytes),
        Some(&payload)
    );
    Ok(())
}

#[tokio::test]
async fn test_directive_overrides_entity_spec() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = local_store(temp_dir.path()).await?;

    let items = json!([{"v": 1}, {"v": 2}]);
    let directive = Directive::jsonl("items");
    let saved = store
        .save_with(
            Entity::with_id("foo", "a1").field("items", items.clone()),
            &directive,
        )
        .await?;

    let path = temp_dir.path().join("seneca/db01/foo/a1.json");
    assert_eq!(std::fs::read(&path)?, b"{\"v\":1}\n{\"v\":2}\n");

    let loaded = store
        .load_with("foo", saved.id().unwrap(), &directive)
        .await?
        .expect("entity should exist");
    assert_eq!(
        loaded.get("items").and_then(FieldValue::as_json),
        Some(&items)
    );
    Ok(())
}

#[tokio::test]
async fn test_failed_lines_encoding_writes_nothing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut config = local_config(temp_dir.path());
    config.ent.insert(
        "bar".to_string(),
        EntitySpec {
            jsonl_field: Some("items".to_string()),
            binary_field: None,
        },
    );
    let store = EntityStore::new(config).await?;

    let result = store
        .save(Entity::new("bar").field("items", json!("not-an-array")))
        .await;
    assert!(result.unwrap_err().is_encoding());

    assert!(files_under(temp_dir.path()).is_empty());
    Ok(())
}

#[tokio::test]
async fn test_folder_collapses_canons_into_one_namespace() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut config = local_config(temp_dir.path());
    config.folder = Some("flat".to_string());
    let store = EntityStore::new(config).await?;

    store
        .save(Entity::with_id("foo", "a1").field("x", 1))
        .await?;
    assert!(temp_dir.path().join("flat/a1.json").is_file());

    // Same id under a different canon resolves to the same object
    let aliased = store.load("bar", "a1").await?.expect("aliased entity");
    assert_eq!(aliased.get("x").and_then(FieldValue::as_json), Some(&json!(1)));
    Ok(())
}

#[tokio::test]
async fn test_generated_suffix_isolates_store_instances() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut config = local_config(&temp_dir.path().join("store"));
    config.local.suffix = SuffixMode::Generated;

    let first = EntityStore::new(config.clone()).await?;
    let second = EntityStore::new(config).await?;

    first
        .save(Entity::with_id("foo", "a1").field("x", 1))
        .await?;
    second
        .save(Entity::with_id("foo", "a1").field("x", 2))
        .await?;

    let from_first = first.load("foo", "a1").await?.unwrap();
    let from_second = second.load("foo", "a1").await?.unwrap();
    assert_eq!(from_first.get("x").and_then(FieldValue::as_json), Some(&json!(1)));
    assert_eq!(from_second.get("x").and_then(FieldValue::as_json), Some(&json!(2)));
    Ok(())
}

#[tokio::test]
async fn test_list_is_empty_and_close_succeeds() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = local_store(temp_dir.path()).await?;

    store.save(Entity::new("foo").field("x", 1)).await?;
    assert!(store.list("foo").await?.is_empty());

    store.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_native_handle_reaches_raw_objects() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = local_store(temp_dir.path()).await?;

    store
        .save(Entity::with_id("foo", "a1").field("x", 1))
        .await?;

    let backend = store.native();
    let raw = backend.get("seneca/db01/foo/a1.json").await?;
    let doc: Value = serde_json::from_slice(&raw)?;
    assert_eq!(doc["x"], json!(1));

    backend
        .put("seneca/db01/foo/a2.json", Bytes::from_static(b"{\"x\":9}"))
        .await?;
    let injected = store.load("foo", "a2").await?.expect("injected entity");
    assert_eq!(injected.get("x").and_then(FieldValue::as_json), Some(&json!(9)));
    Ok(())
}

#[tokio::test]
async fn test_concurrent_saves_on_distinct_keys() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = Arc::new(local_store(temp_dir.path()).await?);

    let mut handles = Vec::new();
    for i in 0..8 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store
                .save(Entity::with_id("foo", format!("id-{}", i)).field("x", i))
                .await
        }));
    }

    for handle in handles {
        handle.await?.expect("save should succeed");
    }

    for i in 0..8 {
        let loaded = store.load("foo", &format!("id-{}", i)).await?.unwrap();
        assert_eq!(
            loaded.get("x").and_then(FieldValue::as_json),
            Some(&json!(i))
        );
    }
    Ok(())
}

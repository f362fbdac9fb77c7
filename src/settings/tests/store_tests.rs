use super::*;
use crate::settings::data_store::{FileDataStore, MemoryDataStore};
use crate::settings::identity::UuidGenerator;
use serde_json::json;
use tempfile::TempDir;

async fn open_memory_store() -> (Arc<MemoryDataStore>, SettingsStore) {
    let data = Arc::new(MemoryDataStore::new());
    let store = SettingsStore::open(
        data.clone(),
        &OperatorConfig::default_config(),
        &UuidGenerator,
    )
    .await
    .unwrap();
    (data, store)
}

#[tokio::test]
async fn test_open_fresh_install_returns_defaults() {
    let (_data, store) = open_memory_store().await;

    let settings = store.get().await.unwrap();
    assert!(!settings.oid.is_empty());
    assert_eq!(settings.plan, Plan::hobby());
    assert_eq!(settings.name, "");
    assert_eq!(settings.duration, 0.0);
    assert_eq!(store.current(), settings);
}

#[tokio::test]
async fn test_set_name_changes_only_name() {
    let (data, store) = open_memory_store().await;
    let before = store.get().await.unwrap();

    store.set_name("Ada").await.unwrap();

    let after = store.get().await.unwrap();
    assert_eq!(after.name, "Ada");
    assert_eq!(Settings { name: String::new(), ..after.clone() }, before);

    let persisted = data.load().await.unwrap().unwrap();
    assert_eq!(persisted["name"], json!("Ada"));
}

#[tokio::test]
async fn test_set_duration() {
    let (_data, store) = open_memory_store().await;

    let settings = store.set_duration(95.5).await.unwrap();
    assert_eq!(settings.duration, 95.5);
    assert_eq!(store.get().await.unwrap().duration, 95.5);
}

#[tokio::test]
async fn test_set_duration_rejects_negative_minutes() {
    let (data, store) = open_memory_store().await;
    let before = data.raw();

    assert!(store.set_duration(-1.0).await.is_err());
    assert!(store.set_duration(f64::NAN).await.is_err());
    assert_eq!(data.raw(), before);
}

#[tokio::test]
async fn test_set_plan_replaces_variant() {
    let (_data, store) = open_memory_store().await;
    store
        .set_plan(Plan::professional(Some("ada@x.com".to_string())))
        .await
        .unwrap();

    let settings = store.set_plan(Plan::hobby()).await.unwrap();
    assert_eq!(settings.plan, Plan::hobby());
    assert_eq!(settings.plan.email(), None);
}

#[tokio::test]
async fn test_save_overwrites_whole_record() {
    let (data, store) = open_memory_store().await;
    let mut settings = store.get().await.unwrap();
    settings.name = "Grace".to_string();
    settings.duration = 12.0;

    store.save(&settings).await.unwrap();

    assert_eq!(store.get().await.unwrap(), settings);
    assert_eq!(data.load().await.unwrap().unwrap(), settings.to_value());
}

#[tokio::test]
async fn test_subscribers_see_saved_record() {
    let (_data, store) = open_memory_store().await;
    let mut changes = store.subscribe();

    store.set_name("Ada").await.unwrap();

    assert!(changes.has_changed().unwrap());
    assert_eq!(changes.borrow_and_update().name, "Ada");
}

#[tokio::test]
async fn test_concurrent_updates_are_not_lost() {
    let (_data, store) = open_memory_store().await;

    let (name, duration) = tokio::join!(store.set_name("Ada"), store.set_duration(30.0));
    name.unwrap();
    duration.unwrap();

    let settings = store.get().await.unwrap();
    assert_eq!(settings.name, "Ada");
    assert_eq!(settings.duration, 30.0);
}

#[tokio::test]
async fn test_get_fails_when_storage_was_cleared() {
    let data = Arc::new(MemoryDataStore::new());
    let store = SettingsStore::open(
        data.clone(),
        &OperatorConfig::default_config(),
        &UuidGenerator,
    )
    .await
    .unwrap();

    let cleared: Arc<dyn DataStore> = Arc::new(MemoryDataStore::new());
    let orphan = SettingsStore {
        data: cleared,
        write_lock: Mutex::new(()),
        changes: watch::channel(store.current()).0,
    };

    assert!(orphan.get().await.is_err());
}

#[tokio::test]
async fn test_open_file_store_keeps_oid_across_restarts() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.json");
    let operator = OperatorConfig::default_config();

    let first = SettingsStore::open(
        Arc::new(FileDataStore::new(path.clone())),
        &operator,
        &UuidGenerator,
    )
    .await
    .unwrap();
    first.set_name("Ada").await.unwrap();
    let oid = first.get().await.unwrap().oid;

    let second = SettingsStore::open(Arc::new(FileDataStore::new(path)), &operator, &UuidGenerator)
        .await
        .unwrap();
    let settings = second.get().await.unwrap();
    assert_eq!(settings.oid, oid);
    assert_eq!(settings.name, "Ada");
}

#[tokio::test]
async fn test_save_refuses_changed_oid() {
    let (data, store) = open_memory_store().await;
    let before = data.raw();

    let mut settings = store.get().await.unwrap();
    settings.oid = "someone-else".to_string();

    assert!(store.save(&settings).await.is_err());
    assert_eq!(data.raw(), before);
    assert_ne!(store.current().oid, "someone-else");
}

#[tokio::test]
async fn test_update_refuses_changed_oid() {
    let (data, store) = open_memory_store().await;
    let before = data.raw();
    let oid = store.get().await.unwrap().oid;

    let result = store
        .update(|settings| {
            settings.name = "Ada".to_string();
            settings.oid = "someone-else".to_string();
        })
        .await;

    assert!(result.is_err());
    assert_eq!(data.raw(), before);
    assert_eq!(store.get().await.unwrap().oid, oid);
}

#[tokio::test]
async fn test_fractional_duration_survives_reload() {
    let (data, store) = open_memory_store().await;

    store.set_duration(904.8994063690001).await.unwrap();

    assert_eq!(store.get().await.unwrap().duration, 904.8994063690001);
    assert_eq!(store.current(), store.get().await.unwrap());

    let saved = data.raw();
    let reopened = SettingsStore::open(
        data.clone(),
        &OperatorConfig::default_config(),
        &UuidGenerator,
    )
    .await
    .unwrap();
    assert_eq!(data.raw(), saved);
    assert_eq!(reopened.get().await.unwrap().duration, 904.8994063690001);
}

#[tokio::test]
async fn test_fractional_duration_survives_file_reload() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.json");
    let operator = OperatorConfig::default_config();

    let first = SettingsStore::open(
        Arc::new(FileDataStore::new(path.clone())),
        &operator,
        &UuidGenerator,
    )
    .await
    .unwrap();
    first.set_duration(0.1 + 0.2).await.unwrap();

    let second = SettingsStore::open(Arc::new(FileDataStore::new(path)), &operator, &UuidGenerator)
        .await
        .unwrap();
    assert_eq!(second.get().await.unwrap().duration, 0.1 + 0.2);
}

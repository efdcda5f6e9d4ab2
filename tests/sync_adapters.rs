use parking_lot::RwLock;
use shardmap::ShardMap;
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;
use underdb::adapters::{JsonFileSync, LocalStorage, MemorySync};
use underdb::{Error, JsonCodec, KeyValueStore, MemoryStorage, SyncAdapter};

// ---- MemorySync ---------------------------------------------------------------

#[test]
fn memory_starts_missing_and_roundtrips() {
    let mem = MemorySync::<Vec<i32>>::new();
    assert_eq!(mem.read().unwrap(), None);
    mem.write(Some(&vec![1, 2, 3])).unwrap();
    assert_eq!(mem.read().unwrap(), Some(vec![1, 2, 3]));
    mem.write(None).unwrap();
    assert_eq!(mem.read().unwrap(), None);
}

// ---- LocalStorage ---------------------------------------------------------------

#[test]
fn local_storage_absent_key_reads_none() {
    let storage = LocalStorage::<String, _>::new(MemoryStorage::new(), "db");
    assert_eq!(storage.read().unwrap(), None);
}

#[test]
fn local_storage_writes_compact_json_under_key() {
    let store = Arc::new(MemoryStorage::new());
    let storage = LocalStorage::<HashMap<String, u8>, _>::new(Arc::clone(&store), "db");
    let value: HashMap<String, u8> = [("a".to_string(), 1)].into();
    storage.write(Some(&value)).unwrap();

    assert_eq!(store.get_item("db").unwrap().as_deref(), Some(r#"{"a":1}"#));
    assert_eq!(storage.read().unwrap(), Some(value));
    assert_eq!(store.len(), 1);
}

#[test]
fn local_storage_keys_are_independent() {
    let store = Arc::new(MemoryStorage::new());
    let left = LocalStorage::<u32, _>::new(Arc::clone(&store), "left");
    let right = LocalStorage::<u32, _>::new(Arc::clone(&store), "right");
    left.write(Some(&1)).unwrap();
    right.write(Some(&2)).unwrap();
    assert_eq!(left.read().unwrap(), Some(1));
    assert_eq!(right.read().unwrap(), Some(2));
    assert_eq!(left.key(), "left");
}

#[test]
fn local_storage_pretty_codec() {
    let store = Arc::new(MemoryStorage::new());
    let storage =
        LocalStorage::<Vec<u8>, _>::new(Arc::clone(&store), "db").with_codec(JsonCodec::pretty());
    storage.write(Some(&vec![1])).unwrap();
    assert_eq!(store.get_item("db").unwrap().as_deref(), Some("[\n  1\n]"));
}

#[test]
fn codec_reports_its_layout() {
    assert!(JsonCodec::pretty().is_pretty());
    assert!(!JsonCodec::new().is_pretty());
    assert!(!JsonCodec::default().is_pretty());
}

#[test]
fn local_storage_garbage_is_corrupt() {
    let store = Arc::new(MemoryStorage::new());
    store.set_item("db", "nope".into()).unwrap();
    let storage = LocalStorage::<u32, _>::new(Arc::clone(&store), "db");
    assert!(matches!(storage.read(), Err(Error::Corrupt(_))));
}

#[test]
fn local_storage_on_rwlock_hashmap() {
    let storage = LocalStorage::<String, _>::new(RwLock::new(HashMap::new()), "k");
    storage.write(Some(&"v".to_string())).unwrap();
    assert_eq!(storage.read().unwrap(), Some("v".to_string()));
    assert_eq!(storage.store().read().len(), 1);
}

#[test]
fn local_storage_on_shardmap() {
    let storage = LocalStorage::<i64, _>::new(ShardMap::<String, String>::default(), "n");
    assert_eq!(storage.read().unwrap(), None);
    storage.write(Some(&-5)).unwrap();
    assert_eq!(storage.read().unwrap(), Some(-5));
}

#[test]
fn local_storage_remove_item_reads_none_again() {
    let store = Arc::new(MemoryStorage::new());
    let storage = LocalStorage::<u32, _>::new(Arc::clone(&store), "db");
    storage.write(Some(&1)).unwrap();
    assert_eq!(store.remove_item("db").as_deref(), Some("1"));
    assert!(store.is_empty());
    assert_eq!(storage.read().unwrap(), None);
}

#[cfg(feature = "dashmap")]
mod dashmap_tests {
    use dashmap::DashMap;
    use underdb::adapters::LocalStorage;
    use underdb::SyncAdapter;

    #[test]
    fn local_storage_on_dashmap() {
        let storage = LocalStorage::<Vec<String>, _>::new(DashMap::<String, String>::new(), "list");
        storage.write(Some(&vec!["a".to_string()])).unwrap();
        assert_eq!(storage.read().unwrap(), Some(vec!["a".to_string()]));
    }
}

// ---- JsonFileSync ---------------------------------------------------------------

#[test]
fn file_missing_reads_none() {
    let dir = TempDir::new().unwrap();
    let file = JsonFileSync::<u32>::new(dir.path().join("db.json"));
    assert_eq!(file.read().unwrap(), None);
}

#[test]
fn file_roundtrip_and_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("db.json");
    let file = JsonFileSync::<HashMap<String, Vec<u32>>>::new(&path);
    let value: HashMap<String, Vec<u32>> = [("xs".to_string(), vec![1, 2])].into();
    file.write(Some(&value)).unwrap();
    assert_eq!(file.read().unwrap(), Some(value));
    assert_eq!(file.path(), path.as_path());
}

#[test]
fn file_last_write_wins() {
    let dir = TempDir::new().unwrap();
    let file = JsonFileSync::<u32>::new(dir.path().join("db.json"));
    for i in 0..=10 {
        file.write(Some(&i)).unwrap();
    }
    assert_eq!(file.read().unwrap(), Some(10));
}

#[test]
fn file_reads_hand_written_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("db.json");
    std::fs::write(&path, "{\n  \"a\": 1\n}").unwrap();
    let file = JsonFileSync::<HashMap<String, u32>>::new(&path);
    let expected: HashMap<String, u32> = [("a".to_string(), 1)].into();
    assert_eq!(file.read().unwrap(), Some(expected));
}

#[test]
fn file_non_string_keys_fail_to_serialize() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("db.json");
    let file = JsonFileSync::<HashMap<(u8, u8), u8>>::new(&path);
    let value: HashMap<(u8, u8), u8> = [((1, 2), 3)].into();
    assert!(matches!(file.write(Some(&value)), Err(Error::Serialize(_))));
    assert!(!path.exists());
}

#[test]
fn file_path_without_name_is_config_error() {
    let file = JsonFileSync::<u32>::new("/");
    assert!(matches!(file.write(Some(&1)), Err(Error::Config(_))));
}

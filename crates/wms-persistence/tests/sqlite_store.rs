use flow::{JsonProcessStore, KeyValueStore, Process, ProcessStore, SealedStore};
use serde_json::json;
use std::thread;
use wms_persistence::DieselKeyValueStore;

fn db_url(dir: &tempfile::TempDir) -> String {
  dir.path().join("process.db").to_string_lossy().into_owned()
}

fn process() -> Process {
  let mut p = Process::default();
  p.complete(10, json!({"movement": {"id": "m1", "quantity": 3.5}}).as_object().cloned().unwrap());
  p.enter(20);
  p
}

#[test]
fn processes_survive_reopening_the_database() {
  let dir = tempfile::tempdir().unwrap();
  let url = db_url(&dir);
  {
    let store = JsonProcessStore::new(DieselKeyValueStore::new(&url).unwrap());
    store.set("movementToProcess:op-1", &process()).unwrap();
  }
  let store = JsonProcessStore::new(DieselKeyValueStore::new(&url).unwrap());
  assert_eq!(store.get("movementToProcess:op-1"), process());
  assert_eq!(store.list().unwrap(), vec!["movementToProcess:op-1".to_string()]);
}

#[test]
fn writes_replace_and_deletes_are_idempotent() {
  let dir = tempfile::tempdir().unwrap();
  let kv = DieselKeyValueStore::new(&db_url(&dir)).unwrap();
  kv.put_raw("pack:a", "{\"currentStep\":10}").unwrap();
  kv.put_raw("pack:a", "{\"currentStep\":20}").unwrap();
  kv.put_raw("pack:b", "{}").unwrap();
  assert_eq!(kv.get_raw("pack:a").unwrap().as_deref(), Some("{\"currentStep\":20}"));
  assert_eq!(kv.keys().unwrap(), vec!["pack:a".to_string(), "pack:b".to_string()]);
  kv.remove("pack:a").unwrap();
  kv.remove("pack:a").unwrap();
  assert!(kv.get_raw("pack:a").unwrap().is_none());
}

#[test]
fn garbage_rows_read_as_empty_processes() {
  let dir = tempfile::tempdir().unwrap();
  let kv = DieselKeyValueStore::new(&db_url(&dir)).unwrap();
  kv.put_raw("pack:x", "not json").unwrap();
  let store = JsonProcessStore::new(kv);
  assert!(store.get("pack:x").is_empty());
}

#[test]
fn sealed_store_over_sqlite_round_trips() {
  let dir = tempfile::tempdir().unwrap();
  let kv = DieselKeyValueStore::new(&db_url(&dir)).unwrap();
  let store = JsonProcessStore::new(SealedStore::new(kv.clone(), "s3cret"));
  store.set("pack:s", &process()).unwrap();
  assert_eq!(store.get("pack:s"), process());
  let raw = kv.get_raw("pack:s").unwrap().unwrap();
  assert!(!raw.contains("movement"));
}

#[test]
fn concurrent_writers_on_one_file_all_succeed() {
  let dir = tempfile::tempdir().unwrap();
  let kv = DieselKeyValueStore::new(&db_url(&dir)).unwrap();
  let workers: Vec<_> = (0..4).map(|t| {
                                let kv = kv.clone();
                                thread::spawn(move || {
                                  (0..150).filter(|i| {
                                             let value = format!("{{\"currentStep\":{}}}", i);
                                             kv.put_raw(&format!("pack:op-{}", t), &value).is_err()
                                           })
                                           .count()
                                })
                              })
                              .collect();
  let failures: Vec<usize> = workers.into_iter().map(|w| w.join().unwrap()).collect();
  assert_eq!(failures, vec![0, 0, 0, 0]);
  assert_eq!(kv.keys().unwrap().len(), 4);
  assert_eq!(kv.get_raw("pack:op-3").unwrap().as_deref(), Some("{\"currentStep\":149}"));
}

#[test]
fn in_memory_database_keeps_migrations_and_rows() {
  let kv = DieselKeyValueStore::new(":memory:").unwrap();
  kv.put_raw("pack:m", "{}").unwrap();
  let other = kv.clone();
  let seen = thread::spawn(move || other.get_raw("pack:m").unwrap()).join().unwrap();
  assert_eq!(seen.as_deref(), Some("{}"));
  assert_eq!(kv.keys().unwrap(), vec!["pack:m".to_string()]);
}

use lunchsquad::catalog::Catalog;
use lunchsquad::model::{Candidate, DeliMeal, KebabMeal, Modifier};
use lunchsquad::store::{Fetched, FsBackend, OrderStore, Persisted, StorageBackend, Tiered};
use serde_json::json;
use std::fs;

fn open<'a>(
    cache: &'a FsBackend,
    durable: &'a FsBackend,
) -> OrderStore<&'a FsBackend, &'a FsBackend> {
    OrderStore::open(Tiered::new(cache, durable), Catalog::default(), "default")
}

#[test]
fn test_save_writes_one_file_per_key_and_no_temp_files() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FsBackend::new(dir.path().join("data"));

    backend.save("default.orders", &json!([])).unwrap();
    backend.save("default.orders", &json!([{"a": 1}])).unwrap();

    let names: Vec<String> = fs::read_dir(backend.root())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["default.orders.json"]);
    assert_eq!(
        backend.load("default.orders").unwrap(),
        Some(json!([{"a": 1}]))
    );
}

#[test]
fn test_list_keys_and_delete() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FsBackend::new(dir.path());
    backend.save("default.orders", &json!([])).unwrap();
    backend.save("default.votes", &json!({})).unwrap();
    fs::write(dir.path().join(".hidden.json"), "{}").unwrap();

    let keys: Vec<String> = backend.list_keys().unwrap().into_iter().collect();
    assert_eq!(keys, vec!["default.orders", "default.votes"]);

    assert!(backend.delete("default.votes").unwrap());
    assert!(!backend.delete("default.votes").unwrap());
    assert!(backend.save("../escape", &json!(1)).is_err());
}

#[test]
fn test_orders_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let cache = FsBackend::new(dir.path().join("cache"));
    let durable = FsBackend::new(dir.path().join("data"));

    {
        let mut store = open(&cache, &durable);
        store.add(&Candidate::numbered("Anna", "12")).unwrap();
        store
            .add(&Candidate::kebab(
                "Jörg",
                KebabMeal::new("king", "durum")
                    .with_sauces(["knoblauch"])
                    .with_modifiers(vec![Modifier::custom("extra Feta")]),
            ))
            .unwrap();
        store
            .add(&Candidate::deli(
                "Zoë",
                DeliMeal::new("Leberkässemmel").with_sauce("Senf"),
            ))
            .unwrap();
        assert_eq!(store.durability(), Persisted::Durable);
    }

    let store = open(&cache, &durable);
    let names: Vec<&str> = store.orders().iter().map(|o| o.submitter.as_str()).collect();
    assert_eq!(names, vec!["Anna", "Jörg", "Zoë"]);
}

#[test]
fn test_read_repair_refills_a_wiped_cache() {
    let dir = tempfile::tempdir().unwrap();
    let cache = FsBackend::new(dir.path().join("cache"));
    let durable = FsBackend::new(dir.path().join("data"));

    {
        let mut store = open(&cache, &durable);
        store.add(&Candidate::numbered("Anna", "7")).unwrap();
    }
    fs::remove_dir_all(cache.root()).unwrap();

    let tiered = Tiered::new(&cache, &durable);
    match tiered.fetch::<serde_json::Value>("default.orders") {
        Fetched::Durable(_) => {}
        other => panic!("expected a durable hit, got {:?}", other.into_value()),
    }
    assert!(cache.load("default.orders").unwrap().is_some());

    match tiered.fetch::<serde_json::Value>("default.orders") {
        Fetched::Cache(_) => {}
        other => panic!("expected a cache hit, got {:?}", other.into_value()),
    }
}

#[test]
fn test_corrupt_cache_falls_back_to_durable() {
    let dir = tempfile::tempdir().unwrap();
    let cache = FsBackend::new(dir.path().join("cache"));
    let durable = FsBackend::new(dir.path().join("data"));

    {
        let mut store = open(&cache, &durable);
        store.add(&Candidate::numbered("Anna", "7")).unwrap();
    }
    cache.save("default.orders", &json!({"not": "a list"})).unwrap();

    let store = open(&cache, &durable);
    assert_eq!(store.len(), 1);
    assert_eq!(store.orders()[0].submitter, "Anna");
}

//! Tests of the mock backend: credentials, collection CRUD, durability.

use mycoscan::session::Identification;
use mycoscan::store::{
    FileStorage, MemoryStorage, MockRemoteStore, Observation, StoreError, COLLECTION_KEY,
};
use proptest::prelude::*;
use std::time::Duration;

fn store() -> MockRemoteStore {
    MockRemoteStore::new(MemoryStorage::new(), Duration::ZERO)
}

fn observation(name: &str, confidence: f64) -> Observation {
    Observation::from_identification(Identification {
        name: name.to_string(),
        desc: format!("{} description", name),
        region: "Northern Hemisphere".to_string(),
        edibility: "Unknown".to_string(),
        confidence,
    })
}

#[tokio::test]
async fn credentials_scenario() {
    let store = store();

    assert!(matches!(
        store.sign_in("", "x").await,
        Err(StoreError::InvalidCredentials)
    ));

    let handle = store.sign_in("a@b.com", "secret").await.unwrap();
    assert_eq!(handle.identifier, "a@b.com");
}

#[tokio::test]
async fn delete_removes_exactly_one_record() {
    let store = store();
    let a = store.insert(observation("Boletus", 0.7)).await.unwrap();
    let b = store.insert(observation("Russula", 0.6)).await.unwrap();
    let c = store.insert(observation("Mycena", 0.5)).await.unwrap();

    store.delete(b.id).await.unwrap();

    let records = store.select().await.unwrap();
    let ids: Vec<u64> = records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![c.id, a.id]);
    assert_eq!(records[0].name, "Mycena");
    assert_eq!(records[1].name, "Boletus");
}

#[tokio::test]
async fn delete_of_absent_id_reports_success_and_changes_nothing() {
    let store = store();
    store.insert(observation("Boletus", 0.7)).await.unwrap();
    let before = store.select().await.unwrap();

    store.delete(u64::MAX).await.unwrap();

    let after = store.select().await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn collection_survives_reopening_the_store() {
    let dir = tempfile::tempdir().unwrap();

    let first = MockRemoteStore::new(
        FileStorage::new(dir.path().to_path_buf()),
        Duration::ZERO,
    );
    let saved = first.insert(observation("Tuber", 0.9)).await.unwrap();
    drop(first);

    let second = MockRemoteStore::new(
        FileStorage::new(dir.path().to_path_buf()),
        Duration::ZERO,
    );
    let records = second.select().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0], saved);
}

#[tokio::test]
async fn persisted_blob_is_a_plain_json_array() {
    let dir = tempfile::tempdir().unwrap();
    let store = MockRemoteStore::new(
        FileStorage::new(dir.path().to_path_buf()),
        Duration::ZERO,
    );
    store.insert(observation("Pleurotus", 0.8)).await.unwrap();

    let blob =
        std::fs::read_to_string(dir.path().join(format!("{COLLECTION_KEY}.json"))).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&blob).unwrap();
    let array = parsed.as_array().expect("collection serializes as an array");
    assert_eq!(array.len(), 1);
    assert_eq!(array[0]["name"], "Pleurotus");
}

proptest! {
    // Inserting any sequence of distinct payloads and selecting afterwards
    // returns exactly those records, newest first, each with a unique id.
    #[test]
    fn collection_round_trip(names in prop::collection::vec("[a-z]{1,12}", 0..20)) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let store = store();
            for (i, name) in names.iter().enumerate() {
                let confidence = (i as f64 % 100.0) / 100.0;
                store.insert(observation(name, confidence)).await.unwrap();
            }

            let records = store.select().await.unwrap();
            prop_assert_eq!(records.len(), names.len());

            // Newest first: reverse of insertion order.
            let listed: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
            let expected: Vec<&str> = names.iter().rev().map(String::as_str).collect();
            prop_assert_eq!(listed, expected);

            let mut ids: Vec<u64> = records.iter().map(|r| r.id).collect();
            ids.sort_unstable();
            ids.dedup();
            prop_assert_eq!(ids.len(), records.len());
            Ok(())
        })?;
    }

    // Deleting ids one at a time never disturbs the other records.
    #[test]
    fn deletion_preserves_all_other_records(count in 1usize..10, victim in 0usize..10) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let store = store();
            for i in 0..count {
                store.insert(observation(&format!("species{i}"), 0.5)).await.unwrap();
            }

            let before = store.select().await.unwrap();
            let victim_id = before[victim % count].id;
            store.delete(victim_id).await.unwrap();

            let after = store.select().await.unwrap();
            let expected: Vec<_> = before
                .iter()
                .filter(|record| record.id != victim_id)
                .cloned()
                .collect();
            prop_assert_eq!(after, expected);
            Ok(())
        })?;
    }
}

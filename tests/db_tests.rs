//! tests/db_tests.rs

mod common;
use common::{init_tracing, sample_bytes};

use std::sync::Arc;

use encrypted_image_vault::{
    ArtifactStore, CoreError, EncryptionPipeline, RecordRegistry, SqliteRegistry,
};

#[test]
fn records_survive_reopening_the_database() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("state").join("images.db");
    let payload = sample_bytes(500);

    let record = {
        let registry = SqliteRegistry::open(&db_path).expect("open registry");
        let pipeline = EncryptionPipeline::new(ArtifactStore::new(dir.path()), registry);
        pipeline.ingest("scan.tiff", &payload).unwrap()
    };

    let registry = SqliteRegistry::open(&db_path).expect("reopen registry");
    let stored = registry.lookup(record.id).unwrap().expect("record persisted");
    assert_eq!(stored.source_path, record.source_path);
    assert_eq!(stored.encrypted_path, record.encrypted_path);
    assert_eq!(stored.decrypted_path, record.decrypted_path);
    assert_eq!(stored.key_hex, record.key_hex);
    assert_eq!(stored.created_at, record.created_at);

    let pipeline = EncryptionPipeline::new(ArtifactStore::new(dir.path()), registry);
    assert_eq!(pipeline.decrypt_on_demand(record.id).unwrap(), payload);
    pipeline.verify(record.id).unwrap();
}

#[test]
fn open_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("a").join("b").join("images.db");
    let registry = SqliteRegistry::open(&db_path).unwrap();
    assert!(db_path.exists());
    registry.close().unwrap();
}

#[test]
fn ids_are_not_reused_after_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("images.db");
    let pipeline_root = dir.path().join("artifacts");

    let first = {
        let registry = SqliteRegistry::open(&db_path).unwrap();
        let pipeline = EncryptionPipeline::new(ArtifactStore::new(&pipeline_root), registry);
        pipeline.ingest("one.png", b"1").unwrap().id
    };

    let registry = SqliteRegistry::open(&db_path).unwrap();
    let pipeline = EncryptionPipeline::new(ArtifactStore::new(&pipeline_root), registry);
    let second = pipeline.ingest("two.png", b"2").unwrap().id;
    assert!(second > first);

    let listed: Vec<i64> = pipeline
        .registry()
        .list()
        .unwrap()
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(listed, vec![first, second]);
}

#[test]
fn shared_registry_serves_concurrent_ingestions() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let registry = Arc::new(SqliteRegistry::open(dir.path().join("images.db")).unwrap());
    let pipeline = Arc::new(EncryptionPipeline::new(
        ArtifactStore::new(dir.path()),
        Arc::clone(&registry),
    ));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let pipeline = Arc::clone(&pipeline);
            std::thread::spawn(move || {
                pipeline
                    .ingest(&format!("thread-{i}.png"), &sample_bytes(100 + i))
                    .unwrap()
            })
        })
        .collect();

    let mut ids: Vec<i64> = handles.into_iter().map(|h| h.join().unwrap().id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 8);

    for id in ids {
        pipeline.verify(id).unwrap();
    }
    drop(pipeline);

    let registry = Arc::try_unwrap(registry).expect("no other handles");
    assert_eq!(registry.list().unwrap().len(), 8);
    registry.close().unwrap();
}

#[test]
fn lookup_of_unknown_id_through_pipeline_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let registry = SqliteRegistry::open_in_memory().unwrap();
    let pipeline = EncryptionPipeline::new(ArtifactStore::new(dir.path()), registry);
    assert!(matches!(pipeline.record(999), Err(CoreError::NotFound(_))));
}

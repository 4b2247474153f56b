//! Standard store integration tests
//!
//! Round trips events through a manager into the standard log table and back,
//! against both the in-memory and the JSONL record store.

use std::sync::Arc;

use serde_json::{json, Value};

use logstore::config::StaticConfig;
use logstore::record::{
    JsonlRecordStore, MemoryRecordStore, Params, RecordStore, Selection,
};
use logstore::stores::{register_default_stores, LEGACY_STORE_ID, STANDARD_LOG_TABLE, STANDARD_STORE_ID};
use logstore::{
    AccessContext, Event, LogError, LogManager, LogResult, RequestContext, Row, StoreRegistry,
};

fn manager_with(db: Arc<dyn RecordStore>, enabled: &str, request: RequestContext) -> LogManager {
    let mut registry = StoreRegistry::new();
    register_default_stores(&mut registry, db);
    LogManager::new(
        Arc::new(registry),
        Arc::new(StaticConfig::new(enabled)),
        request,
    )
}

fn sample_event() -> Event {
    Event::builder("x")
        .component("core")
        .crud('c')
        .level(5)
        .context_id(42)
        .user_id(3)
        .related_user_id(8)
        .other_value("note", json!("hello"))
        .time_created(1000)
        .build()
        .unwrap()
}

fn assert_round_trip(db: Arc<dyn RecordStore>) {
    let request = RequestContext::new("10.0.0.1").logged_in_as(2);
    let manager = manager_with(db, STANDARD_STORE_ID, request);

    let event = sample_event();
    let report = manager.store(&event);
    assert!(report.is_ok());
    assert_eq!(report.delivered, vec![STANDARD_STORE_ID]);

    let readers = manager.get_readers(&AccessContext::system());
    let reader = readers[STANDARD_STORE_ID];
    let events = reader.get_events("", &Params::None, None, 0, 0).unwrap();
    assert_eq!(events.len(), 1);

    let stored = &events[0];
    assert_eq!(stored.event_name(), "x");
    assert_eq!(stored.level(), 5);
    assert_eq!(stored.crud(), 'c');
    assert_eq!(stored.context_id(), 42);
    assert_eq!(stored.user_id(), 3);
    assert_eq!(stored.related_user_id(), Some(8));
    assert_eq!(stored.other()["note"], json!("hello"));
    assert_eq!(stored.time_created(), 1000);

    let provenance = stored.provenance().unwrap();
    assert_eq!(provenance.id, 1);
    assert_eq!(provenance.origin, "10.0.0.1");
    assert_eq!(provenance.real_user_id, Some(2));

    assert_eq!(stored.get_data(), event.get_data());
}

#[test]
fn test_round_trip_in_memory() {
    assert_round_trip(Arc::new(MemoryRecordStore::new()));
}

#[test]
fn test_round_trip_jsonl() {
    let dir = tempfile::tempdir().unwrap();
    assert_round_trip(Arc::new(JsonlRecordStore::new(dir.path())));

    let line = std::fs::read_to_string(dir.path().join("logstore_standard_log.jsonl")).unwrap();
    let row: Value = serde_json::from_str(line.trim()).unwrap();
    assert_eq!(row["edulevel"], json!(5));
    assert!(row.get("level").is_none());
    assert_eq!(row["origin"], json!("10.0.0.1"));
    assert_eq!(row["realuser"], json!(2));
}

#[test]
fn test_rows_use_storage_column_names() {
    let db = Arc::new(MemoryRecordStore::new());
    let manager = manager_with(db.clone(), STANDARD_STORE_ID, RequestContext::default());
    manager.store(&sample_event());

    let rows = db.select(STANDARD_LOG_TABLE, &Selection::default()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["edulevel"], json!(5));
    assert_eq!(rows[0]["origin"], json!("cli"));
    assert_eq!(rows[0]["realuser"], Value::Null);
    assert!(!rows[0].contains_key("level"));
}

#[test]
fn test_filters_order_and_pages() {
    let db: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new());
    let manager = manager_with(db, STANDARD_STORE_ID, RequestContext::default());

    for (user, time) in [(1, 300), (2, 100), (1, 200), (1, 100)] {
        let event = Event::builder("\\core\\event\\course_viewed")
            .user_id(user)
            .time_created(time)
            .build()
            .unwrap();
        assert!(manager.store(&event).is_ok());
    }

    let readers = manager.get_readers(&AccessContext::new(99));
    let reader = readers[STANDARD_STORE_ID];
    let user_one = Params::named([("user", json!(1))]);

    assert_eq!(reader.get_events_count("userid = :user", &user_one).unwrap(), 3);
    assert_eq!(reader.get_events_count("", &Params::None).unwrap(), 4);

    // Default order is time then id
    let ids: Vec<u64> = reader
        .get_events("userid = :user", &user_one, None, 0, 0)
        .unwrap()
        .iter()
        .map(|e| e.provenance().unwrap().id)
        .collect();
    assert_eq!(ids, vec![4, 3, 1]);

    let page = reader
        .get_events("", &Params::None, Some("id DESC"), 1, 2)
        .unwrap();
    let ids: Vec<u64> = page.iter().map(|e| e.provenance().unwrap().id).collect();
    assert_eq!(ids, vec![3, 2]);

    let err = reader
        .get_events("userid = ? AND crud = :crud", &user_one, None, 0, 0)
        .unwrap_err();
    assert!(matches!(err, LogError::InvalidFilter(_)));
}

#[test]
fn test_legacy_store_reads_nothing() {
    let db: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new());
    let enabled = format!("{},{}", LEGACY_STORE_ID, STANDARD_STORE_ID);
    let manager = manager_with(db, &enabled, RequestContext::default());

    let report = manager.store(&sample_event());
    assert_eq!(report.delivered, vec![STANDARD_STORE_ID]);

    let readers = manager.get_readers(&AccessContext::system());
    assert_eq!(
        readers.keys().copied().collect::<Vec<_>>(),
        vec![LEGACY_STORE_ID, STANDARD_STORE_ID]
    );
    let legacy = readers[LEGACY_STORE_ID];
    assert!(legacy.get_events("", &Params::None, None, 0, 0).unwrap().is_empty());
    assert_eq!(legacy.get_events_count("", &Params::None).unwrap(), 0);
}

/// Record store whose every operation fails
struct FailingRecordStore;

impl RecordStore for FailingRecordStore {
    fn insert(&self, _table: &str, _row: Row) -> LogResult<u64> {
        Err(LogError::Storage("database is down".to_string()))
    }

    fn select(&self, _table: &str, _selection: &Selection) -> LogResult<Vec<Row>> {
        Err(LogError::Storage("database is down".to_string()))
    }

    fn count(&self, _table: &str, _filter: &str, _params: &Params) -> LogResult<u64> {
        Err(LogError::Storage("database is down".to_string()))
    }
}

#[test]
fn test_storage_failures() {
    let manager = manager_with(
        Arc::new(FailingRecordStore),
        STANDARD_STORE_ID,
        RequestContext::default(),
    );

    // Writes are contained and reported
    let report = manager.store(&sample_event());
    assert!(!report.is_ok());
    assert_eq!(report.failures[0].plugin, STANDARD_STORE_ID);
    assert_eq!(report.failures[0].event_name, "x");

    // Reads propagate to the caller
    let readers = manager.get_readers(&AccessContext::system());
    let err = readers[STANDARD_STORE_ID]
        .get_events_count("", &Params::None)
        .unwrap_err();
    assert!(err.to_string().contains("database is down"));
}

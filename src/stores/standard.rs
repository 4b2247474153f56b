//! Standard log store
//!
//! Writes every event as one row of `logstore_standard_log` through a
//! [`RecordStore`] and reads them back. Rows carry two columns events do not
//! have: `origin` and `realuser`. The event `level` is stored as `edulevel`.

use std::sync::Arc;

use serde_json::{json, Value};

use super::{LogReader, LogStore, LogWriter};
use crate::manager::LogManager;
use crate::record::{Params, RecordStore, Selection, ID_COLUMN};
use crate::types::{AccessContext, Event, LogError, LogResult, Provenance, Row};

/// Identifier of the standard store
pub const STANDARD_STORE_ID: &str = "logstore_standard";

/// Table the standard store writes to
pub const STANDARD_LOG_TABLE: &str = "logstore_standard_log";

/// Ordering used when the caller does not supply one
pub const DEFAULT_ORDER: &str = "timecreated ASC, id ASC";

const ORIGIN_COLUMN: &str = "origin";
const REAL_USER_COLUMN: &str = "realuser";
const LEVEL_FIELD: &str = "level";
const EDULEVEL_COLUMN: &str = "edulevel";

/// Table-backed writer and reader
pub struct StandardStore {
    db: Arc<dyn RecordStore>,
}

impl StandardStore {
    pub const NAME: &'static str = "Standard log";
    pub const DESCRIPTION: &'static str = "Stores log events in the logstore_standard_log table";

    pub fn new(db: Arc<dyn RecordStore>) -> Self {
        Self { db }
    }

    /// Name of the table events are written to
    pub fn log_table(&self) -> &'static str {
        STANDARD_LOG_TABLE
    }

    /// Turn a stored row back into an event with provenance attached
    fn row_to_event(mut row: Row) -> LogResult<Event> {
        let id = row
            .remove(ID_COLUMN)
            .and_then(|v| v.as_u64())
            .ok_or_else(|| LogError::InvalidEvent("stored row has no id".to_string()))?;
        let origin = match row.remove(ORIGIN_COLUMN) {
            Some(Value::String(origin)) => origin,
            _ => String::new(),
        };
        let real_user_id = row.remove(REAL_USER_COLUMN).and_then(|v| v.as_u64());

        if let Some(level) = row.remove(EDULEVEL_COLUMN) {
            row.insert(LEVEL_FIELD.to_string(), level);
        }

        Event::restore(
            row,
            Provenance {
                id,
                origin,
                real_user_id,
            },
        )
    }
}

impl std::fmt::Debug for StandardStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StandardStore")
            .field("table", &STANDARD_LOG_TABLE)
            .finish_non_exhaustive()
    }
}

impl LogStore for StandardStore {
    fn name(&self) -> String {
        Self::NAME.to_string()
    }

    fn description(&self) -> String {
        Self::DESCRIPTION.to_string()
    }

    fn as_writer(&self) -> Option<&dyn LogWriter> {
        Some(self)
    }

    fn as_reader(&self) -> Option<&dyn LogReader> {
        Some(self)
    }
}

impl LogWriter for StandardStore {
    fn store(&self, event: &Event, manager: &LogManager) -> LogResult<()> {
        let request = manager.request();
        let mut data = event.get_data();
        data.insert(ORIGIN_COLUMN.to_string(), json!(request.origin));
        data.insert(REAL_USER_COLUMN.to_string(), json!(request.real_user_id));

        if let Some(level) = data.remove(LEVEL_FIELD) {
            data.insert(EDULEVEL_COLUMN.to_string(), level);
        }

        self.db.insert(STANDARD_LOG_TABLE, data)?;
        Ok(())
    }
}

impl LogReader for StandardStore {
    fn can_access(&self, _context: &AccessContext) -> bool {
        true
    }

    fn get_events(
        &self,
        select: &str,
        params: &Params,
        order: Option<&str>,
        offset: usize,
        limit: usize,
    ) -> LogResult<Vec<Event>> {
        let order = order
            .filter(|o| !o.trim().is_empty())
            .unwrap_or(DEFAULT_ORDER);
        let selection = Selection::new(select, params.clone())
            .with_order(order)
            .with_page(offset, limit);

        self.db
            .select(STANDARD_LOG_TABLE, &selection)?
            .into_iter()
            .map(Self::row_to_event)
            .collect()
    }

    fn get_events_count(&self, select: &str, params: &Params) -> LogResult<u64> {
        self.db.count(STANDARD_LOG_TABLE, select, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::MemoryRecordStore;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_row_to_event_moves_storage_columns() {
        let stored = row(json!({
            "id": 7,
            "eventname": "x",
            "component": "core",
            "action": "",
            "target": "x",
            "crud": "c",
            "edulevel": 5,
            "contextid": 1,
            "userid": 3,
            "relateduserid": null,
            "other": {},
            "timecreated": 1000,
            "origin": "10.1.1.1",
            "realuser": 2
        }));

        let event = StandardStore::row_to_event(stored).unwrap();
        assert_eq!(event.level(), 5);
        assert_eq!(event.crud(), 'c');

        let provenance = event.provenance().unwrap();
        assert_eq!(provenance.id, 7);
        assert_eq!(provenance.origin, "10.1.1.1");
        assert_eq!(provenance.real_user_id, Some(2));
    }

    #[test]
    fn test_row_without_id_is_rejected() {
        let err = StandardStore::row_to_event(row(json!({"eventname": "x"}))).unwrap_err();
        assert!(err.to_string().contains("no id"));
    }

    #[test]
    fn test_blank_order_uses_default() {
        let db = Arc::new(MemoryRecordStore::new());
        for time in [300, 100, 200] {
            let event = Event::builder("x").time_created(time).build().unwrap();
            let data = event.get_data();
            db.insert(STANDARD_LOG_TABLE, data).unwrap();
        }
        let store = StandardStore::new(db);

        for order in [None, Some(""), Some("   ")] {
            let times: Vec<i64> = store
                .get_events("", &Params::None, order, 0, 0)
                .unwrap()
                .iter()
                .map(Event::time_created)
                .collect();
            assert_eq!(times, vec![100, 200, 300], "order {:?}", order);
        }
    }

    #[test]
    fn test_count_uses_log_table() {
        let db = Arc::new(MemoryRecordStore::new());
        db.insert(STANDARD_LOG_TABLE, row(json!({"userid": 1}))).unwrap();
        db.insert("other_table", row(json!({"userid": 1}))).unwrap();

        let store = StandardStore::new(db);
        assert_eq!(store.log_table(), STANDARD_LOG_TABLE);
        assert_eq!(store.get_events_count("", &Params::None).unwrap(), 1);
    }
}

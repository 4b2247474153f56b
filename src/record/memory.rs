//! In-memory record store

use std::collections::HashMap;

use parking_lot::RwLock;
use serde_json::json;

use super::{apply_selection, count_matching, Params, RecordStore, Selection, ID_COLUMN};
use crate::types::{LogResult, Row};

#[derive(Debug, Default)]
struct Table {
    next_id: u64,
    rows: Vec<Row>,
}

/// Record store keeping every table in memory
///
/// Ids start at 1 and increase per table. Unknown tables read as empty.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    tables: RwLock<HashMap<String, Table>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows stored in `table`
    pub fn row_count(&self, table: &str) -> usize {
        self.tables.read().get(table).map_or(0, |t| t.rows.len())
    }
}

impl RecordStore for MemoryRecordStore {
    fn insert(&self, table: &str, mut row: Row) -> LogResult<u64> {
        let mut tables = self.tables.write();
        let table = tables.entry(table.to_string()).or_default();
        table.next_id += 1;
        let id = table.next_id;
        row.insert(ID_COLUMN.to_string(), json!(id));
        table.rows.push(row);
        Ok(id)
    }

    fn select(&self, table: &str, selection: &Selection) -> LogResult<Vec<Row>> {
        let tables = self.tables.read();
        match tables.get(table) {
            Some(t) => apply_selection(&t.rows, selection),
            None => apply_selection(std::iter::empty(), selection),
        }
    }

    fn count(&self, table: &str, filter: &str, params: &Params) -> LogResult<u64> {
        let tables = self.tables.read();
        match tables.get(table) {
            Some(t) => count_matching(&t.rows, filter, params),
            None => count_matching(std::iter::empty(), filter, params),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: serde_json::Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_insert_assigns_ids_per_table() {
        let store = MemoryRecordStore::new();
        assert_eq!(store.insert("a", row(json!({"x": 1}))).unwrap(), 1);
        assert_eq!(store.insert("a", row(json!({"x": 2, "id": 99}))).unwrap(), 2);
        assert_eq!(store.insert("b", row(json!({"x": 3}))).unwrap(), 1);
        assert_eq!(store.row_count("a"), 2);
        assert_eq!(store.row_count("missing"), 0);

        let rows = store.select("a", &Selection::default()).unwrap();
        assert_eq!(rows[1]["id"], json!(2));
    }

    #[test]
    fn test_unknown_table_is_empty_but_filter_is_still_checked() {
        let store = MemoryRecordStore::new();
        assert!(store.select("none", &Selection::default()).unwrap().is_empty());
        assert_eq!(store.count("none", "", &Params::None).unwrap(), 0);
        assert!(store.count("none", "x = ?", &Params::None).is_err());
    }

    #[test]
    fn test_select_and_count_agree() {
        let store = MemoryRecordStore::new();
        for i in 0..6 {
            store.insert("t", row(json!({"userid": i % 3}))).unwrap();
        }
        let params = Params::positional([json!(1)]);
        let rows = store
            .select("t", &Selection::new("userid = ?", params.clone()))
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(store.count("t", "userid = ?", &params).unwrap(), 2);
    }
}

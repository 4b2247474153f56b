//! JSONL record store
//!
//! Each table is an append-only `<data_dir>/<table>.jsonl` file holding one
//! JSON object per line. Queries scan the whole file, so this backend suits
//! tooling and modest volumes rather than production traffic.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde_json::{json, Value};

use super::{apply_selection, count_matching, Params, RecordStore, Selection, ID_COLUMN};
use crate::types::{LogError, LogResult, Row};

/// Record store persisting each table as a JSONL file
#[derive(Debug)]
pub struct JsonlRecordStore {
    data_dir: PathBuf,
    /// Next id per table, recovered from the file on first insert
    next_ids: Mutex<HashMap<String, u64>>,
}

impl JsonlRecordStore {
    /// Create a store rooted at `data_dir` (created lazily on first insert)
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            next_ids: Mutex::new(HashMap::new()),
        }
    }

    /// Get path to `<table>.jsonl`
    pub fn table_path(&self, table: &str) -> LogResult<PathBuf> {
        let valid = !table.is_empty()
            && table
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(LogError::Storage(format!("invalid table name '{}'", table)));
        }
        Ok(self.data_dir.join(format!("{}.jsonl", table)))
    }

    /// Load all rows of a table; a missing file is an empty table
    ///
    /// Lines that fail to parse are skipped with a warning.
    pub fn load_rows(&self, table: &str) -> LogResult<Vec<Row>> {
        let path = self.table_path(table)?;

        if !path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&path)?;
        let reader = BufReader::new(file);
        let mut rows = Vec::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<Value>(&line) {
                Ok(Value::Object(row)) => rows.push(row),
                Ok(_) => {
                    tracing::warn!(table, line = line_num + 1, "Skipping non-object row");
                }
                Err(e) => {
                    tracing::warn!(table, line = line_num + 1, error = %e, "Skipping unparsable row");
                }
            }
        }

        Ok(rows)
    }

    fn highest_id(rows: &[Row]) -> u64 {
        rows.iter()
            .filter_map(|r| r.get(ID_COLUMN).and_then(Value::as_u64))
            .max()
            .unwrap_or(0)
    }
}

fn ends_with_newline(file: &mut File, len: u64) -> io::Result<bool> {
    if len == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

fn append_line(file: &mut File, line: &str) -> io::Result<()> {
    writeln!(file, "{}", line)?;
    // Sync to disk for durability
    file.sync_all()
}

impl RecordStore for JsonlRecordStore {
    fn insert(&self, table: &str, mut row: Row) -> LogResult<u64> {
        let path = self.table_path(table)?;

        // Held across the write so concurrent inserts cannot reuse an id
        let mut next_ids = self.next_ids.lock();
        let next_id = match next_ids.get(table) {
            Some(id) => *id,
            None => Self::highest_id(&self.load_rows(table)?) + 1,
        };

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)?;
        let start = file.metadata()?.len();

        row.insert(ID_COLUMN.to_string(), json!(next_id));
        let mut line = serde_json::to_string(&row)?;
        // A torn earlier write must not swallow this row
        if !ends_with_newline(&mut file, start)? {
            line.insert(0, '\n');
        }

        if let Err(e) = append_line(&mut file, &line) {
            // The file may or may not hold the row now; re-read it next time
            next_ids.remove(table);
            if let Err(trunc) = file.set_len(start) {
                tracing::warn!(table, error = %trunc, "Failed to roll back partial row");
            }
            return Err(e.into());
        }

        next_ids.insert(table.to_string(), next_id + 1);
        Ok(next_id)
    }

    fn select(&self, table: &str, selection: &Selection) -> LogResult<Vec<Row>> {
        let rows = self.load_rows(table)?;
        apply_selection(&rows, selection)
    }

    fn count(&self, table: &str, filter: &str, params: &Params) -> LogResult<u64> {
        let rows = self.load_rows(table)?;
        count_matching(&rows, filter, params)
    }
}

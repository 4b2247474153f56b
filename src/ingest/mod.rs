//! Line-oriented event ingest
//!
//! Reads one JSON event per line, dispatches each through a [`LogManager`],
//! then writes one summary line per visible reader followed by a totals line:
//!
//! ```text
//! {"store":"logstore_standard","events":3,"latest":"2024-01-01T00:00:00Z"}
//! {"stored":3,"failed":0,"unrouted":0,"skipped":1}
//! ```

use std::io::{BufRead, Write};

use serde::Serialize;
use serde_json::json;

use crate::manager::LogManager;
use crate::record::Params;
use crate::types::{AccessContext, Event, LogResult};
use crate::utils::format_timestamp;

/// Newest first, so the first row is the latest event
const LATEST_ORDER: &str = "timecreated DESC, id DESC";

/// Totals for one ingest run
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Events every writer accepted
    pub stored: u64,
    /// Events at least one writer rejected
    pub failed: u64,
    /// Events no writer received
    pub unrouted: u64,
    /// Lines that were not valid events
    pub skipped: u64,
}

/// Dispatch every event in `input` and write the summary to `out`
///
/// Malformed lines are logged and counted as skipped. Read errors from the
/// readers while summarizing are returned.
pub fn run_ingest<R, W>(
    manager: &LogManager,
    input: R,
    mut out: W,
    access: &AccessContext,
) -> LogResult<IngestSummary>
where
    R: BufRead,
    W: Write,
{
    let mut summary = IngestSummary::default();

    for (line_num, line) in input.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let event = match Event::from_json_line(trimmed) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(line = line_num + 1, error = %e, "Skipping malformed event");
                summary.skipped += 1;
                continue;
            }
        };

        let report = manager.store(&event);
        if !report.is_ok() {
            summary.failed += 1;
        } else if report.delivered.is_empty() {
            summary.unrouted += 1;
        } else {
            summary.stored += 1;
        }
    }

    for (id, reader) in manager.get_readers(access) {
        let events = reader.get_events_count("", &Params::None)?;
        let latest = reader
            .get_events("", &Params::None, Some(LATEST_ORDER), 0, 1)?
            .first()
            .map(|e| format_timestamp(e.time_created()));
        writeln!(
            out,
            "{}",
            json!({ "store": id, "events": events, "latest": latest })
        )?;
    }
    writeln!(out, "{}", serde_json::to_string(&summary)?)?;
    out.flush()?;

    tracing::info!(
        stored = summary.stored,
        failed = summary.failed,
        unrouted = summary.unrouted,
        skipped = summary.skipped,
        "Ingest finished"
    );
    Ok(summary)
}

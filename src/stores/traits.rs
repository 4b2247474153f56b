//! Store plugin traits
//!
//! A plugin implements [`LogStore`] and opts into the writer and/or reader
//! capability by returning itself from [`LogStore::as_writer`] or
//! [`LogStore::as_reader`]. There is no shared base type beyond that.

use crate::manager::LogManager;
use crate::record::Params;
use crate::types::{AccessContext, Event, LogResult};

/// A log store plugin instance
///
/// Instances are built by the registry when a manager initializes and live
/// until the manager is disposed.
pub trait LogStore: Send + Sync {
    /// Human readable store name
    fn name(&self) -> String;

    /// One line description for admin listings
    fn description(&self) -> String;

    /// Writer capability, if this store accepts events
    fn as_writer(&self) -> Option<&dyn LogWriter> {
        None
    }

    /// Reader capability, if this store answers queries
    fn as_reader(&self) -> Option<&dyn LogReader> {
        None
    }

    /// Release held resources; called once when the owning manager is disposed
    fn dispose(&mut self) {}
}

/// Accepts and persists events
pub trait LogWriter {
    /// Persist `event`
    ///
    /// `manager` gives access to the request context. Errors are contained by
    /// the manager and never reach the code that logged the event.
    fn store(&self, event: &Event, manager: &LogManager) -> LogResult<()>;
}

/// Answers queries over stored events
pub trait LogReader {
    /// Whether a caller holding `context` may read this store
    fn can_access(&self, context: &AccessContext) -> bool;

    /// Events matching `select`, ordered by `order` (store default when
    /// `None`) and paginated; a `limit` of 0 means no limit
    fn get_events(
        &self,
        select: &str,
        params: &Params,
        order: Option<&str>,
        offset: usize,
        limit: usize,
    ) -> LogResult<Vec<Event>>;

    /// Number of events matching `select`
    fn get_events_count(&self, select: &str, params: &Params) -> LogResult<u64>;
}

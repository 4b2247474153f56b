//! Record store collaborator
//!
//! Store plugins persist rows through a [`RecordStore`]. The trait is the
//! boundary to whatever database the host runs; this module also ships two
//! reference backends:
//!
//! - [`MemoryRecordStore`]: tables kept in memory, for tests and embedding
//! - [`JsonlRecordStore`]: one append-only `<table>.jsonl` file per table
//!
//! Both evaluate the filter grammar in [`filter`] and the ordering clauses in
//! [`order`] through [`apply_selection`].

pub mod filter;
mod jsonl;
mod memory;
pub mod order;

use serde_json::{Map, Value};

use crate::types::{LogResult, Row};

pub use filter::{compile, AndFilter, CompareOp, Comparison, RowFilter};
pub use jsonl::JsonlRecordStore;
pub use memory::MemoryRecordStore;
pub use order::{parse_order, sort_rows, OrderKey};

/// Column holding the id assigned by the record store
pub const ID_COLUMN: &str = "id";

/// Parameters bound to a filter expression's placeholders
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Params {
    /// No placeholders
    #[default]
    None,
    /// Values for `?` placeholders, in order
    Positional(Vec<Value>),
    /// Values for `:name` placeholders
    Named(Map<String, Value>),
}

impl Params {
    pub fn positional<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Self::Positional(values.into_iter().collect())
    }

    pub fn named<I, K>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self::Named(values.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// A full row query: filter, ordering and pagination
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    /// Filter expression, empty for all rows
    pub filter: String,
    pub params: Params,
    /// Ordering clause, empty for insertion order
    pub order: String,
    /// Rows to skip after ordering
    pub offset: usize,
    /// Maximum rows to return, 0 for no limit
    pub limit: usize,
}

impl Selection {
    pub fn new(filter: impl Into<String>, params: Params) -> Self {
        Self {
            filter: filter.into(),
            params,
            ..Default::default()
        }
    }

    pub fn with_order(mut self, order: impl Into<String>) -> Self {
        self.order = order.into();
        self
    }

    pub fn with_page(mut self, offset: usize, limit: usize) -> Self {
        self.offset = offset;
        self.limit = limit;
        self
    }
}

/// Row storage used by table-backed log stores
pub trait RecordStore: Send + Sync {
    /// Insert a row, returning the id the store assigned to it
    ///
    /// Any `id` column in `row` is ignored.
    fn insert(&self, table: &str, row: Row) -> LogResult<u64>;

    /// Rows matching `selection`, each including its `id` column
    fn select(&self, table: &str, selection: &Selection) -> LogResult<Vec<Row>>;

    /// Number of rows matching `filter`
    fn count(&self, table: &str, filter: &str, params: &Params) -> LogResult<u64>;
}

/// Filter, order and paginate rows
pub fn apply_selection<'a, I>(rows: I, selection: &Selection) -> LogResult<Vec<Row>>
where
    I: IntoIterator<Item = &'a Row>,
{
    let filter = compile(&selection.filter, &selection.params)?;
    let keys = parse_order(&selection.order)?;

    let mut matched: Vec<Row> = rows
        .into_iter()
        .filter(|row| filter.matches(row))
        .cloned()
        .collect();
    sort_rows(&mut matched, &keys);

    let limit = if selection.limit == 0 {
        usize::MAX
    } else {
        selection.limit
    };
    Ok(matched
        .into_iter()
        .skip(selection.offset)
        .take(limit)
        .collect())
}

/// Count rows matching `filter`
pub fn count_matching<'a, I>(rows: I, filter: &str, params: &Params) -> LogResult<u64>
where
    I: IntoIterator<Item = &'a Row>,
{
    let filter = compile(filter, params)?;
    Ok(rows.into_iter().filter(|row| filter.matches(row)).count() as u64)
}

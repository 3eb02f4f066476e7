//! Database client boundary.
//!
//! The engine never talks to a concrete database directly; everything goes
//! through the [`DbClient`] trait. The caller constructs one client per run
//! and passes it by reference into the inspector and the orchestrator, so
//! the engine stays testable against a canned in-memory implementation.

mod duckdb;

pub use self::duckdb::DuckDbClient;

use crate::error::Result;

/// One column's metadata as reported by the database.
#[derive(Debug, Clone)]
pub struct ColumnMeta {
    /// Column name.
    pub name: String,
    /// Raw type string as the source schema spells it, e.g. `varchar(255)`.
    pub raw_type: String,
}

/// A raw value returned by the database client.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

/// Materialized result of one data query.
#[derive(Debug, Clone, Default)]
pub struct QueryOutput {
    /// Field names in result order.
    pub fields: Vec<String>,
    /// Row values, each aligned index-for-index with `fields`.
    pub rows: Vec<Vec<SqlValue>>,
}

impl QueryOutput {
    /// Number of rows in the result.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check whether the result holds any rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over the rows as [`Row`] views.
    pub fn iter(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |values| Row {
            fields: &self.fields,
            values,
        })
    }
}

/// Read-only view of one result row: the ordered field names plus the
/// values in the same order.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    fields: &'a [String],
    values: &'a [SqlValue],
}

impl<'a> Row<'a> {
    /// Build a row view over parallel field and value slices.
    ///
    /// Panics if the slices differ in length; the client produces them
    /// together, so a mismatch is a client bug.
    pub fn new(fields: &'a [String], values: &'a [SqlValue]) -> Self {
        assert_eq!(fields.len(), values.len(), "row fields/values mismatch");
        Self { fields, values }
    }

    /// Field names in result order.
    pub fn fields(&self) -> &'a [String] {
        self.fields
    }

    /// Iterate over `(field name, value)` pairs in result order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a SqlValue)> {
        self.fields
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    /// Look up a value by field name.
    pub fn get(&self, name: &str) -> Option<&'a SqlValue> {
        self.fields
            .iter()
            .position(|f| f == name)
            .map(|i| &self.values[i])
    }
}

/// Interface the engine uses to talk to the database.
///
/// One metadata round-trip per method call; implementations do not cache.
pub trait DbClient {
    /// Column metadata for `table`, in the database's natural column order.
    fn table_columns(&self, table: &str) -> Result<Vec<ColumnMeta>>;

    /// The verbatim `CREATE TABLE` statement for `table`, without a
    /// trailing semicolon. The orchestrator owns statement termination.
    fn create_table_ddl(&self, table: &str) -> Result<String>;

    /// Execute a data query and materialize the result.
    fn query(&self, sql: &str) -> Result<QueryOutput>;

    /// Names of all user tables.
    fn list_tables(&self) -> Result<Vec<String>>;
}

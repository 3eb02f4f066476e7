//! Column type normalization and table inspection.
//!
//! Raw type strings coming out of the database (`varchar(255)`,
//! `bigint(20)`, `decimal(10,0)`, ...) are folded into a closed set of
//! logical types that the serializer understands. Anything outside that
//! set is a fatal schema error: a column with unknown serialization
//! behavior must stop the run before it corrupts the output.

use crate::db::{ColumnMeta, DbClient};
use crate::error::{ExtractError, Result};
use ahash::AHashSet;
use std::fmt;
use std::str::FromStr;

/// Logical column type controlling how values are rendered as SQL literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Variable-length strings: quoted and escaped
    Varchar,
    /// Integer families: rendered bare
    Int,
    /// Long text: quoted and escaped
    Text,
    /// Date + time strings: truncated to `date time`, quoted
    Datetime,
    /// Fixed-point numerics: rendered bare
    Decimal,
    /// Binary payloads: quoted and escaped
    Blob,
}

impl FromStr for ColumnType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "varchar" => Ok(ColumnType::Varchar),
            "int" => Ok(ColumnType::Int),
            "text" => Ok(ColumnType::Text),
            "datetime" => Ok(ColumnType::Datetime),
            "decimal" => Ok(ColumnType::Decimal),
            "blob" => Ok(ColumnType::Blob),
            _ => Err(format!("unknown column type: {}", s)),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ColumnType::Varchar => "varchar",
            ColumnType::Int => "int",
            ColumnType::Text => "text",
            ColumnType::Datetime => "datetime",
            ColumnType::Decimal => "decimal",
            ColumnType::Blob => "blob",
        };
        write!(f, "{}", s)
    }
}

/// Normalize a raw column type string into a logical type.
///
/// Prefix families are matched case-sensitively as the source schema
/// emits them; `int(11)`, `tinyint(1)`, `bigint(20)` and `smallint(6)`
/// all collapse to `int`. Strings outside the known families pass
/// through verbatim and must name one of the logical types exactly,
/// otherwise the whole run fails with the offending type and column.
pub fn normalize(raw_type: &str, column: &str) -> Result<ColumnType> {
    const INT_PREFIXES: [&str; 4] = ["int", "tinyint", "bigint", "smallint"];

    if raw_type.starts_with("varchar") {
        return Ok(ColumnType::Varchar);
    }
    if raw_type.starts_with("decimal") {
        return Ok(ColumnType::Decimal);
    }
    if INT_PREFIXES.iter().any(|p| raw_type.starts_with(p)) {
        return Ok(ColumnType::Int);
    }

    raw_type
        .parse()
        .map_err(|_| ExtractError::unknown_column_type(raw_type, column))
}

/// Ordered mapping from column name to logical type.
///
/// Insertion order is load-bearing: it fixes the column order in the
/// generated SELECT, and the serializer resolves types against it by
/// name. Tables are small, so lookup is a linear scan over a Vec rather
/// than a hash map that would lose the order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnMap {
    entries: Vec<(String, ColumnType)>,
}

impl ColumnMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a column. Order of insertion is preserved.
    pub fn insert(&mut self, name: impl Into<String>, col_type: ColumnType) {
        self.entries.push((name.into(), col_type));
    }

    /// Look up a column's logical type by name.
    pub fn get(&self, name: &str) -> Option<ColumnType> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| *t)
    }

    /// Column names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Iterate over `(name, type)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ColumnType)> {
        self.entries.iter().map(|(n, t)| (n.as_str(), *t))
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the map has no columns.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Inspect a table and resolve its column map.
///
/// Columns come back in the database's natural order. When an allow-list
/// is given it acts as a membership filter over that order, so the result
/// never reorders to match the allow-list; names in the allow-list that
/// the table does not have are ignored. Every call re-queries the
/// database, nothing is cached.
pub fn inspect(
    client: &dyn DbClient,
    table: &str,
    allowlist: Option<&[String]>,
) -> Result<ColumnMap> {
    let allowed: Option<AHashSet<&str>> =
        allowlist.map(|names| names.iter().map(String::as_str).collect());

    let mut map = ColumnMap::new();
    for column in client.table_columns(table)? {
        if let Some(ref allowed) = allowed {
            if !allowed.contains(column.name.as_str()) {
                continue;
            }
        }
        let col_type = normalize(&column.raw_type, &column.name)?;
        map.insert(column.name, col_type);
    }
    Ok(map)
}

/// Describe a table's columns: each column's metadata paired with its
/// logical type, or `None` when the raw type is outside the supported
/// set. Unsupported columns are reported, not fatal; [`inspect`] is the
/// strict variant.
pub fn describe_table(
    client: &dyn DbClient,
    table: &str,
) -> Result<Vec<(ColumnMeta, Option<ColumnType>)>> {
    Ok(client
        .table_columns(table)?
        .into_iter()
        .map(|meta| {
            let resolved = normalize(&meta.raw_type, &meta.name).ok();
            (meta, resolved)
        })
        .collect())
}

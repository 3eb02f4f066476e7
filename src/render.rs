//! Value and row serialization into replayable SQL text.
//!
//! This is the single place where type-specific quoting, escaping, NULL
//! substitution, and datetime truncation live. Everything upstream hands
//! raw values through untouched; everything downstream treats the output
//! as opaque statement text.

use crate::db::{Row, SqlValue};
use crate::error::{ExtractError, Result};
use crate::schema::{ColumnMap, ColumnType};
use once_cell::sync::Lazy;
use regex::Regex;
use smallvec::SmallVec;

/// Expected textual shape of a datetime value: `date time [offset]`.
/// The offset, when present, is separated by a space and discarded.
static RE_DATETIME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\S+ \S+)( .*)?$").unwrap());

/// Render one raw value as a SQL literal according to its logical type.
///
/// NULL wins over the column type. String-like types are single-quoted
/// with embedded quotes backslash-escaped. Datetime values are truncated
/// to their leading `date time` portion and re-quoted; a value that does
/// not match that shape is a fatal error rather than a silently mangled
/// literal. Numeric types pass through bare.
pub fn format_value(value: &SqlValue, col_type: ColumnType) -> Result<String> {
    let text = match value {
        SqlValue::Null => return Ok("NULL".to_string()),
        SqlValue::Int(n) => n.to_string(),
        SqlValue::Float(f) => f.to_string(),
        SqlValue::Text(s) => s.clone(),
    };

    match col_type {
        ColumnType::Varchar | ColumnType::Text | ColumnType::Blob => {
            Ok(format!("'{}'", text.replace('\'', "\\'")))
        }
        ColumnType::Datetime => {
            let caps = RE_DATETIME
                .captures(&text)
                .ok_or_else(|| ExtractError::MalformedDatetime {
                    value: text.clone(),
                })?;
            Ok(format!("'{}'", &caps[1]))
        }
        ColumnType::Int | ColumnType::Decimal => Ok(text),
    }
}

/// Render one row as a complete INSERT statement, newline-terminated.
///
/// Column and value order both follow the result set's field order, which
/// is the source of truth for what actually came back. Logical types are
/// resolved against the column map by name; a field the map cannot
/// resolve means the query and the schema disagree, which is fatal.
pub fn format_insert(table: &str, columns: &ColumnMap, row: Row<'_>) -> Result<String> {
    let mut values: SmallVec<[String; 16]> = SmallVec::new();
    for (field, value) in row.iter() {
        let col_type = columns
            .get(field)
            .ok_or_else(|| ExtractError::UnmappedColumn {
                column: field.to_string(),
            })?;
        values.push(format_value(value, col_type)?);
    }

    let mut stmt = String::with_capacity(48 + table.len() + values.iter().map(String::len).sum::<usize>());
    stmt.push_str("INSERT INTO ");
    stmt.push_str(table);
    stmt.push_str(" (");
    for (i, field) in row.fields().iter().enumerate() {
        if i > 0 {
            stmt.push(',');
        }
        stmt.push_str(field);
    }
    stmt.push_str(") VALUES (");
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            stmt.push(',');
        }
        stmt.push_str(value);
    }
    stmt.push_str(");\n");

    Ok(stmt)
}

//! Error types for the extraction engine.
//!
//! Every variant is fatal for the run: the orchestrator stops at the first
//! failure instead of skipping to the next table. Output already flushed to
//! the sink stays there.

use thiserror::Error;

/// Errors produced by the extraction engine.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// A column's raw type does not normalize into the supported set.
    #[error("unknown column type `{raw_type}` for column `{column}`")]
    UnknownColumnType { raw_type: String, column: String },

    /// The database rejected or failed a metadata or data query.
    #[error("query failed: {sql}: {message}")]
    QueryExecution { sql: String, message: String },

    /// A datetime value does not have the `date time [offset]` shape.
    #[error("malformed datetime value `{value}`")]
    MalformedDatetime { value: String },

    /// A result-set field has no entry in the resolved column map.
    #[error("result field `{column}` has no resolved column type")]
    UnmappedColumn { column: String },

    /// The output sink failed.
    #[error("output write failed: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractError {
    /// Build an `UnknownColumnType` error.
    pub fn unknown_column_type(raw_type: impl Into<String>, column: impl Into<String>) -> Self {
        ExtractError::UnknownColumnType {
            raw_type: raw_type.into(),
            column: column.into(),
        }
    }

    /// Build a `QueryExecution` error from the failed SQL and its cause.
    pub fn query(sql: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        ExtractError::QueryExecution {
            sql: sql.into(),
            message: cause.to_string(),
        }
    }
}

/// Convenience alias used throughout the engine.
pub type Result<T> = std::result::Result<T, ExtractError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_column_type_names_type_and_column() {
        let err = ExtractError::unknown_column_type("geometry", "location");
        let msg = err.to_string();
        assert!(msg.contains("geometry"), "message should name the type: {}", msg);
        assert!(msg.contains("location"), "message should name the column: {}", msg);
    }

    #[test]
    fn test_query_error_carries_sql() {
        let err = ExtractError::query("SELECT * FROM missing", "no such table");
        let msg = err.to_string();
        assert!(msg.contains("SELECT * FROM missing"));
        assert!(msg.contains("no such table"));
    }
}

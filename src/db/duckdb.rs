//! DuckDB-backed implementation of the database client.
//!
//! DuckDB reports canonical upper-case type names (`VARCHAR`, `INTEGER`,
//! `TIMESTAMP`, ...) through `information_schema`, so the adapter maps them
//! into the lower-case source vocabulary the normalizer expects before the
//! metadata leaves this module. Unsupported families (FLOAT, DATE, UUID,
//! ...) pass through lower-cased and fail in the normalizer, which is where
//! that decision belongs.

use super::{ColumnMeta, DbClient, QueryOutput, SqlValue};
use crate::error::{ExtractError, Result};
use duckdb::types::{TimeUnit, ValueRef};
use duckdb::Connection;
use std::path::Path;

/// Client over an embedded DuckDB database.
pub struct DuckDbClient {
    conn: Connection,
}

impl DuckDbClient {
    /// Open a database file.
    pub fn open(path: &Path) -> duckdb::Result<Self> {
        Ok(Self {
            conn: Connection::open(path)?,
        })
    }

    /// Open an in-memory database.
    pub fn open_in_memory() -> duckdb::Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// The underlying connection, for loading fixtures and replaying
    /// extracted scripts.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Execute a statement that returns no rows (e.g. CREATE, INSERT).
    pub fn execute(&self, sql: &str) -> Result<usize> {
        self.conn
            .execute(sql, [])
            .map_err(|e| ExtractError::query(sql, e))
    }
}

impl DbClient for DuckDbClient {
    fn table_columns(&self, table: &str) -> Result<Vec<ColumnMeta>> {
        const SQL: &str = "SELECT column_name, data_type \
                           FROM information_schema.columns \
                           WHERE table_schema = 'main' AND table_name = ? \
                           ORDER BY ordinal_position";

        let mut stmt = self
            .conn
            .prepare(SQL)
            .map_err(|e| ExtractError::query(SQL, e))?;
        let mut rows = stmt
            .query([table])
            .map_err(|e| ExtractError::query(SQL, e))?;

        let mut columns = Vec::new();
        while let Some(row) = rows.next().map_err(|e| ExtractError::query(SQL, e))? {
            let name: String = row.get(0).map_err(|e| ExtractError::query(SQL, e))?;
            let data_type: String = row.get(1).map_err(|e| ExtractError::query(SQL, e))?;
            columns.push(ColumnMeta {
                name,
                raw_type: source_type_name(&data_type),
            });
        }
        Ok(columns)
    }

    fn create_table_ddl(&self, table: &str) -> Result<String> {
        const SQL: &str = "SELECT sql FROM duckdb_tables() \
                           WHERE schema_name = 'main' AND table_name = ?";

        let mut stmt = self
            .conn
            .prepare(SQL)
            .map_err(|e| ExtractError::query(SQL, e))?;
        let mut rows = stmt
            .query([table])
            .map_err(|e| ExtractError::query(SQL, e))?;

        match rows.next().map_err(|e| ExtractError::query(SQL, e))? {
            Some(row) => {
                let ddl: String = row.get(0).map_err(|e| ExtractError::query(SQL, e))?;
                Ok(ddl.trim().trim_end_matches(';').to_string())
            }
            None => Err(ExtractError::query(
                SQL,
                format!("no such table: {}", table),
            )),
        }
    }

    fn query(&self, sql: &str) -> Result<QueryOutput> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| ExtractError::query(sql, e))?;
        let mut rows_result = stmt.query([]).map_err(|e| ExtractError::query(sql, e))?;

        let mut rows: Vec<Vec<SqlValue>> = Vec::new();
        let mut column_count = 0;

        while let Some(row) = rows_result
            .next()
            .map_err(|e| ExtractError::query(sql, e))?
        {
            if column_count == 0 {
                column_count = row.as_ref().column_count();
            }

            let mut values = Vec::with_capacity(column_count);
            for i in 0..column_count {
                let value_ref = row
                    .get_ref(i)
                    .map_err(|e| ExtractError::query(sql, e))?;
                values.push(map_value(value_ref));
            }
            rows.push(values);
        }

        // Drop the rows iterator to release the mutable borrow before
        // reading column names off the statement.
        drop(rows_result);

        let column_count = stmt.column_count();
        let fields: Vec<String> = (0..column_count)
            .map(|i| {
                stmt.column_name(i)
                    .map(|s| s.to_string())
                    .unwrap_or_else(|_| format!("col{}", i))
            })
            .collect();

        Ok(QueryOutput { fields, rows })
    }

    fn list_tables(&self) -> Result<Vec<String>> {
        let output = self.query(
            "SELECT table_name FROM information_schema.tables \
             WHERE table_schema = 'main' ORDER BY table_name",
        )?;
        Ok(output
            .rows
            .into_iter()
            .filter_map(|mut row| match row.pop()? {
                SqlValue::Text(name) => Some(name),
                _ => None,
            })
            .collect())
    }
}

/// Convert one DuckDB value into the engine's raw value model.
///
/// Temporal and decimal values become their canonical textual form; the
/// serializer only ever sees text for those, matching what a wire-protocol
/// client would hand back.
fn map_value(value: ValueRef<'_>) -> SqlValue {
    match value {
        ValueRef::Null => SqlValue::Null,
        ValueRef::Boolean(b) => SqlValue::Int(i64::from(b)),
        ValueRef::TinyInt(n) => SqlValue::Int(n as i64),
        ValueRef::SmallInt(n) => SqlValue::Int(n as i64),
        ValueRef::Int(n) => SqlValue::Int(n as i64),
        ValueRef::BigInt(n) => SqlValue::Int(n),
        ValueRef::HugeInt(n) => i64::try_from(n)
            .map(SqlValue::Int)
            .unwrap_or_else(|_| SqlValue::Text(n.to_string())),
        ValueRef::UTinyInt(n) => SqlValue::Int(n as i64),
        ValueRef::USmallInt(n) => SqlValue::Int(n as i64),
        ValueRef::UInt(n) => SqlValue::Int(n as i64),
        ValueRef::UBigInt(n) => i64::try_from(n)
            .map(SqlValue::Int)
            .unwrap_or_else(|_| SqlValue::Text(n.to_string())),
        ValueRef::Float(f) => SqlValue::Float(f as f64),
        ValueRef::Double(f) => SqlValue::Float(f),
        ValueRef::Decimal(d) => SqlValue::Text(d.to_string()),
        ValueRef::Text(s) => SqlValue::Text(String::from_utf8_lossy(s).to_string()),
        ValueRef::Blob(b) => SqlValue::Text(String::from_utf8_lossy(b).to_string()),
        ValueRef::Timestamp(unit, t) => {
            // The payload's scale follows the column's declared precision
            // (TIMESTAMP_S, TIMESTAMP_MS, TIMESTAMP, TIMESTAMP_NS).
            let (secs, nanos) = secs_and_nanos(unit, t);
            if let Some(dt) = chrono::DateTime::from_timestamp(secs, nanos) {
                SqlValue::Text(dt.format("%Y-%m-%d %H:%M:%S").to_string())
            } else {
                SqlValue::Text(t.to_string())
            }
        }
        ValueRef::Date32(days) => {
            // Days since epoch (1970-01-01); 719163 = days from 0001-01-01.
            if let Some(date) = chrono::NaiveDate::from_num_days_from_ce_opt(719163 + days) {
                SqlValue::Text(date.format("%Y-%m-%d").to_string())
            } else {
                SqlValue::Text(days.to_string())
            }
        }
        ValueRef::Time64(unit, t) => {
            let (secs, nanos) = secs_and_nanos(unit, t);
            let time = u32::try_from(secs)
                .ok()
                .and_then(|s| chrono::NaiveTime::from_num_seconds_from_midnight_opt(s, nanos));
            if let Some(time) = time {
                SqlValue::Text(time.format("%H:%M:%S").to_string())
            } else {
                SqlValue::Text(t.to_string())
            }
        }
        other => SqlValue::Text(format!("{:?}", other)),
    }
}

/// Split a temporal payload in the given unit into whole seconds and a
/// nanosecond remainder. Euclidean division keeps pre-epoch values exact.
fn secs_and_nanos(unit: TimeUnit, t: i64) -> (i64, u32) {
    match unit {
        TimeUnit::Second => (t, 0),
        TimeUnit::Millisecond => (t.div_euclid(1_000), (t.rem_euclid(1_000) * 1_000_000) as u32),
        TimeUnit::Microsecond => (t.div_euclid(1_000_000), (t.rem_euclid(1_000_000) * 1_000) as u32),
        TimeUnit::Nanosecond => (t.div_euclid(1_000_000_000), t.rem_euclid(1_000_000_000) as u32),
    }
}

/// Map a DuckDB canonical type name to the source vocabulary the
/// normalizer understands.
fn source_type_name(data_type: &str) -> String {
    let trimmed = data_type.trim();
    let base = trimmed.split('(').next().unwrap_or(trimmed).trim();

    match base {
        "TIMESTAMP" | "TIMESTAMP_S" | "TIMESTAMP_MS" | "TIMESTAMP_NS"
        | "TIMESTAMP WITH TIME ZONE" => "datetime".to_string(),
        "BOOLEAN" => "tinyint(1)".to_string(),
        "HUGEINT" | "UBIGINT" => "bigint".to_string(),
        "UINTEGER" | "USMALLINT" | "UTINYINT" => "int".to_string(),
        "BYTEA" | "VARBINARY" | "BINARY" => "blob".to_string(),
        _ => trimmed.to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_type_name_passthrough_lowercases() {
        assert_eq!(source_type_name("VARCHAR"), "varchar");
        assert_eq!(source_type_name("INTEGER"), "integer");
        assert_eq!(source_type_name("BIGINT"), "bigint");
        assert_eq!(source_type_name("SMALLINT"), "smallint");
        assert_eq!(source_type_name("TINYINT"), "tinyint");
        assert_eq!(source_type_name("BLOB"), "blob");
        assert_eq!(source_type_name("DECIMAL(10,0)"), "decimal(10,0)");
    }

    #[test]
    fn test_source_type_name_timestamp_aliases() {
        assert_eq!(source_type_name("TIMESTAMP"), "datetime");
        assert_eq!(source_type_name("TIMESTAMP_MS"), "datetime");
        assert_eq!(source_type_name("TIMESTAMP WITH TIME ZONE"), "datetime");
    }

    #[test]
    fn test_source_type_name_special_cases() {
        assert_eq!(source_type_name("BOOLEAN"), "tinyint(1)");
        assert_eq!(source_type_name("HUGEINT"), "bigint");
        assert_eq!(source_type_name("UINTEGER"), "int");
        assert_eq!(source_type_name("BYTEA"), "blob");
    }

    #[test]
    fn test_source_type_name_unsupported_families_pass_through() {
        // The normalizer rejects these; mapping must not hide them.
        assert_eq!(source_type_name("DOUBLE"), "double");
        assert_eq!(source_type_name("DATE"), "date");
        assert_eq!(source_type_name("UUID"), "uuid");
    }

    #[test]
    fn test_map_value_integers_and_null() {
        assert_eq!(map_value(ValueRef::Null), SqlValue::Null);
        assert_eq!(map_value(ValueRef::Int(5)), SqlValue::Int(5));
        assert_eq!(map_value(ValueRef::TinyInt(1)), SqlValue::Int(1));
        assert_eq!(map_value(ValueRef::Boolean(true)), SqlValue::Int(1));
        assert_eq!(map_value(ValueRef::Boolean(false)), SqlValue::Int(0));
    }

    #[test]
    fn test_map_value_text_and_floats() {
        assert_eq!(
            map_value(ValueRef::Text(b"Bob")),
            SqlValue::Text("Bob".to_string())
        );
        assert_eq!(map_value(ValueRef::Double(41.2318)), SqlValue::Float(41.2318));
    }

    #[test]
    fn test_map_value_timestamp_scales_by_unit() {
        // 2014-12-25 11:11:11 UTC at each declared precision.
        let wall = SqlValue::Text("2014-12-25 11:11:11".to_string());
        assert_eq!(
            map_value(ValueRef::Timestamp(TimeUnit::Second, 1_419_505_871)),
            wall
        );
        assert_eq!(
            map_value(ValueRef::Timestamp(TimeUnit::Millisecond, 1_419_505_871_000)),
            wall
        );
        assert_eq!(
            map_value(ValueRef::Timestamp(TimeUnit::Microsecond, 1_419_505_871_000_000)),
            wall
        );
        assert_eq!(
            map_value(ValueRef::Timestamp(TimeUnit::Nanosecond, 1_419_505_871_000_000_000)),
            wall
        );
    }

    #[test]
    fn test_map_value_timestamp_before_epoch() {
        assert_eq!(
            map_value(ValueRef::Timestamp(TimeUnit::Second, -1)),
            SqlValue::Text("1969-12-31 23:59:59".to_string())
        );
        assert_eq!(
            map_value(ValueRef::Timestamp(TimeUnit::Millisecond, -500)),
            SqlValue::Text("1969-12-31 23:59:59".to_string())
        );
    }

    #[test]
    fn test_map_value_time_scales_by_unit() {
        let wall = SqlValue::Text("11:11:11".to_string());
        assert_eq!(map_value(ValueRef::Time64(TimeUnit::Second, 40_271)), wall);
        assert_eq!(
            map_value(ValueRef::Time64(TimeUnit::Microsecond, 40_271_000_000)),
            wall
        );
    }
}

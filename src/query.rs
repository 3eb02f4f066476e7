//! SELECT statement construction.
//!
//! Builds the one query shape the extractor needs: a column list (or `*`)
//! over a single table, optionally filtered to a set of primary-key ids.
//! No ordering, joins, or pagination. The statement carries no trailing
//! semicolon; callers terminate statements themselves.

use crate::schema::ColumnMap;

/// Build the SELECT statement for one table extraction.
///
/// Column names come from the map in its stored order, comma-joined with
/// no surrounding whitespace. An empty map degrades the select-list to
/// `*`. An id list, when present and non-empty, appends
/// ` WHERE id IN (...)` with ids rendered bare, in the order given.
pub fn build_select(table: &str, columns: &ColumnMap, ids: Option<&[i64]>) -> String {
    let select_list = if columns.is_empty() {
        "*".to_string()
    } else {
        columns.names().collect::<Vec<_>>().join(",")
    };

    let mut sql = format!("SELECT {} FROM {}", select_list, table);

    if let Some(ids) = ids {
        if !ids.is_empty() {
            let id_list = ids
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(",");
            sql.push_str(" WHERE id IN (");
            sql.push_str(&id_list);
            sql.push(')');
        }
    }

    sql
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnType;

    fn students_map(columns: &[(&str, ColumnType)]) -> ColumnMap {
        let mut map = ColumnMap::new();
        for (name, col_type) in columns {
            map.insert(*name, *col_type);
        }
        map
    }

    #[test]
    fn test_empty_map_selects_star() {
        let map = ColumnMap::new();
        assert_eq!(build_select("students", &map, None), "SELECT * FROM students");
    }

    #[test]
    fn test_columns_joined_in_map_order() {
        let map = students_map(&[
            ("id", ColumnType::Int),
            ("first_name", ColumnType::Varchar),
            ("last_name", ColumnType::Varchar),
            ("created_at", ColumnType::Datetime),
            ("active", ColumnType::Int),
            ("comments", ColumnType::Text),
            ("tuition", ColumnType::Decimal),
            ("stuff", ColumnType::Blob),
        ]);

        assert_eq!(
            build_select("students", &map, None),
            "SELECT id,first_name,last_name,created_at,active,comments,tuition,stuff FROM students"
        );
    }

    #[test]
    fn test_ids_append_where_in_clause() {
        let map = students_map(&[
            ("first_name", ColumnType::Varchar),
            ("last_name", ColumnType::Varchar),
        ]);

        let ids = vec![1, 2];
        assert_eq!(
            build_select("students", &map, Some(&ids)),
            "SELECT first_name,last_name FROM students WHERE id IN (1,2)"
        );
    }

    #[test]
    fn test_ids_keep_given_order() {
        let map = students_map(&[("id", ColumnType::Int)]);
        let ids = vec![7, 3, 5];
        assert_eq!(
            build_select("students", &map, Some(&ids)),
            "SELECT id FROM students WHERE id IN (7,3,5)"
        );
    }

    #[test]
    fn test_empty_id_list_adds_no_filter() {
        let map = students_map(&[("id", ColumnType::Int)]);
        let ids: Vec<i64> = Vec::new();
        assert_eq!(
            build_select("students", &map, Some(&ids)),
            "SELECT id FROM students"
        );
    }
}

//! `parameter_data` layout and the statements written against it
//!
//! Column names exist only here; everything upstream addresses parameters by
//! index.

use std::sync::OnceLock;

use pdi_common::parameters::{column_name, PARAMETER_COUNT};

pub const TABLE: &str = "parameter_data";

/// Metadata columns, in insert order, ahead of the 256 parameter columns
pub const METADATA_COLUMNS: [&str; 5] = [
    "read_at",
    "parameter_set",
    "validated_at",
    "valid_by",
    "reader_type",
];

/// Total bound values in the structured insert
pub const INSERT_COLUMN_COUNT: usize = METADATA_COLUMNS.len() + PARAMETER_COUNT;

pub const INSERT_JSON_FUNCTION: &str = "insert_parameter_data_json";
pub const INSERT_FUNCTION: &str = "insert_parameter_data";

/// Every insert column in order: metadata first, then `parameter00..parameterFF`
pub fn insert_columns() -> Vec<String> {
    METADATA_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain((0..=u8::MAX).map(column_name))
        .collect()
}

/// `INSERT INTO parameter_data (...) VALUES ($1..$261) RETURNING id`
pub fn insert_statement() -> &'static str {
    static STATEMENT: OnceLock<String> = OnceLock::new();

    STATEMENT.get_or_init(|| {
        let columns = insert_columns().join(", ");
        let placeholders = (1..=INSERT_COLUMN_COUNT)
            .map(|n| format!("${n}"))
            .collect::<Vec<_>>()
            .join(", ");

        format!("INSERT INTO {TABLE} ({columns}) VALUES ({placeholders}) RETURNING id")
    })
}

/// Call of the JSON insert function; the argument is bound as text
pub fn insert_json_call() -> String {
    format!("SELECT {INSERT_JSON_FUNCTION}($1::jsonb)")
}

/// Call of the positional insert function
pub fn insert_call() -> String {
    format!("SELECT {INSERT_FUNCTION}($1, $2, $3, $4, $5)")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_columns_order() {
        let columns = insert_columns();

        assert_eq!(columns.len(), 261);
        assert_eq!(&columns[..5], &METADATA_COLUMNS.map(String::from));
        assert_eq!(columns[5], "parameter00");
        assert_eq!(columns[5 + 0x0A], "parameter0A");
        assert_eq!(columns[260], "parameterFF");
    }

    #[test]
    fn test_insert_statement_shape() {
        let sql = insert_statement();

        assert!(sql.starts_with("INSERT INTO parameter_data (read_at, parameter_set, validated_at, valid_by, reader_type, parameter00,"));
        assert!(sql.contains("parameterFF) VALUES ($1, $2,"));
        assert!(sql.contains("$261)"));
        assert!(!sql.contains("$262"));
        assert!(sql.ends_with("RETURNING id"));
    }

    #[test]
    fn test_insert_statement_is_cached() {
        assert!(std::ptr::eq(insert_statement(), insert_statement()));
    }

    #[test]
    fn test_function_calls() {
        assert_eq!(insert_json_call(), "SELECT insert_parameter_data_json($1::jsonb)");
        assert_eq!(insert_call(), "SELECT insert_parameter_data($1, $2, $3, $4, $5)");
    }
}

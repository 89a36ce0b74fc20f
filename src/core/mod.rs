// Module declarations
pub mod error;
pub mod value;
pub mod sql_type;
pub mod column;
pub mod row;
pub mod table;

// Re-exports for convenience
pub use error::{ConvertError, Result, SkipError, SourceError, ValueError};
pub use value::Value;
pub use sql_type::SqlType;
pub use column::ColumnMetadata;
pub use row::Row;
pub use table::Table;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use rust_decimal::Decimal;

    fn users_columns() -> Vec<ColumnMetadata> {
        vec![
            ColumnMetadata::new("id", SqlType::Integer).not_null(),
            ColumnMetadata::new("name", SqlType::Varchar),
        ]
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Integer(42).to_string(), "42");
        assert_eq!(Value::Double(2.5).to_string(), "2.5");
        assert_eq!(Value::Text("hello".to_string()).to_string(), "hello");
        assert_eq!(Value::Boolean(true).to_string(), "true");
        assert_eq!(Value::Bytea(vec![0xde, 0xad]).to_string(), "\\xdead");
        assert_eq!(Value::Numeric(Decimal::new(12345, 2)).to_string(), "123.45");
        assert_eq!(
            Value::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()).to_string(),
            "2024-02-29"
        );
        assert_eq!(
            Value::Time(NaiveTime::from_hms_opt(7, 5, 3).unwrap()).to_string(),
            "07:05:03"
        );
    }

    #[test]
    fn test_value_as_i128() {
        assert_eq!(Value::TinyInt(-3).as_i128(), Some(-3));
        assert_eq!(Value::BigInt(i64::MAX).as_i128(), Some(i128::from(i64::MAX)));
        assert_eq!(Value::HugeInt(u64::MAX.into()).as_i128(), Some(i128::from(u64::MAX)));
        assert_eq!(Value::Text("1".to_string()).as_i128(), None);
        assert_eq!(Value::Null.as_i128(), None);
    }

    #[test]
    fn test_value_as_text() {
        assert_eq!(Value::Text("hello".to_string()).as_text(), Some("hello"));
        assert_eq!(Value::Integer(42).as_text(), None);
    }

    #[test]
    fn test_value_as_bool() {
        assert_eq!(Value::Boolean(true).as_bool(), Some(true));
        assert_eq!(Value::Boolean(false).as_bool(), Some(false));
        assert_eq!(Value::Integer(1).as_bool(), None);
    }

    #[test]
    fn test_table_creation() {
        let table = Table::new("users", users_columns());
        assert_eq!(table.name, "users");
        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.executions(), 0);
    }

    #[test]
    fn test_table_insert() {
        let mut table = Table::new("users", users_columns());
        let row = Row::new(vec![Value::Integer(1), Value::Text("Alice".to_string())]);

        assert!(table.insert(row).is_ok());
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_table_insert_wrong_column_count() {
        let mut table = Table::new("users", users_columns());
        let row = Row::new(vec![Value::Integer(1)]);

        assert!(matches!(
            table.insert(row),
            Err(ConvertError::ColumnCountMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_table_get_column_index() {
        let table = Table::new("users", users_columns());
        assert_eq!(table.get_column_index("id"), Some(0));
        assert_eq!(table.get_column_index("name"), Some(1));
        assert_eq!(table.get_column_index("age"), None);
    }

    #[test]
    fn test_table_json_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");

        let mut table = Table::new("users", users_columns());
        table.insert(vec![Value::Integer(1), Value::Text("Alice".to_string())]).unwrap();
        table.insert(vec![Value::Integer(2), Value::Null]).unwrap();
        table.save_json(&path).unwrap();

        let loaded = Table::load_json(&path).unwrap();
        assert_eq!(loaded.name, "users");
        assert_eq!(loaded.columns, table.columns);
        assert_eq!(loaded.rows, table.rows);
    }

    #[test]
    fn test_table_json_snapshot_rejects_ragged_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ragged.json");
        std::fs::write(
            &path,
            r#"{"name":"t","columns":[{"name":"id","sql_type":4}],"rows":[{"values":[{"Integer":1},{"Integer":2}]}]}"#,
        )
        .unwrap();

        assert!(matches!(
            Table::load_json(&path),
            Err(ConvertError::ColumnCountMismatch { expected: 1, actual: 2 })
        ));
    }
}

use std::fs;
use std::path::Path;

use miette::{IntoDiagnostic, Result, WrapErr};
use serde_json::Value as JsonValue;

use crate::exec::row::{Row, Value};

/// Reads the complete row set of one table from its JSON data file: an
/// array of objects, one object per row. The read is synchronous and total.
pub fn read_table_rows(path: &Path) -> Result<Vec<Row>> {
    let data = fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read data file {}", path.display()))?;

    let records: Vec<serde_json::Map<String, JsonValue>> = serde_json::from_str(&data)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to parse data file {}", path.display()))?;

    Ok(records.into_iter().map(row_from_record).collect())
}

fn row_from_record(record: serde_json::Map<String, JsonValue>) -> Row {
    let mut row = Row::new();
    for (name, value) in record {
        // nulls and nested values have no scalar representation; drop them
        if let Some(value) = convert_value(value) {
            row.insert(&name, value);
        }
    }
    row
}

fn convert_value(value: JsonValue) -> Option<Value> {
    match value {
        JsonValue::Number(number) => match number.as_i64() {
            Some(integer) => Some(Value::Integer(integer)),
            None => number.as_f64().map(Value::Float),
        },
        JsonValue::String(text) => Some(Value::Text(text)),
        JsonValue::Bool(boolean) => Some(Value::Boolean(boolean)),
        JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join("squill-source-tests");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_reads_typed_rows() {
        let path = write_temp(
            "typed.json",
            r#"[{"id": 1, "name": "Alice", "score": 2.5, "active": true}]"#,
        );

        let rows = read_table_rows(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("id"), Some(&Value::Integer(1)));
        assert_eq!(rows[0].get("name"), Some(&Value::Text("Alice".to_owned())));
        assert_eq!(rows[0].get("score"), Some(&Value::Float(2.5)));
        assert_eq!(rows[0].get("active"), Some(&Value::Boolean(true)));
    }

    #[test]
    fn test_null_fields_are_dropped() {
        let path = write_temp("nulls.json", r#"[{"id": 1, "email": null}]"#);

        let rows = read_table_rows(&path).unwrap();
        assert_eq!(rows[0].get("id"), Some(&Value::Integer(1)));
        assert_eq!(rows[0].get("email"), None);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let path = std::env::temp_dir().join("squill-source-tests/does-not-exist.json");
        assert!(read_table_rows(&path).is_err());
    }
}

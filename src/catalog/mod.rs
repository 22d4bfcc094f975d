use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use log::debug;
use miette::{IntoDiagnostic, Result, WrapErr, miette};
use serde::Deserialize;

/// Column types declared in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Integer,
    Float,
    Text,
    Boolean,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DataType::Integer => "INTEGER",
            DataType::Float => "FLOAT",
            DataType::Text => "TEXT",
            DataType::Boolean => "BOOLEAN",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: DataType,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Index {
    pub name: String,
    pub columns: Vec<String>,
}

/// Per-table statistics, declared for future cost estimation. Planning does
/// not consult them yet.
#[derive(Debug, Clone, Deserialize)]
pub struct Statistics {
    pub row_count: u64,
    #[serde(default)]
    pub distinct_count: HashMap<String, u64>,
    #[serde(default)]
    pub null_count: HashMap<String, u64>,
}

/// Metadata for one table: its schema, indexes, optional statistics, and
/// where its rows live.
#[derive(Debug, Clone, Deserialize)]
pub struct TableInfo {
    pub name: String,
    pub columns: Vec<Column>,
    #[serde(default)]
    pub indexes: Vec<Index>,
    #[serde(default)]
    pub statistics: Option<Statistics>,
    /// Data location, relative to the catalog file's directory.
    pub data_file: String,
}

impl TableInfo {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }
}

/// The catalog of all known tables.
///
/// Loaded once before any query runs and read-only afterwards; the planner
/// and executor hold shared references to it, never a global.
#[derive(Debug, Default)]
pub struct Catalog {
    tables: HashMap<String, TableInfo>,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
        }
    }

    /// Loads table metadata from a JSON file holding an array of table
    /// descriptions.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to read catalog file {}", path.display()))?;

        let tables: Vec<TableInfo> = serde_json::from_str(&data)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to parse catalog file {}", path.display()))?;

        let mut catalog = Self::new();
        for table in tables {
            debug!("registered table '{}' ({} columns)", table.name, table.columns.len());
            catalog.register_table(table);
        }

        Ok(catalog)
    }

    pub fn register_table(&mut self, table: TableInfo) {
        self.tables.insert(table.name.clone(), table);
    }

    pub fn get_table(&self, name: &str) -> Result<&TableInfo> {
        self.tables
            .get(name)
            .ok_or_else(|| miette!("table '{name}' not found in catalog"))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG_JSON: &str = r#"[
        {
            "name": "users",
            "columns": [
                {"name": "id", "type": "integer"},
                {"name": "name", "type": "text"}
            ],
            "indexes": [{"name": "users_pk", "columns": ["id"]}],
            "statistics": {"row_count": 2, "distinct_count": {"id": 2}},
            "data_file": "users.json"
        }
    ]"#;

    fn load_test_catalog() -> Catalog {
        let dir = std::env::temp_dir().join("squill-catalog-tests");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("catalog.json");
        fs::write(&path, CATALOG_JSON).unwrap();
        Catalog::load_from_file(&path).unwrap()
    }

    #[test]
    fn test_load_from_file() {
        let catalog = load_test_catalog();
        assert_eq!(catalog.len(), 1);

        let table = catalog.get_table("users").unwrap();
        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.columns[0].data_type, DataType::Integer);
        assert_eq!(table.data_file, "users.json");
        assert_eq!(table.indexes[0].columns, vec!["id"]);
        assert_eq!(table.statistics.as_ref().unwrap().row_count, 2);
    }

    #[test]
    fn test_get_table_not_found() {
        let catalog = load_test_catalog();
        let err = catalog.get_table("missing").unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_column_lookup() {
        let catalog = load_test_catalog();
        let table = catalog.get_table("users").unwrap();

        assert_eq!(table.column("name").unwrap().data_type, DataType::Text);
        assert!(table.column("missing").is_none());
    }
}

//! Column access for the engine

use ahash::AHashMap;
use simx_core::{Error, Result, Value};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Supplies raw column data by column id
pub trait ColumnSource: Send + Sync {
    fn attribute_data(&self, column: &str) -> Result<Arc<[Value]>>;
}

/// Columns held in memory, loadable from a JSON object of arrays
#[derive(Debug, Default, Clone)]
pub struct InMemoryTable {
    columns: AHashMap<String, Arc<[Value]>>,
}

impl InMemoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_column(mut self, name: impl Into<String>, values: Vec<Value>) -> Self {
        self.insert(name, values);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, values: Vec<Value>) {
        self.columns.insert(name.into(), values.into());
    }

    /// Parse `{"column": [values...], ...}`
    pub fn from_json_str(json: &str) -> Result<Self> {
        let columns: HashMap<String, Vec<Value>> = serde_json::from_str(json)?;
        Ok(Self {
            columns: columns.into_iter().map(|(k, v)| (k, v.into())).collect(),
        })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl ColumnSource for InMemoryTable {
    fn attribute_data(&self, column: &str) -> Result<Arc<[Value]>> {
        self.columns
            .get(column)
            .cloned()
            .ok_or_else(|| Error::UnknownColumn(column.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_lookup() {
        let table = InMemoryTable::new().with_column("age", vec![Value::from(31.0), Value::Missing]);
        assert_eq!(table.attribute_data("age").unwrap().len(), 2);
        assert!(matches!(table.attribute_data("height"), Err(Error::UnknownColumn(c)) if c == "height"));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"kind": ["a", "b", null], "size": [1, 2.5, "NA"]}}"#).unwrap();

        let table = InMemoryTable::from_path(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        let kind = table.attribute_data("kind").unwrap();
        assert!(kind[2].is_missing());
        let size = table.attribute_data("size").unwrap();
        assert_eq!(size[1].as_f64(), Some(2.5));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(InMemoryTable::from_json_str("[1, 2]"), Err(Error::Serialization(_))));
    }
}

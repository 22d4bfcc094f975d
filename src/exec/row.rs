use std::fmt;

/// A dynamically typed scalar. Row value types are not known until
/// evaluation time.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(v) => write!(f, "{v}"),
            Value::Boolean(v) => write!(f, "{v}"),
        }
    }
}

/// An insertion-ordered mapping from column name to value.
///
/// Keys are not required to be unique across the two halves of a join;
/// inserting an existing key overwrites its value in place, so the last
/// write wins while the column keeps its original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    entries: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: Value) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name.to_owned(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut row = Row::new();
        row.insert("id", Value::Integer(1));
        row.insert("name", Value::Text("Alice".to_owned()));

        assert_eq!(row.len(), 2);
        assert_eq!(row.get("id"), Some(&Value::Integer(1)));
        assert_eq!(row.get("missing"), None);
    }

    #[test]
    fn test_insert_overwrites_in_place() {
        let mut row = Row::new();
        row.insert("id", Value::Integer(1));
        row.insert("name", Value::Text("Alice".to_owned()));
        row.insert("id", Value::Integer(2));

        assert_eq!(row.len(), 2);
        assert_eq!(row.get("id"), Some(&Value::Integer(2)));

        // the overwritten column keeps its original position
        let names: Vec<_> = row.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["id", "name"]);
    }
}

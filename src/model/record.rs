//! Row records
//!
//! The table only needs two things from a row: a stable identity and a way
//! to look up a field by its `data_index`.

use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};

/// A row that can be displayed by the table
///
/// `Default` provides the empty placeholder handed to header renderers.
pub trait Record: Default {
    /// Stable identifier, used as the row key
    fn id(&self) -> String;

    /// Stringified value of the field at `data_index`, if present
    fn field(&self, data_index: &str) -> Option<String>;
}

/// Text shown in a cell that has no custom renderer
pub fn cell_text<T: Record>(record: &T, data_index: &str) -> String {
    record.field(data_index).unwrap_or_default()
}

/// Stringify a JSON value the way it should appear in a cell
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Generic row backed by a JSON object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataRow {
    pub id: String,
    pub fields: BTreeMap<String, Value>,
}

impl DataRow {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Build a row from a JSON object
    ///
    /// The `id` field is used as identity when present, otherwise `#` and the
    /// row's position. Non-object values become a single `value` field.
    pub fn from_value(value: Value, position: usize) -> Self {
        let fields: Map<String, Value> = match value {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };

        let id = fields
            .get("id")
            .map(value_to_text)
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("#{}", position));

        Self {
            id,
            fields: fields.into_iter().collect(),
        }
    }

    /// Field names in key order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

/// Make row ids unique, suffixing repeats with `#2`, `#3`, ...
pub fn dedupe_ids(rows: &mut [DataRow]) {
    let mut seen = HashSet::new();
    for row in rows.iter_mut() {
        if seen.insert(row.id.clone()) {
            continue;
        }
        let mut n = 2;
        while !seen.insert(format!("{}#{}", row.id, n)) {
            n += 1;
        }
        row.id = format!("{}#{}", row.id, n);
    }
}

impl Record for DataRow {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn field(&self, data_index: &str) -> Option<String> {
        self.fields.get(data_index).map(value_to_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cell_text_stringifies_values() {
        let row = DataRow::new("1")
            .with("name", "ada")
            .with("age", 36)
            .with("active", true)
            .with("score", 1.5)
            .with("note", Value::Null);

        assert_eq!(cell_text(&row, "name"), "ada");
        assert_eq!(cell_text(&row, "age"), "36");
        assert_eq!(cell_text(&row, "active"), "true");
        assert_eq!(cell_text(&row, "score"), "1.5");
        assert_eq!(cell_text(&row, "note"), "");
        assert_eq!(cell_text(&row, "missing"), "");
    }

    #[test]
    fn test_from_value_uses_id_field() {
        let row = DataRow::from_value(json!({"id": 7, "a": "x"}), 0);
        assert_eq!(row.id(), "7");
        assert_eq!(row.field("a").as_deref(), Some("x"));
    }

    #[test]
    fn test_from_value_falls_back_to_position() {
        let row = DataRow::from_value(json!({"a": "x"}), 3);
        assert_eq!(row.id(), "#3");

        let scalar = DataRow::from_value(json!(42), 1);
        assert_eq!(scalar.id(), "#1");
        assert_eq!(scalar.field("value").as_deref(), Some("42"));
    }

    #[test]
    fn test_dedupe_ids() {
        let mut rows = vec![
            DataRow::new("1"),
            DataRow::new("1"),
            DataRow::new("1#2"),
            DataRow::new("2"),
            DataRow::new("1"),
        ];
        dedupe_ids(&mut rows);
        let ids: Vec<String> = rows.iter().map(Record::id).collect();
        assert_eq!(ids, vec!["1", "1#2", "1#2#2", "2", "1#3"]);
    }

    #[test]
    fn test_placeholder_is_empty() {
        let placeholder = DataRow::default();
        assert!(placeholder.id().is_empty());
        assert_eq!(placeholder.keys().count(), 0);
    }
}

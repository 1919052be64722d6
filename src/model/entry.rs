use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::field::{Field, Value};

/// One row of data in a section. Values are keyed by field name; the map
/// is flattened so a persisted entry is one flat JSON object.
///
/// Invariant (maintained by the schema ops): the value keys are exactly
/// the owning section's field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: u64,
    #[serde(flatten)]
    pub values: IndexMap<String, Value>,
}

impl Entry {
    /// Create an entry with every field at its type default
    pub fn blank(id: u64, fields: &[Field]) -> Self {
        let values = fields
            .iter()
            .map(|f| (f.name.clone(), f.kind.default_value()))
            .collect();
        Entry { id, values }
    }

    pub fn value(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Whether this entry's keys match the given field list exactly
    pub fn conforms_to(&self, fields: &[Field]) -> bool {
        self.values.len() == fields.len()
            && fields.iter().all(|f| self.values.contains_key(&f.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::field::FieldType;

    fn book_fields() -> Vec<Field> {
        vec![
            Field::new("title", FieldType::Text),
            Field::new("digital", FieldType::Checkbox),
        ]
    }

    #[test]
    fn test_blank_fills_type_defaults() {
        let e = Entry::blank(1, &book_fields());
        assert_eq!(e.value("title"), Some(&Value::text("")));
        assert_eq!(e.value("digital"), Some(&Value::Checkbox(false)));
        assert!(e.conforms_to(&book_fields()));
    }

    #[test]
    fn test_serde_flat_object() {
        let mut e = Entry::blank(3, &book_fields());
        e.values.insert("title".into(), Value::text("Dune"));
        e.values.insert("digital".into(), Value::Checkbox(true));
        let json = serde_json::to_string(&e).unwrap();
        assert_eq!(json, r#"{"id":3,"title":"Dune","digital":true}"#);

        let back: Entry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
    }

    #[test]
    fn test_conforms_detects_drift() {
        let mut e = Entry::blank(1, &book_fields());
        e.values.shift_remove("digital");
        assert!(!e.conforms_to(&book_fields()));
        e.values.insert("digital".into(), Value::Checkbox(false));
        e.values.insert("stray".into(), Value::text("?"));
        assert!(!e.conforms_to(&book_fields()));
    }
}

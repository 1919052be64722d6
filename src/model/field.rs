use serde::{Deserialize, Serialize};

/// The declared type of a section field (a table column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Checkbox,
}

impl FieldType {
    /// The value back-filled into entries when a field of this type appears
    pub fn default_value(self) -> Value {
        match self {
            FieldType::Text => Value::Text(String::new()),
            FieldType::Checkbox => Value::Checkbox(false),
        }
    }

    /// Parse a type name as used on the CLI and in documents
    pub fn parse_type(s: &str) -> Option<FieldType> {
        match s {
            "text" => Some(FieldType::Text),
            "checkbox" => Some(FieldType::Checkbox),
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::Text => write!(f, "text"),
            FieldType::Checkbox => write!(f, "checkbox"),
        }
    }
}

/// A field definition: name plus declared type.
/// Identity is the name; renaming is a migration, not a new field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldType,
}

impl Field {
    pub fn new(name: impl Into<String>, kind: FieldType) -> Self {
        Field {
            name: name.into(),
            kind,
        }
    }
}

/// A single cell value. Untagged so a persisted entry reads as one flat
/// object: `{"id":1,"title":"Dune","digital":true}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Checkbox(bool),
    Text(String),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Value {
        Value::Text(s.into())
    }

    /// The field type this value belongs to
    pub fn kind(&self) -> FieldType {
        match self {
            Value::Text(_) => FieldType::Text,
            Value::Checkbox(_) => FieldType::Checkbox,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Checkbox(_) => None,
        }
    }

    pub fn as_checkbox(&self) -> Option<bool> {
        match self {
            Value::Checkbox(b) => Some(*b),
            Value::Text(_) => None,
        }
    }

    /// Truthiness for filtering: a checkbox is its own state, text is
    /// truthy when non-empty.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Checkbox(b) => *b,
            Value::Text(s) => !s.is_empty(),
        }
    }

    /// Convert this value to the given type.
    /// Text → checkbox: checked iff the trimmed string is non-empty.
    /// Checkbox → text: `true` becomes `"x"`, `false` becomes `""`,
    /// so `"x"` round-trips back to checked.
    pub fn convert(self, kind: FieldType) -> Value {
        match (self, kind) {
            (v @ Value::Text(_), FieldType::Text) => v,
            (v @ Value::Checkbox(_), FieldType::Checkbox) => v,
            (Value::Text(s), FieldType::Checkbox) => Value::Checkbox(!s.trim().is_empty()),
            (Value::Checkbox(b), FieldType::Text) => {
                Value::Text(if b { "x".to_string() } else { String::new() })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        assert_eq!(FieldType::Text.default_value(), Value::text(""));
        assert_eq!(FieldType::Checkbox.default_value(), Value::Checkbox(false));
    }

    #[test]
    fn test_value_serde_untagged() {
        let v: Value = serde_json::from_str("true").unwrap();
        assert_eq!(v, Value::Checkbox(true));
        let v: Value = serde_json::from_str("\"Dune\"").unwrap();
        assert_eq!(v, Value::text("Dune"));
        assert_eq!(serde_json::to_string(&Value::Checkbox(false)).unwrap(), "false");
    }

    #[test]
    fn test_field_serializes_type_key() {
        let f = Field::new("title", FieldType::Text);
        let json = serde_json::to_string(&f).unwrap();
        assert_eq!(json, r#"{"name":"title","type":"text"}"#);
    }

    #[test]
    fn test_convert_text_to_checkbox() {
        assert_eq!(
            Value::text("Dune").convert(FieldType::Checkbox),
            Value::Checkbox(true)
        );
        assert_eq!(
            Value::text("   ").convert(FieldType::Checkbox),
            Value::Checkbox(false)
        );
        assert_eq!(
            Value::text("").convert(FieldType::Checkbox),
            Value::Checkbox(false)
        );
    }

    #[test]
    fn test_convert_checkbox_to_text_round_trips() {
        let text = Value::Checkbox(true).convert(FieldType::Text);
        assert_eq!(text, Value::text("x"));
        assert_eq!(text.convert(FieldType::Checkbox), Value::Checkbox(true));
        assert_eq!(
            Value::Checkbox(false).convert(FieldType::Text),
            Value::text("")
        );
    }

    #[test]
    fn test_convert_same_type_is_identity() {
        assert_eq!(Value::text("Dune").convert(FieldType::Text), Value::text("Dune"));
        assert_eq!(
            Value::Checkbox(true).convert(FieldType::Checkbox),
            Value::Checkbox(true)
        );
    }

    #[test]
    fn test_truthiness() {
        assert!(Value::Checkbox(true).is_truthy());
        assert!(!Value::Checkbox(false).is_truthy());
        assert!(Value::text("x").is_truthy());
        assert!(!Value::text("").is_truthy());
    }
}

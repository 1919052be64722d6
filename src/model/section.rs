use serde::{Deserialize, Serialize};

use crate::model::entry::Entry;
use crate::model::field::Field;

/// A named collection of entries sharing one field schema.
/// Owns its fields and entries exclusively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

/// Normalize a section name into its stored document id: lowercased,
/// every non-alphanumeric scalar replaced by `-`. Distinct section
/// names must not share a document id (enforced on add/rename).
pub fn doc_id(name: &str) -> String {
    name.chars()
        .flat_map(|c| c.to_lowercase())
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect()
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Section {
            name: name.into(),
            fields: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// Next entry id: one more than the current max, 1 when empty.
    /// Deliberately not a persistent counter; deleting the highest entry
    /// frees its id for reuse.
    pub fn next_id(&self) -> u64 {
        self.entries.iter().map(|e| e.id).max().map_or(1, |m| m + 1)
    }

    pub fn entry(&self, id: u64) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn entry_mut(&mut self, id: u64) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Every entry's value keys match the field list exactly.
    /// Checked by debug assertions after schema mutations.
    pub fn is_consistent(&self) -> bool {
        self.entries.iter().all(|e| e.conforms_to(&self.fields))
    }
}

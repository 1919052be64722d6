use std::collections::HashMap;

use crate::model::entry::Entry;
use crate::model::field::Value;
use crate::model::section::Section;

/// Tri-state filter for checkbox fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckFilter {
    #[default]
    All,
    /// Only entries where the value is strictly checked
    On,
    /// Only entries where the value is falsy (unchecked or empty text)
    Off,
}

impl CheckFilter {
    pub fn parse_filter(s: &str) -> Option<CheckFilter> {
        match s {
            "all" => Some(CheckFilter::All),
            "on" | "yes" => Some(CheckFilter::On),
            "off" | "no" => Some(CheckFilter::Off),
            _ => None,
        }
    }
}

/// Active filters: field name → case-insensitive substring for text
/// fields, field name → tri-state for checkbox fields.
#[derive(Debug, Clone, Default)]
pub struct Filters {
    pub text: HashMap<String, String>,
    pub check: HashMap<String, CheckFilter>,
}

impl Filters {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.check.is_empty()
    }
}

/// Derive the displayed subsequence of a section's entries. Pure: the
/// projection is recomputed on every read and never mutates.
pub fn project<'a>(section: &'a Section, filters: &Filters) -> Vec<&'a Entry> {
    section
        .entries
        .iter()
        .filter(|entry| matches(entry, filters))
        .collect()
}

fn matches(entry: &Entry, filters: &Filters) -> bool {
    for (field, needle) in &filters.text {
        if needle.is_empty() {
            continue;
        }
        let haystack = match entry.value(field) {
            Some(Value::Text(s)) => s.as_str(),
            // checkbox value or missing key: nothing to substring-match
            _ => "",
        };
        if !haystack.to_lowercase().contains(&needle.to_lowercase()) {
            return false;
        }
    }
    for (field, filter) in &filters.check {
        let value = entry.value(field);
        let pass = match filter {
            CheckFilter::All => true,
            CheckFilter::On => value == Some(&Value::Checkbox(true)),
            CheckFilter::Off => value.is_none_or(|v| !v.is_truthy()),
        };
        if !pass {
            return false;
        }
    }
    true
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

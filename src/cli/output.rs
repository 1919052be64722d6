use serde::Serialize;

use crate::model::catalog::Catalog;
use crate::model::config::UiConfig;
use crate::model::entry::Entry;
use crate::model::field::{Field, FieldType, Value};
use crate::model::section::Section;
use crate::ops::schema_ops::Direction;
use crate::util::unicode::{display_width, pad_to_width, truncate_to_width};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct SectionInfoJson<'a> {
    pub index: usize,
    pub name: &'a str,
    pub active: bool,
    pub fields: usize,
    pub entries: usize,
}

#[derive(Serialize)]
pub struct FieldJson<'a> {
    pub index: usize,
    pub name: &'a str,
    #[serde(rename = "type")]
    pub kind: FieldType,
}

#[derive(Serialize)]
pub struct ListJson<'a> {
    pub section: &'a str,
    pub entries: Vec<&'a Entry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<&'a Entry>,
}

pub fn sections_to_json(catalog: &Catalog) -> Vec<SectionInfoJson<'_>> {
    catalog
        .sections
        .iter()
        .enumerate()
        .map(|(index, s)| SectionInfoJson {
            index,
            name: &s.name,
            active: index == catalog.active_index(),
            fields: s.fields.len(),
            entries: s.entries.len(),
        })
        .collect()
}

pub fn fields_to_json(section: &Section) -> Vec<FieldJson<'_>> {
    section
        .fields
        .iter()
        .enumerate()
        .map(|(index, f)| FieldJson {
            index,
            name: &f.name,
            kind: f.kind,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Format the sections listing, active section starred
pub fn format_sections(catalog: &Catalog) -> Vec<String> {
    catalog
        .sections
        .iter()
        .enumerate()
        .map(|(index, s)| {
            let marker = if index == catalog.active_index() { "*" } else { " " };
            format!(
                "{} {}. {} ({} fields, {} entries)",
                marker,
                index,
                s.name,
                s.fields.len(),
                s.entries.len()
            )
        })
        .collect()
}

/// Format the field listing of a section
pub fn format_fields(section: &Section) -> Vec<String> {
    section
        .fields
        .iter()
        .enumerate()
        .map(|(index, f)| format!("{}. {} ({})", index, f.name, f.kind))
        .collect()
}

/// One rendered cell. Checkboxes render as `[x]` / `[ ]` with the
/// configured mark; a missing value renders empty.
fn value_cell(value: Option<&Value>, ui: &UiConfig) -> String {
    match value {
        Some(Value::Text(s)) => s.clone(),
        Some(Value::Checkbox(true)) => format!("[{}]", ui.checked_mark),
        Some(Value::Checkbox(false)) => "[ ]".to_string(),
        None => String::new(),
    }
}

/// Format entries as a table: an id column, one column per field in
/// schema order, each sized to its widest cell (capped by config).
/// The draft, if shown, is the last row with a `+` id.
pub fn format_table(
    fields: &[Field],
    entries: &[&Entry],
    draft: Option<&Entry>,
    ui: &UiConfig,
) -> Vec<String> {
    let mut rows: Vec<(String, &Entry)> = entries
        .iter()
        .map(|e| (e.id.to_string(), *e))
        .collect();
    if let Some(d) = draft {
        rows.push((format!("+{}", d.id), d));
    }

    let mut headers = vec!["id".to_string()];
    headers.extend(fields.iter().map(|f| f.name.clone()));

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|(id, entry)| {
            let mut row = vec![id.clone()];
            row.extend(
                fields
                    .iter()
                    .map(|f| truncate_to_width(&value_cell(entry.value(&f.name), ui), ui.max_column_width)),
            );
            row
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            let cap = ui.max_column_width.max(2);
            let widest = cells
                .iter()
                .map(|row| display_width(&row[col]))
                .max()
                .unwrap_or(0);
            widest.max(display_width(header)).min(cap)
        })
        .collect();

    let mut lines = Vec::new();
    lines.push(render_row(&headers, &widths));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in &cells {
        lines.push(render_row(row, &widths));
    }
    lines
}

fn render_row(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| pad_to_width(cell, *w))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Format one entry as a card
pub fn format_card(fields: &[Field], entry: &Entry, is_draft: bool, ui: &UiConfig) -> Vec<String> {
    let mut lines = Vec::new();
    let suffix = if is_draft { " (draft)" } else { "" };
    lines.push(format!("#{}{}", entry.id, suffix));
    for field in fields {
        lines.push(format!(
            "  {}: {}",
            field.name,
            value_cell(entry.value(&field.name), ui)
        ));
    }
    lines
}

/// Format entries as cards separated by blank lines
pub fn format_cards(
    fields: &[Field],
    entries: &[&Entry],
    draft: Option<&Entry>,
    ui: &UiConfig,
) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.extend(format_card(fields, entry, false, ui));
    }
    if let Some(d) = draft {
        if !entries.is_empty() {
            lines.push(String::new());
        }
        lines.extend(format_card(fields, d, true, ui));
    }
    lines
}

// ---------------------------------------------------------------------------
// CLI argument parsing helpers
// ---------------------------------------------------------------------------

/// Parse a move direction. Fields move left/right (column order),
/// sections move up/down (sidebar order); both map to prev/next.
pub fn parse_direction(s: &str) -> Result<Direction, String> {
    match s {
        "left" | "up" | "prev" => Ok(Direction::Prev),
        "right" | "down" | "next" => Ok(Direction::Next),
        _ => Err(format!(
            "unknown direction '{}' (expected: left, right, up, down)",
            s
        )),
    }
}

/// Parse a raw CLI value against the field's declared type
pub fn parse_value(kind: FieldType, raw: &str) -> Result<Value, String> {
    match kind {
        FieldType::Text => Ok(Value::text(raw)),
        FieldType::Checkbox => match raw {
            "on" | "true" | "yes" | "x" | "1" => Ok(Value::Checkbox(true)),
            "off" | "false" | "no" | "0" | "" => Ok(Value::Checkbox(false)),
            _ => Err(format!(
                "'{}' is not a checkbox value (expected: on, off)",
                raw
            )),
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

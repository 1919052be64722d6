use crate::model::catalog::Catalog;
use crate::model::entry::Entry;
use crate::model::field::{Field, FieldType};
use crate::model::section::Section;

/// Entries serialize as one flat JSON object, so the entry id shares the
/// namespace with field names.
pub const RESERVED_FIELD: &str = "id";

/// Error type for field-schema operations. An `Err` guarantees that no
/// mutation took place.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("no section to edit")]
    NoSection,
    #[error("field name cannot be empty")]
    EmptyName,
    #[error("field name '{RESERVED_FIELD}' is reserved")]
    ReservedName,
    #[error("field already exists: {0}")]
    DuplicateField(String),
    #[error("no field at index {0}")]
    OutOfRange(usize),
}

/// Which neighbor a move swaps with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

// ---------------------------------------------------------------------------
// Field operations
//
// Each op validates against the active section first, then applies the
// field change and the matching entry migration; the migration is
// infallible, so a caller never observes a partially applied schema.
// The pending draft is migrated exactly like committed entries.
// ---------------------------------------------------------------------------

/// Append a field and back-fill every entry with the type default.
pub fn add_field(catalog: &mut Catalog, name: &str, kind: FieldType) -> Result<(), SchemaError> {
    let section = catalog.active_section_mut().ok_or(SchemaError::NoSection)?;
    validate_name(section, name, None)?;

    section.fields.push(Field::new(name, kind));
    for entry in &mut section.entries {
        entry.values.insert(name.to_string(), kind.default_value());
    }
    migrate_draft(catalog, |e| {
        e.values.insert(name.to_string(), kind.default_value());
    });
    debug_assert_consistent(catalog);
    Ok(())
}

/// Rename the field at `index`, moving each entry's value from the old
/// key to the new one. The old key is removed, never duplicated.
pub fn rename_field(catalog: &mut Catalog, index: usize, new_name: &str) -> Result<(), SchemaError> {
    let section = catalog.active_section_mut().ok_or(SchemaError::NoSection)?;
    if index >= section.fields.len() {
        return Err(SchemaError::OutOfRange(index));
    }
    validate_name(section, new_name, Some(index))?;

    let old_name = std::mem::replace(&mut section.fields[index].name, new_name.to_string());
    if old_name == new_name {
        return Ok(());
    }
    for entry in &mut section.entries {
        if let Some(value) = entry.values.shift_remove(&old_name) {
            entry.values.insert(new_name.to_string(), value);
        }
    }
    migrate_draft(catalog, |e| {
        if let Some(value) = e.values.shift_remove(&old_name) {
            e.values.insert(new_name.to_string(), value);
        }
    });
    debug_assert_consistent(catalog);
    Ok(())
}

/// Change the declared type of the field at `index` and convert every
/// stored value to match (see `Value::convert` for the mapping).
pub fn retype_field(catalog: &mut Catalog, index: usize, kind: FieldType) -> Result<(), SchemaError> {
    let section = catalog.active_section_mut().ok_or(SchemaError::NoSection)?;
    let field = section
        .fields
        .get_mut(index)
        .ok_or(SchemaError::OutOfRange(index))?;
    if field.kind == kind {
        return Ok(());
    }
    field.kind = kind;
    let name = section.fields[index].name.clone();
    for entry in &mut section.entries {
        convert_value(entry, &name, kind);
    }
    migrate_draft(catalog, |e| convert_value(e, &name, kind));
    debug_assert_consistent(catalog);
    Ok(())
}

/// Swap the field at `index` with its neighbor. A move at the boundary
/// is a no-op, not an error. Values are name-keyed, so entries are
/// untouched; only display and navigation order change.
pub fn move_field(catalog: &mut Catalog, index: usize, direction: Direction) -> Result<(), SchemaError> {
    let section = catalog.active_section_mut().ok_or(SchemaError::NoSection)?;
    if index >= section.fields.len() {
        return Err(SchemaError::OutOfRange(index));
    }
    if let Some(other) = neighbor(index, direction, section.fields.len()) {
        section.fields.swap(index, other);
    }
    Ok(())
}

/// Remove the field at `index` and strip its key from every entry.
pub fn delete_field(catalog: &mut Catalog, index: usize) -> Result<(), SchemaError> {
    let section = catalog.active_section_mut().ok_or(SchemaError::NoSection)?;
    if index >= section.fields.len() {
        return Err(SchemaError::OutOfRange(index));
    }
    let field = section.fields.remove(index);
    for entry in &mut section.entries {
        entry.values.shift_remove(&field.name);
    }
    migrate_draft(catalog, |e| {
        e.values.shift_remove(&field.name);
    });
    debug_assert_consistent(catalog);
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Shared name validation for add/rename. `keep` is the index whose
/// current name may collide (the field being renamed).
fn validate_name(section: &Section, name: &str, keep: Option<usize>) -> Result<(), SchemaError> {
    if name.trim().is_empty() {
        return Err(SchemaError::EmptyName);
    }
    if name == RESERVED_FIELD {
        return Err(SchemaError::ReservedName);
    }
    let collision = section
        .fields
        .iter()
        .position(|f| f.name == name)
        .filter(|&i| keep != Some(i));
    if collision.is_some() {
        return Err(SchemaError::DuplicateField(name.to_string()));
    }
    Ok(())
}

fn neighbor(index: usize, direction: Direction, len: usize) -> Option<usize> {
    match direction {
        Direction::Prev => index.checked_sub(1),
        Direction::Next => {
            let next = index + 1;
            (next < len).then_some(next)
        }
    }
}

fn convert_value(entry: &mut Entry, name: &str, kind: FieldType) {
    if let Some(value) = entry.values.get_mut(name) {
        *value = value.clone().convert(kind);
    }
}

fn migrate_draft(catalog: &mut Catalog, apply: impl Fn(&mut Entry)) {
    if let Some(draft) = catalog.draft.as_mut() {
        apply(&mut draft.entry);
    }
}

fn debug_assert_consistent(catalog: &Catalog) {
    if let Some(section) = catalog.active_section() {
        debug_assert!(section.is_consistent(), "entry values out of sync with fields");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

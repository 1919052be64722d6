use crate::model::catalog::Catalog;
use crate::model::field::{FieldType, Value};

/// Error type for committed-entry operations. An `Err` guarantees that
/// no mutation took place.
#[derive(Debug, thiserror::Error)]
pub enum EntryError {
    #[error("no section to edit")]
    NoSection,
    #[error("no entry with id {0}")]
    EntryNotFound(u64),
    #[error("no such field: {0}")]
    UnknownField(String),
    #[error("field '{field}' holds {expected} values")]
    TypeMismatch { field: String, expected: FieldType },
}

/// Replace one value of one committed entry. The field must still
/// exist; an update can race a field deletion.
pub fn update_value(
    catalog: &mut Catalog,
    id: u64,
    field: &str,
    value: Value,
) -> Result<(), EntryError> {
    let section = catalog.active_section_mut().ok_or(EntryError::NoSection)?;
    let declared = section
        .field(field)
        .ok_or_else(|| EntryError::UnknownField(field.to_string()))?
        .kind;
    if value.kind() != declared {
        return Err(EntryError::TypeMismatch {
            field: field.to_string(),
            expected: declared,
        });
    }
    let entry = section.entry_mut(id).ok_or(EntryError::EntryNotFound(id))?;
    entry.values.insert(field.to_string(), value);
    Ok(())
}

/// Remove the committed entry with the given id.
pub fn delete_entry(catalog: &mut Catalog, id: u64) -> Result<(), EntryError> {
    let section = catalog.active_section_mut().ok_or(EntryError::NoSection)?;
    let before = section.entries.len();
    section.entries.retain(|e| e.id != id);
    if section.entries.len() == before {
        return Err(EntryError::EntryNotFound(id));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use crate::model::catalog::{Catalog, Draft};
use crate::model::entry::Entry;
use crate::model::field::{FieldType, Value};

/// Error type for the draft lifecycle. An `Err` guarantees that no
/// mutation took place.
#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("no section to add an entry to")]
    NoSection,
    #[error("no draft in progress (run `stash new` first)")]
    NoDraft,
    #[error("no such field: {0}")]
    UnknownField(String),
    #[error("field '{field}' holds {expected} values")]
    TypeMismatch { field: String, expected: FieldType },
}

// The lifecycle is Empty → Active → Empty: `start` opens a draft,
// `commit` or `discard` closes it. At most one draft exists at a time.

/// Open a draft for the active section, every field at its type default,
/// with a provisional id. Idempotent while a draft is active: returns
/// the existing draft's id instead of replacing it.
pub fn start(catalog: &mut Catalog) -> Result<u64, DraftError> {
    if let Some(draft) = &catalog.draft {
        return Ok(draft.entry.id);
    }
    let section = catalog.active_section().ok_or(DraftError::NoSection)?;
    let entry = Entry::blank(section.next_id(), &section.fields);
    let id = entry.id;
    catalog.draft = Some(Draft { entry });
    Ok(id)
}

/// Set one field of the draft. Committed entries are never touched.
pub fn edit_field(catalog: &mut Catalog, field: &str, value: Value) -> Result<(), DraftError> {
    let section = catalog.active_section().ok_or(DraftError::NoSection)?;
    let declared = section
        .field(field)
        .ok_or_else(|| DraftError::UnknownField(field.to_string()))?
        .kind;
    if value.kind() != declared {
        return Err(DraftError::TypeMismatch {
            field: field.to_string(),
            expected: declared,
        });
    }
    let draft = catalog.draft.as_mut().ok_or(DraftError::NoDraft)?;
    draft.entry.values.insert(field.to_string(), value);
    Ok(())
}

/// Append the draft to the active section as a committed entry.
/// Returns the committed entry's id.
pub fn commit(catalog: &mut Catalog) -> Result<u64, DraftError> {
    let draft = catalog.draft.take().ok_or(DraftError::NoDraft)?;
    let section = match catalog.active_section_mut() {
        Some(s) => s,
        None => {
            catalog.draft = Some(draft);
            return Err(DraftError::NoSection);
        }
    };
    let mut entry = draft.entry;
    // The draft can outlive one CLI invocation; if another writer took
    // the provisional id in the meantime, allocate a fresh one.
    if section.entry(entry.id).is_some() {
        entry.id = section.next_id();
    }
    let id = entry.id;
    section.entries.push(entry);
    debug_assert!(section.is_consistent(), "draft out of sync with fields");
    Ok(id)
}

/// Drop the draft without creating an entry.
/// Returns whether there was a draft to drop.
pub fn discard(catalog: &mut Catalog) -> bool {
    catalog.draft.take().is_some()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

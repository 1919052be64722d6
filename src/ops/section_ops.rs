use crate::model::catalog::Catalog;
use crate::model::section::{doc_id, Section};
use crate::ops::schema_ops::Direction;

/// Error type for section-list operations. An `Err` guarantees that no
/// mutation took place.
#[derive(Debug, thiserror::Error)]
pub enum SectionError {
    #[error("section name cannot be empty")]
    EmptyName,
    #[error("section already exists: {0}")]
    DuplicateSection(String),
    #[error("section name '{0}' collides with '{1}' in storage")]
    StorageCollision(String, String),
    #[error("no section at index {0}")]
    OutOfRange(usize),
}

/// Create an empty section and make it active.
/// Returns the new section's index.
pub fn add_section(catalog: &mut Catalog, name: &str) -> Result<usize, SectionError> {
    validate_name(catalog, name, None)?;
    catalog.sections.push(Section::new(name));
    let index = catalog.sections.len() - 1;
    catalog.select(index);
    Ok(index)
}

/// Remove the section at `index`. The active pointer keeps its position
/// and is clamped to the new end of the list; the draft survives only
/// while the section it was scoped to stays active.
pub fn delete_section(catalog: &mut Catalog, index: usize) -> Result<(), SectionError> {
    if index >= catalog.sections.len() {
        return Err(SectionError::OutOfRange(index));
    }
    let active = catalog.active_index();
    let owner = catalog.active_section().map(|s| s.name.clone());
    catalog.sections.remove(index);
    let last = catalog.sections.len().saturating_sub(1);
    catalog.set_active_raw(active.min(last));
    // draft retention is decided by section identity, not position:
    // the clamp can land the pointer back on the same section
    if catalog.active_section().map(|s| &s.name) != owner.as_ref() {
        catalog.draft = None;
    }
    Ok(())
}

/// Rename the section at `index`. The draft, if any, stays: the section
/// keeps its identity.
pub fn rename_section(catalog: &mut Catalog, index: usize, new_name: &str) -> Result<(), SectionError> {
    if index >= catalog.sections.len() {
        return Err(SectionError::OutOfRange(index));
    }
    validate_name(catalog, new_name, Some(index))?;
    catalog.sections[index].name = new_name.to_string();
    Ok(())
}

/// Swap the section at `index` with its neighbor; no-op at the boundary.
/// The active pointer follows the active *section*, not the position.
pub fn move_section(catalog: &mut Catalog, index: usize, direction: Direction) -> Result<(), SectionError> {
    if index >= catalog.sections.len() {
        return Err(SectionError::OutOfRange(index));
    }
    let other = match direction {
        Direction::Prev => match index.checked_sub(1) {
            Some(i) => i,
            None => return Ok(()),
        },
        Direction::Next => {
            if index + 1 >= catalog.sections.len() {
                return Ok(());
            }
            index + 1
        }
    };
    catalog.sections.swap(index, other);
    let active = catalog.active_index();
    if active == index {
        catalog.set_active_raw(other);
    } else if active == other {
        catalog.set_active_raw(index);
    }
    Ok(())
}

/// Shared name validation for add/rename. Sections persist as one
/// document per normalized `doc_id`, so two live sections must never
/// normalize to the same id or the later save silently overwrites the
/// earlier one.
fn validate_name(catalog: &Catalog, name: &str, keep: Option<usize>) -> Result<(), SectionError> {
    if name.trim().is_empty() {
        return Err(SectionError::EmptyName);
    }
    let id = doc_id(name);
    for (i, other) in catalog.sections.iter().enumerate() {
        if keep == Some(i) {
            continue;
        }
        if other.name == name {
            return Err(SectionError::DuplicateSection(name.to_string()));
        }
        if doc_id(&other.name) == id {
            return Err(SectionError::StorageCollision(
                name.to_string(),
                other.name.clone(),
            ));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::catalog::Draft;
    use crate::model::entry::Entry;

    fn catalog(names: &[&str]) -> Catalog {
        Catalog::new(names.iter().map(|n| Section::new(*n)).collect())
    }

    fn names(c: &Catalog) -> Vec<&str> {
        c.sections.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_add_section_switches_active() {
        let mut c = catalog(&["Books"]);
        let index = add_section(&mut c, "CDs").unwrap();
        assert_eq!(index, 1);
        assert_eq!(c.active_section().unwrap().name, "CDs");
    }

    #[test]
    fn test_add_section_rejects_empty_and_duplicate() {
        let mut c = catalog(&["Books"]);
        assert!(matches!(add_section(&mut c, "  "), Err(SectionError::EmptyName)));
        assert!(matches!(
            add_section(&mut c, "Books"),
            Err(SectionError::DuplicateSection(_))
        ));
        assert_eq!(c.sections.len(), 1);
    }

    #[test]
    fn test_add_section_rejects_storage_collision() {
        // "books" and "Board Games!" normalize onto existing doc ids
        let mut c = catalog(&["Books", "Board Games?"]);
        assert!(matches!(
            add_section(&mut c, "books"),
            Err(SectionError::StorageCollision(..))
        ));
        assert!(matches!(
            add_section(&mut c, "Board Games!"),
            Err(SectionError::StorageCollision(..))
        ));
        assert_eq!(c.sections.len(), 2);
        // a genuinely distinct id is fine
        add_section(&mut c, "Books 2").unwrap();
    }

    #[test]
    fn test_delete_active_head_repoints_to_next() {
        // the pointer stays at 0, which is now the former second section
        let mut c = catalog(&["Books", "CDs"]);
        delete_section(&mut c, 0).unwrap();
        assert_eq!(c.active_index(), 0);
        assert_eq!(c.active_section().unwrap().name, "CDs");
    }

    #[test]
    fn test_delete_last_clamps_pointer() {
        let mut c = catalog(&["Books", "CDs"]);
        c.select(1);
        delete_section(&mut c, 1).unwrap();
        assert_eq!(c.active_index(), 0);
        assert_eq!(c.active_section().unwrap().name, "Books");
    }

    #[test]
    fn test_delete_after_active_keeps_pointer() {
        let mut c = catalog(&["Books", "CDs", "Games"]);
        c.select(1);
        delete_section(&mut c, 2).unwrap();
        assert_eq!(c.active_section().unwrap().name, "CDs");
    }

    #[test]
    fn test_delete_out_of_range() {
        let mut c = catalog(&["Books"]);
        assert!(matches!(delete_section(&mut c, 1), Err(SectionError::OutOfRange(1))));
    }

    #[test]
    fn test_delete_everything_leaves_empty_catalog() {
        let mut c = catalog(&["Books"]);
        delete_section(&mut c, 0).unwrap();
        assert!(c.is_empty());
        assert!(c.active_section().is_none());
    }

    #[test]
    fn test_delete_abandons_draft_when_active_section_changes() {
        let mut c = catalog(&["Books", "CDs"]);
        c.draft = Some(Draft {
            entry: Entry::blank(1, &[]),
        });
        delete_section(&mut c, 0).unwrap();
        assert!(c.draft.is_none());
    }

    #[test]
    fn test_delete_elsewhere_keeps_draft() {
        let mut c = catalog(&["Books", "CDs"]);
        c.draft = Some(Draft {
            entry: Entry::blank(1, &[]),
        });
        delete_section(&mut c, 1).unwrap();
        assert!(c.draft.is_some());
    }

    #[test]
    fn test_delete_before_active_keeps_draft() {
        // the clamp lands the pointer back on the draft's own section,
        // so the draft must survive
        let mut c = catalog(&["Books", "CDs"]);
        c.select(1);
        c.draft = Some(Draft {
            entry: Entry::blank(1, &[]),
        });
        delete_section(&mut c, 0).unwrap();
        assert_eq!(c.active_section().unwrap().name, "CDs");
        assert!(c.draft.is_some());
    }

    #[test]
    fn test_delete_shifting_active_identity_abandons_draft() {
        // pointer value survives the clamp but now names a different
        // section, so the draft goes
        let mut c = catalog(&["Books", "CDs", "Games"]);
        c.select(1);
        c.draft = Some(Draft {
            entry: Entry::blank(1, &[]),
        });
        delete_section(&mut c, 0).unwrap();
        assert_eq!(c.active_section().unwrap().name, "Games");
        assert!(c.draft.is_none());
    }

    #[test]
    fn test_rename_section() {
        let mut c = catalog(&["Books", "CDs"]);
        rename_section(&mut c, 0, "Libros").unwrap();
        assert_eq!(names(&c), vec!["Libros", "CDs"]);
        assert!(matches!(
            rename_section(&mut c, 0, "CDs"),
            Err(SectionError::DuplicateSection(_))
        ));
        assert!(matches!(
            rename_section(&mut c, 0, "cds"),
            Err(SectionError::StorageCollision(..))
        ));
        // renaming to its own name is fine
        rename_section(&mut c, 0, "Libros").unwrap();
    }

    #[test]
    fn test_move_section_active_follows() {
        let mut c = catalog(&["Books", "CDs", "Games"]);
        c.select(1);
        move_section(&mut c, 1, Direction::Prev).unwrap();
        assert_eq!(names(&c), vec!["CDs", "Books", "Games"]);
        assert_eq!(c.active_section().unwrap().name, "CDs");

        // moving the non-active neighbor over the active one also re-points
        move_section(&mut c, 1, Direction::Prev).unwrap();
        assert_eq!(names(&c), vec!["Books", "CDs", "Games"]);
        assert_eq!(c.active_section().unwrap().name, "CDs");
    }

    #[test]
    fn test_move_section_boundary_noop() {
        let mut c = catalog(&["Books", "CDs"]);
        move_section(&mut c, 0, Direction::Prev).unwrap();
        move_section(&mut c, 1, Direction::Next).unwrap();
        assert_eq!(names(&c), vec!["Books", "CDs"]);
    }
}

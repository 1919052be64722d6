use crate::model::entry::Entry;
use crate::model::section::Section;

/// A not-yet-committed entry being composed for the active section.
/// At most one exists per session; switching sections abandons it.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub entry: Entry,
}

/// The whole in-memory state: section list, active-section pointer, and
/// the draft slot.
///
/// Pointer invariant: `0 <= active < sections.len()` whenever the list
/// is non-empty.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub sections: Vec<Section>,
    active: usize,
    pub draft: Option<Draft>,
}

impl Catalog {
    pub fn new(sections: Vec<Section>) -> Self {
        Catalog {
            sections,
            active: 0,
            draft: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_section(&self) -> Option<&Section> {
        self.sections.get(self.active)
    }

    pub fn active_section_mut(&mut self) -> Option<&mut Section> {
        self.sections.get_mut(self.active)
    }

    pub fn section_index(&self, name: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.name == name)
    }

    /// Switch the active section. Moving to a different section abandons
    /// any pending draft (reset-on-navigation). Returns false (and leaves
    /// everything untouched) if the index is out of range.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.sections.len() {
            return false;
        }
        if index != self.active {
            self.draft = None;
        }
        self.active = index;
        true
    }

    /// Re-point the active index without touching the draft. Used by the
    /// section ops when the active *section* moves or the list shrinks;
    /// callers are responsible for keeping the index in range.
    pub(crate) fn set_active_raw(&mut self, index: usize) {
        self.active = index;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::new(vec![Section::new("Books"), Section::new("CDs")])
    }

    #[test]
    fn test_select_valid() {
        let mut c = catalog();
        assert!(c.select(1));
        assert_eq!(c.active_section().unwrap().name, "CDs");
    }

    #[test]
    fn test_select_out_of_range_is_rejected() {
        let mut c = catalog();
        assert!(!c.select(2));
        assert_eq!(c.active_index(), 0);
    }

    #[test]
    fn test_select_other_section_abandons_draft() {
        let mut c = catalog();
        c.draft = Some(Draft {
            entry: Entry::blank(1, &[]),
        });
        c.select(1);
        assert!(c.draft.is_none());
    }

    #[test]
    fn test_reselect_same_section_keeps_draft() {
        let mut c = catalog();
        c.draft = Some(Draft {
            entry: Entry::blank(1, &[]),
        });
        c.select(0);
        assert!(c.draft.is_some());
    }
}

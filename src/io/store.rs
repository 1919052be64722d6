use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::model::section::{doc_id, Section};

/// Error type for the section document store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("io error: {0}")]
    IoError(#[from] io::Error),
}

/// One persisted section. `position` preserves the user's section order
/// across loads; `updated_at` is informational.
#[derive(Debug, Serialize, Deserialize)]
struct SectionDoc {
    position: usize,
    updated_at: DateTime<Utc>,
    #[serde(flatten)]
    section: Section,
}

/// The persistence collaborator: one JSON document per section under
/// `<stash-dir>/sections/`, upserted by a normalized document id.
/// Writes are atomic (temp file + rename); a failed write never rolls
/// back the in-memory state that triggered it.
pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn open(stash_dir: &Path) -> Store {
        Store {
            dir: stash_dir.join("sections"),
        }
    }

    /// Read every persisted section, in stored order.
    /// A missing sections directory means nothing was persisted yet.
    pub fn load(&self) -> Result<Vec<Section>, StoreError> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut docs = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(|e| StoreError::ReadError {
            path: self.dir.clone(),
            source: e,
        })? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let content = fs::read_to_string(&path).map_err(|e| StoreError::ReadError {
                path: path.clone(),
                source: e,
            })?;
            let doc: SectionDoc =
                serde_json::from_str(&content).map_err(|e| StoreError::ParseError {
                    path: path.clone(),
                    source: e,
                })?;
            docs.push(doc);
        }
        docs.sort_by(|a, b| {
            a.position
                .cmp(&b.position)
                .then_with(|| a.section.name.cmp(&b.section.name))
        });
        Ok(docs.into_iter().map(|d| d.section).collect())
    }

    /// Upsert one section document, keyed by `doc_id(section.name)`.
    pub fn save(&self, section: &Section, position: usize) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let doc = SectionDoc {
            position,
            updated_at: Utc::now(),
            section: section.clone(),
        };
        let content = serde_json::to_string_pretty(&doc).map_err(|e| StoreError::ParseError {
            path: self.doc_path(&section.name),
            source: e,
        })?;
        atomic_write(&self.doc_path(&section.name), content.as_bytes())?;
        Ok(())
    }

    /// Delete the document for the named section; no-op if absent.
    /// Needed after section deletion or rename so the stale document
    /// does not resurrect on the next load.
    pub fn remove(&self, name: &str) -> Result<(), StoreError> {
        let path = self.doc_path(name);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::ReadError { path, source: e }),
        }
    }

    fn doc_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", doc_id(name)))
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entry::Entry;
    use crate::model::field::{Field, FieldType, Value};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn books() -> Section {
        let mut section = Section::new("Books");
        section.fields = vec![
            Field::new("title", FieldType::Text),
            Field::new("digital", FieldType::Checkbox),
        ];
        let mut entry = Entry::blank(1, &section.fields);
        entry.values.insert("title".into(), Value::text("Dune"));
        section.entries.push(entry);
        section
    }

    #[test]
    fn test_save_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = Store::open(tmp.path());

        let books = books();
        let cds = Section::new("CDs");
        store.save(&books, 0).unwrap();
        store.save(&cds, 1).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, vec![books, cds]);
    }

    #[test]
    fn test_load_respects_positions() {
        let tmp = TempDir::new().unwrap();
        let store = Store::open(tmp.path());
        store.save(&Section::new("Zines"), 0).unwrap();
        store.save(&Section::new("Books"), 1).unwrap();

        let names: Vec<String> = store.load().unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Zines", "Books"]);

        // reorder by rewriting positions
        store.save(&Section::new("Zines"), 1).unwrap();
        store.save(&Section::new("Books"), 0).unwrap();
        let names: Vec<String> = store.load().unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Books", "Zines"]);
    }

    #[test]
    fn test_save_is_an_upsert() {
        let tmp = TempDir::new().unwrap();
        let store = Store::open(tmp.path());
        let mut section = books();
        store.save(&section, 0).unwrap();
        section.entries.push(Entry::blank(2, &section.fields));
        store.save(&section, 0).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].entries.len(), 2);
    }

    #[test]
    fn test_load_nothing_persisted() {
        let tmp = TempDir::new().unwrap();
        let store = Store::open(tmp.path());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_remove() {
        let tmp = TempDir::new().unwrap();
        let store = Store::open(tmp.path());
        store.save(&books(), 0).unwrap();
        store.remove("Books").unwrap();
        assert!(store.load().unwrap().is_empty());
        // removing again is a no-op
        store.remove("Books").unwrap();
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let store = Store::open(tmp.path());
        fs::create_dir_all(tmp.path().join("sections")).unwrap();
        fs::write(tmp.path().join("sections/bad.json"), "not json {{{").unwrap();
        assert!(matches!(store.load(), Err(StoreError::ParseError { .. })));
    }
}

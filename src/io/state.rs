use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::entry::Entry;

/// Persisted session state (written to .state.json). This is what makes
/// a sequence of CLI invocations behave like one application session:
/// the active section and the pending draft survive between commands.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SessionState {
    /// Name of the active section (resolved to an index on load)
    #[serde(default)]
    pub active_section: String,
    /// Per-session view override for `stash list` (None = config default)
    #[serde(default)]
    pub view_override: Option<String>,
    /// Pending draft entry, if one was started and not yet committed
    #[serde(default)]
    pub draft: Option<DraftState>,
}

/// A draft as persisted: the section it was started in plus the entry.
/// If the section no longer matches the active one on load, the draft
/// is abandoned (reset-on-navigation).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftState {
    pub section: String,
    pub entry: Entry,
}

/// Read .state.json from the stash directory
pub fn read_session(stash_dir: &Path) -> Option<SessionState> {
    let path = stash_dir.join(".state.json");
    let content = fs::read_to_string(&path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write .state.json to the stash directory
pub fn write_session(stash_dir: &Path, state: &SessionState) -> Result<(), std::io::Error> {
    let path = stash_dir.join(".state.json");
    let content = serde_json::to_string_pretty(state)?;
    fs::write(&path, content)
}

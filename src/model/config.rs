use serde::{Deserialize, Serialize};

/// Configuration from stash.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StashConfig {
    pub stash: StashInfo,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StashInfo {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Default view for `stash list`: "table" or "cards"
    #[serde(default = "default_view")]
    pub view: String,
    /// Glyph used for a checked checkbox in table and card output
    #[serde(default = "default_checked_mark")]
    pub checked_mark: String,
    /// Widest a text column may render before truncation (terminal cells)
    #[serde(default = "default_max_column_width")]
    pub max_column_width: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            view: default_view(),
            checked_mark: default_checked_mark(),
            max_column_width: default_max_column_width(),
        }
    }
}

fn default_view() -> String {
    "table".to_string()
}

fn default_checked_mark() -> String {
    "x".to_string()
}

fn default_max_column_width() -> usize {
    40
}

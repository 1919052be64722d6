use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::StashConfig;

/// Error type for config and stash-directory discovery
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("not a stash: no stash/ directory found (run `stash init`)")]
    NotAStash,
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse stash.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not serialize stash.toml: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Discover the stash directory by walking up from `start`, looking for
/// a `stash/` subdirectory holding a stash.toml.
pub fn discover_stash(start: &Path) -> Result<PathBuf, ConfigError> {
    let mut current = start.to_path_buf();
    loop {
        let stash_dir = current.join("stash");
        if stash_dir.is_dir() && stash_dir.join("stash.toml").exists() {
            return Ok(stash_dir);
        }
        if !current.pop() {
            return Err(ConfigError::NotAStash);
        }
    }
}

/// Read and parse stash.toml from the stash directory
pub fn read_config(stash_dir: &Path) -> Result<StashConfig, ConfigError> {
    let path = stash_dir.join("stash.toml");
    let text = fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    Ok(toml::from_str(&text)?)
}

/// Write stash.toml back to the stash directory
pub fn write_config(stash_dir: &Path, config: &StashConfig) -> Result<(), ConfigError> {
    let text = toml::to_string_pretty(config)?;
    fs::write(stash_dir.join("stash.toml"), text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::StashInfo;
    use tempfile::TempDir;

    fn create_test_stash(root: &Path) {
        let stash_dir = root.join("stash");
        fs::create_dir_all(&stash_dir).unwrap();
        fs::write(stash_dir.join("stash.toml"), "[stash]\nname = \"test\"\n").unwrap();
    }

    #[test]
    fn test_discover_stash() {
        let tmp = TempDir::new().unwrap();
        create_test_stash(tmp.path());

        let found = discover_stash(tmp.path()).unwrap();
        assert_eq!(found, tmp.path().join("stash"));

        // discover from a subdirectory
        let sub = tmp.path().join("a/b");
        fs::create_dir_all(&sub).unwrap();
        let found = discover_stash(&sub).unwrap();
        assert_eq!(found, tmp.path().join("stash"));
    }

    #[test]
    fn test_discover_stash_not_found() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            discover_stash(tmp.path()),
            Err(ConfigError::NotAStash)
        ));
    }

    #[test]
    fn test_config_round_trip() {
        let tmp = TempDir::new().unwrap();
        create_test_stash(tmp.path());
        let stash_dir = tmp.path().join("stash");

        let mut config = read_config(&stash_dir).unwrap();
        assert_eq!(config.stash.name, "test");

        config.stash = StashInfo {
            name: "renamed".into(),
        };
        config.ui.view = "cards".into();
        write_config(&stash_dir, &config).unwrap();

        let back = read_config(&stash_dir).unwrap();
        assert_eq!(back.stash.name, "renamed");
        assert_eq!(back.ui.view, "cards");
    }
}

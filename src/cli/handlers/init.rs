use std::env;
use std::fs;

use crate::cli::commands::InitArgs;
use crate::io::config_io;
use crate::io::state::{self, SessionState};
use crate::io::store::Store;
use crate::model::config::{StashConfig, StashInfo, UiConfig};
use crate::model::field::{Field, FieldType};
use crate::model::section::Section;

/// Create the stash/ directory (in the current directory, or under the
/// -C override): stash.toml, the sections store, and the initial
/// session state. Unless --bare, a starter "General" section is seeded
/// so `stash new` works right away.
pub fn cmd_init(args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let root = match super::stash_dir_override() {
        Some(dir) => dir,
        None => env::current_dir()?,
    };
    let stash_dir = root.join("stash");

    if stash_dir.join("stash.toml").exists() {
        if !args.force {
            return Err("stash/ already exists here (use --force to reinitialize)".into());
        }
        // reinit drops the old sections so the seed starts clean
        let sections_dir = stash_dir.join("sections");
        if sections_dir.is_dir() {
            fs::remove_dir_all(&sections_dir)?;
        }
    }
    fs::create_dir_all(stash_dir.join("sections"))?;

    let name = args.name.unwrap_or_else(|| {
        root.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "stash".to_string())
    });
    let config = StashConfig {
        stash: StashInfo { name },
        ui: UiConfig::default(),
    };
    config_io::write_config(&stash_dir, &config)?;

    let mut session = SessionState::default();
    if !args.bare {
        let mut general = Section::new("General");
        general.fields = vec![
            Field::new("title", FieldType::Text),
            Field::new("digital", FieldType::Checkbox),
            Field::new("physical", FieldType::Checkbox),
        ];
        Store::open(&stash_dir).save(&general, 0)?;
        session.active_section = general.name;
    }
    state::write_session(&stash_dir, &session)?;

    println!(
        "initialized stash '{}' in {}",
        config.stash.name,
        stash_dir.display()
    );
    Ok(())
}

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "stash", about = concat!("[#] stash v", env!("CARGO_PKG_VERSION"), " - track your collections from the terminal"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different directory (where stash/ lives)
    #[arg(short = 'C', long = "stash-dir", global = true)]
    pub stash_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new stash in the current directory
    Init(InitArgs),
    /// List all sections
    Sections,
    /// Section management
    Section(SectionCmd),
    /// Switch the active section
    Use(UseArgs),
    /// List the active section's fields
    Fields,
    /// Field (column) management for the active section
    Field(FieldCmd),
    /// List the active section's entries
    List(ListArgs),
    /// Start a new draft entry
    New,
    /// Set a field on the draft entry
    Set(SetArgs),
    /// Commit the draft entry
    Save,
    /// Discard the draft entry
    Cancel,
    /// Edit a field of a committed entry
    Edit(EditArgs),
    /// Delete a committed entry
    Rm(RmArgs),
    /// Show one entry as a card
    Show(ShowArgs),
}

// ---------------------------------------------------------------------------
// Init args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Stash name (default: inferred from directory name)
    #[arg(long)]
    pub name: Option<String>,
    /// Skip the starter "General" section
    #[arg(long)]
    pub bare: bool,
    /// Reinitialize even if stash/ already exists
    #[arg(long)]
    pub force: bool,
}

// ---------------------------------------------------------------------------
// Section args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct SectionCmd {
    #[command(subcommand)]
    pub action: SectionAction,
}

#[derive(Subcommand)]
pub enum SectionAction {
    /// Create a section and switch to it
    Add { name: String },
    /// Delete the section at the given position
    Rm { index: usize },
    /// Rename the section at the given position
    Rename { index: usize, new_name: String },
    /// Move the section up or down in the sidebar order
    Mv { index: usize, direction: String },
}

#[derive(Args)]
pub struct UseArgs {
    /// Section name to make active
    pub name: String,
}

// ---------------------------------------------------------------------------
// Field args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct FieldCmd {
    #[command(subcommand)]
    pub action: FieldAction,
}

#[derive(Subcommand)]
pub enum FieldAction {
    /// Add a field (default type: text)
    Add {
        name: String,
        /// Field type: text or checkbox
        #[arg(long, default_value = "text")]
        kind: String,
    },
    /// Delete the field at the given position
    Rm { index: usize },
    /// Rename the field at the given position (entry values migrate)
    Rename { index: usize, new_name: String },
    /// Change the field's type (entry values are converted)
    Retype { index: usize, kind: String },
    /// Move the field left or right in the column order
    Mv { index: usize, direction: String },
}

// ---------------------------------------------------------------------------
// Entry / view args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Substring filter on a text field: --filter title=dune (repeatable)
    #[arg(long = "filter")]
    pub filter: Vec<String>,
    /// Tri-state filter on a checkbox field: --check digital=on|off|all (repeatable)
    #[arg(long = "check")]
    pub check: Vec<String>,
    /// Render as cards (and remember for the session)
    #[arg(long, conflicts_with = "table")]
    pub cards: bool,
    /// Render as a table (and remember for the session)
    #[arg(long)]
    pub table: bool,
}

#[derive(Args)]
pub struct SetArgs {
    /// Field name on the draft
    pub field: String,
    /// New value ("on"/"off" etc. for checkbox fields)
    pub value: String,
}

#[derive(Args)]
pub struct EditArgs {
    /// Entry id
    pub id: u64,
    /// Field name
    pub field: String,
    /// New value ("on"/"off" etc. for checkbox fields)
    pub value: String,
}

#[derive(Args)]
pub struct RmArgs {
    /// Entry id
    pub id: u64,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Entry id
    pub id: u64,
}

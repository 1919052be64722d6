mod init;
pub use init::cmd_init;

use std::path::PathBuf;
use std::sync::Mutex;

use serde::Serialize;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::state::{self, DraftState, SessionState};
use crate::io::store::Store;
use crate::model::catalog::{Catalog, Draft};
use crate::model::config::StashConfig;
use crate::model::field::FieldType;
use crate::model::section::Section;
use crate::ops::filter::{CheckFilter, Filters};
use crate::ops::{draft_ops, entry_ops, filter, schema_ops, section_ops};

/// Global override for the stash location (set by -C flag)
static STASH_DIR_OVERRIDE: Mutex<Option<PathBuf>> = Mutex::new(None);

pub(crate) fn stash_dir_override() -> Option<PathBuf> {
    STASH_DIR_OVERRIDE.lock().unwrap().clone()
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CliResult {
    let json = cli.json;

    // Store -C override for load_session()
    if let Some(ref dir) = cli.stash_dir {
        let abs = std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?;
        STASH_DIR_OVERRIDE.lock().unwrap().replace(abs);
    }

    match cli.command {
        // Init never discovers an existing stash; it only consumes the
        // -C override stored above
        Commands::Init(args) => cmd_init(args),

        // Read commands
        Commands::Sections => cmd_sections(json),
        Commands::Fields => cmd_fields(json),
        Commands::List(args) => cmd_list(args, json),
        Commands::Show(args) => cmd_show(args, json),

        // Section management
        Commands::Section(cmd) => cmd_section(cmd.action),
        Commands::Use(args) => cmd_use(args),

        // Field management
        Commands::Field(cmd) => cmd_field(cmd.action),

        // Entries and the draft lifecycle
        Commands::New => cmd_new(),
        Commands::Set(args) => cmd_set(args),
        Commands::Save => cmd_save(),
        Commands::Cancel => cmd_cancel(),
        Commands::Edit(args) => cmd_edit(args),
        Commands::Rm(args) => cmd_rm(args),
    }
}

// ---------------------------------------------------------------------------
// Session plumbing
// ---------------------------------------------------------------------------

/// Everything one command invocation works against: the discovered stash
/// directory, its config, and the catalog rebuilt from the store plus
/// the previous invocation's session state.
struct Session {
    stash_dir: PathBuf,
    config: StashConfig,
    catalog: Catalog,
    view_override: Option<String>,
}

/// Load the catalog from the store. This always runs to completion
/// before any mutation, so a mutating command never races the load.
fn load_session() -> Result<Session, Box<dyn std::error::Error>> {
    let start = match stash_dir_override() {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let stash_dir = config_io::discover_stash(&start)?;
    let config = config_io::read_config(&stash_dir)?;
    let sections = Store::open(&stash_dir).load()?;
    let mut catalog = Catalog::new(sections);

    let mut view_override = None;
    if let Some(session) = state::read_session(&stash_dir) {
        if let Some(index) = catalog.section_index(&session.active_section) {
            catalog.select(index);
        }
        // A draft only survives if it still belongs to the active section
        if let Some(draft) = session.draft {
            let active = catalog.active_section().map(|s| s.name.as_str());
            if active == Some(draft.section.as_str()) {
                catalog.draft = Some(Draft { entry: draft.entry });
            }
        }
        view_override = session.view_override;
    }

    Ok(Session {
        stash_dir,
        config,
        catalog,
        view_override,
    })
}

fn active_section<'a>(session: &'a Session) -> Result<&'a Section, Box<dyn std::error::Error>> {
    session
        .catalog
        .active_section()
        .ok_or_else(|| "no sections yet (run `stash section add <name>`)".into())
}

// Persistence is fire-and-forget: the in-memory mutation already
// happened and is the source of truth, so a failed write warns and
// never turns into a command failure.

fn persist_section(session: &Session, index: usize) {
    let store = Store::open(&session.stash_dir);
    if let Some(section) = session.catalog.sections.get(index) {
        if let Err(e) = store.save(section, index) {
            eprintln!("warning: could not save section '{}': {}", section.name, e);
        }
    }
}

/// Rewrite every section document. Used after structural changes
/// (delete, reorder) that shift stored positions.
fn persist_all(session: &Session) {
    for index in 0..session.catalog.sections.len() {
        persist_section(session, index);
    }
}

fn persist_removal(session: &Session, name: &str) {
    if let Err(e) = Store::open(&session.stash_dir).remove(name) {
        eprintln!("warning: could not remove section '{}': {}", name, e);
    }
}

fn persist_state(session: &Session) {
    let catalog = &session.catalog;
    let active = catalog
        .active_section()
        .map(|s| s.name.clone())
        .unwrap_or_default();
    let snapshot = SessionState {
        active_section: active.clone(),
        view_override: session.view_override.clone(),
        draft: catalog.draft.as_ref().map(|d| DraftState {
            section: active.clone(),
            entry: d.entry.clone(),
        }),
    };
    if let Err(e) = state::write_session(&session.stash_dir, &snapshot) {
        eprintln!("warning: could not write session state: {}", e);
    }
}

fn print_json<T: Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_kind(s: &str) -> Result<FieldType, String> {
    FieldType::parse_type(s)
        .ok_or_else(|| format!("unknown field type '{}' (expected: text, checkbox)", s))
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_sections(json: bool) -> CliResult {
    let session = load_session()?;
    if json {
        return print_json(&sections_to_json(&session.catalog));
    }
    if session.catalog.is_empty() {
        println!("no sections yet (run `stash section add <name>`)");
        return Ok(());
    }
    for line in format_sections(&session.catalog) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_fields(json: bool) -> CliResult {
    let session = load_session()?;
    let section = active_section(&session)?;
    if json {
        return print_json(&fields_to_json(section));
    }
    println!("fields of '{}':", section.name);
    if section.fields.is_empty() {
        println!("  (no fields yet, run `stash field add <name>`)");
    }
    for line in format_fields(section) {
        println!("  {}", line);
    }
    Ok(())
}

fn cmd_list(args: ListArgs, json: bool) -> CliResult {
    let mut session = load_session()?;

    let mut filters = Filters::default();
    for spec in &args.filter {
        let (field, needle) = spec
            .split_once('=')
            .ok_or_else(|| format!("bad filter '{}' (expected field=substring)", spec))?;
        filters.text.insert(field.to_string(), needle.to_string());
    }
    for spec in &args.check {
        let (field, raw) = spec
            .split_once('=')
            .ok_or_else(|| format!("bad check '{}' (expected field=on|off|all)", spec))?;
        let check = CheckFilter::parse_filter(raw)
            .ok_or_else(|| format!("bad check value '{}' (expected: on, off, all)", raw))?;
        filters.check.insert(field.to_string(), check);
    }

    // --cards / --table stick for the rest of the session
    if args.cards {
        session.view_override = Some("cards".to_string());
        persist_state(&session);
    } else if args.table {
        session.view_override = Some("table".to_string());
        persist_state(&session);
    }
    let view = session
        .view_override
        .clone()
        .unwrap_or_else(|| session.config.ui.view.clone());

    let section = active_section(&session)?;
    let entries = filter::project(section, &filters);
    let draft = session.catalog.draft.as_ref().map(|d| &d.entry);

    if json {
        return print_json(&ListJson {
            section: &section.name,
            entries,
            draft,
        });
    }

    println!("== {} ==", section.name);
    if entries.is_empty() && draft.is_none() {
        let reason = if filters.is_empty() { "no entries" } else { "no matching entries" };
        println!("{}", reason);
        return Ok(());
    }
    let lines = if view == "cards" {
        format_cards(&section.fields, &entries, draft, &session.config.ui)
    } else {
        format_table(&section.fields, &entries, draft, &session.config.ui)
    };
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_show(args: ShowArgs, json: bool) -> CliResult {
    let session = load_session()?;
    let section = active_section(&session)?;
    let entry = section
        .entry(args.id)
        .ok_or_else(|| format!("no entry with id {}", args.id))?;
    if json {
        return print_json(entry);
    }
    for line in format_card(&section.fields, entry, false, &session.config.ui) {
        println!("{}", line);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Section management
// ---------------------------------------------------------------------------

fn cmd_section(action: SectionAction) -> CliResult {
    let mut session = load_session()?;
    match action {
        SectionAction::Add { name } => {
            let index = section_ops::add_section(&mut session.catalog, &name)?;
            persist_section(&session, index);
            persist_state(&session);
            println!("created section '{}' (now active)", name);
        }
        SectionAction::Rm { index } => {
            let name = session
                .catalog
                .sections
                .get(index)
                .map(|s| s.name.clone());
            section_ops::delete_section(&mut session.catalog, index)?;
            if let Some(name) = name {
                persist_removal(&session, &name);
                println!("deleted section '{}'", name);
            }
            // later sections shifted position
            persist_all(&session);
            persist_state(&session);
        }
        SectionAction::Rename { index, new_name } => {
            let old_name = session
                .catalog
                .sections
                .get(index)
                .map(|s| s.name.clone());
            section_ops::rename_section(&mut session.catalog, index, &new_name)?;
            if let Some(old_name) = old_name {
                // the document id changes with the name
                persist_removal(&session, &old_name);
                println!("renamed section '{}' to '{}'", old_name, new_name);
            }
            persist_section(&session, index);
            persist_state(&session);
        }
        SectionAction::Mv { index, direction } => {
            let direction = parse_direction(&direction)?;
            section_ops::move_section(&mut session.catalog, index, direction)?;
            persist_all(&session);
            persist_state(&session);
            println!("moved section");
        }
    }
    Ok(())
}

fn cmd_use(args: UseArgs) -> CliResult {
    let mut session = load_session()?;
    let index = session
        .catalog
        .section_index(&args.name)
        .ok_or_else(|| format!("no such section: {}", args.name))?;
    let had_draft = session.catalog.draft.is_some();
    session.catalog.select(index);
    persist_state(&session);
    if had_draft && session.catalog.draft.is_none() {
        println!("now using '{}' (pending draft abandoned)", args.name);
    } else {
        println!("now using '{}'", args.name);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Field management
// ---------------------------------------------------------------------------

fn cmd_field(action: FieldAction) -> CliResult {
    let mut session = load_session()?;
    match action {
        FieldAction::Add { name, kind } => {
            let kind = parse_kind(&kind)?;
            schema_ops::add_field(&mut session.catalog, &name, kind)?;
            println!("added {} field '{}'", kind, name);
        }
        FieldAction::Rm { index } => {
            schema_ops::delete_field(&mut session.catalog, index)?;
            println!("deleted field {}", index);
        }
        FieldAction::Rename { index, new_name } => {
            schema_ops::rename_field(&mut session.catalog, index, &new_name)?;
            println!("renamed field {} to '{}'", index, new_name);
        }
        FieldAction::Retype { index, kind } => {
            let kind = parse_kind(&kind)?;
            schema_ops::retype_field(&mut session.catalog, index, kind)?;
            println!("field {} is now {}", index, kind);
        }
        FieldAction::Mv { index, direction } => {
            let direction = parse_direction(&direction)?;
            schema_ops::move_field(&mut session.catalog, index, direction)?;
            println!("moved field");
        }
    }
    // every schema mutation may touch entries and the draft
    persist_section(&session, session.catalog.active_index());
    persist_state(&session);
    Ok(())
}

// ---------------------------------------------------------------------------
// Entries and the draft lifecycle
// ---------------------------------------------------------------------------

fn cmd_new() -> CliResult {
    let mut session = load_session()?;
    let already = session.catalog.draft.is_some();
    let id = draft_ops::start(&mut session.catalog)?;
    persist_state(&session);
    if already {
        println!("draft +{} already in progress", id);
    } else {
        println!(
            "draft +{} started in '{}' (fill it with `stash set`, commit with `stash save`)",
            id,
            active_section(&session)?.name
        );
    }
    Ok(())
}

fn cmd_set(args: SetArgs) -> CliResult {
    let mut session = load_session()?;
    let kind = active_section(&session)?
        .field(&args.field)
        .ok_or_else(|| format!("no such field: {}", args.field))?
        .kind;
    let value = parse_value(kind, &args.value)?;
    draft_ops::edit_field(&mut session.catalog, &args.field, value)?;
    persist_state(&session);
    println!("set {} on draft", args.field);
    Ok(())
}

fn cmd_save() -> CliResult {
    let mut session = load_session()?;
    let id = draft_ops::commit(&mut session.catalog)?;
    persist_section(&session, session.catalog.active_index());
    persist_state(&session);
    println!(
        "entry #{} added to '{}'",
        id,
        active_section(&session)?.name
    );
    Ok(())
}

fn cmd_cancel() -> CliResult {
    let mut session = load_session()?;
    if draft_ops::discard(&mut session.catalog) {
        persist_state(&session);
        println!("draft discarded");
    } else {
        println!("no draft in progress");
    }
    Ok(())
}

fn cmd_edit(args: EditArgs) -> CliResult {
    let mut session = load_session()?;
    let kind = active_section(&session)?
        .field(&args.field)
        .ok_or_else(|| format!("no such field: {}", args.field))?
        .kind;
    let value = parse_value(kind, &args.value)?;
    entry_ops::update_value(&mut session.catalog, args.id, &args.field, value)?;
    persist_section(&session, session.catalog.active_index());
    println!("updated entry #{}", args.id);
    Ok(())
}

fn cmd_rm(args: RmArgs) -> CliResult {
    let mut session = load_session()?;
    entry_ops::delete_entry(&mut session.catalog, args.id)?;
    persist_section(&session, session.catalog.active_index());
    println!("deleted entry #{}", args.id);
    Ok(())
}

//! Copy command handlers
//!
//! Each command renders text from notes and puts it on the system clipboard,
//! or prints it with `--print`.

use anyhow::{Context, Result};
use tracing::error;

use uidmark_core::path::normalize_path;
use uidmark_core::reconcile::folder_label;

use super::Workspace;
use crate::clipboard;
use crate::output::Output;

/// Copy the note's UID; fails if it has none
pub fn uid(workspace: &Workspace, note: String, print: bool, output: &Output) -> Result<()> {
    let service = workspace.service()?;
    let path = workspace.note_path(&note)?;
    let uid = service.uid_of(&path)?;
    let key = &service.settings().uid_key;

    deliver(&uid, print, output, &format!("{} copied: {}", key, uid))
}

/// Copy the note's formatted title line
pub fn title(workspace: &Workspace, note: String, print: bool, output: &Output) -> Result<()> {
    let service = workspace.service()?;
    let path = workspace.note_path(&note)?;
    let entry = service.title_entry(&path)?;

    deliver(&entry, print, output, &format!("Copied: {}", entry))
}

/// Copy one formatted line per markdown note under a folder
pub fn folder(workspace: &Workspace, folder: String, print: bool, output: &Output) -> Result<()> {
    let service = workspace.service()?;
    let entries = service.folder_entries(&folder)?;
    let label = folder_label(&normalize_path(&folder)).to_string();

    if entries.is_empty() {
        output.message(&format!("No markdown notes found in \"{}\".", label));
        return Ok(());
    }

    deliver(
        &entries.join("\n"),
        print,
        output,
        &format!("Copied {} items from \"{}\" using format.", entries.len(), label),
    )
}

/// Copy one formatted line per selected markdown note
pub fn selection(
    workspace: &Workspace,
    notes: Vec<String>,
    print: bool,
    output: &Output,
) -> Result<()> {
    let service = workspace.service()?;
    let paths = notes
        .iter()
        .map(|note| workspace.note_path(note))
        .collect::<Result<Vec<_>>>()?;
    let entries = service.selection_entries(&paths)?;

    deliver(
        &entries.join("\n"),
        print,
        output,
        &format!("Copied {} selected items using format.", entries.len()),
    )
}

fn deliver(text: &str, print: bool, output: &Output, confirmation: &str) -> Result<()> {
    if print {
        return output.print_copied(text);
    }

    if let Err(e) = clipboard::copy_to_clipboard(text) {
        error!("Clipboard copy failed: {:#}", e);
        return Err(e).context("Failed to copy to clipboard. Use --print to write to stdout instead.");
    }

    output.success(confirmation);
    Ok(())
}

//! Exclusion list handlers

use anyhow::Result;

use uidmark_core::path::normalize_path;

use super::Workspace;
use crate::output::Output;

pub fn list(workspace: &Workspace, output: &Output) -> Result<()> {
    let settings = workspace.load_settings()?;
    output.print_folders(&settings.auto_generation_exclusions)
}

/// Exclude a folder from automatic generation
///
/// The folder does not have to exist yet.
pub fn add(workspace: &Workspace, folder: String, output: &Output) -> Result<()> {
    let mut settings = workspace.load_settings()?;
    let normalized = normalize_path(&folder);

    if settings.add_exclusion(&folder) {
        workspace.save_settings(&settings)?;
        output.success(&format!("Excluded \"{}\"", normalized));
    } else if normalized.is_empty() {
        anyhow::bail!("Cannot exclude the vault root");
    } else {
        output.message(&format!("\"{}\" is already excluded.", normalized));
    }

    Ok(())
}

pub fn remove(workspace: &Workspace, folder: String, output: &Output) -> Result<()> {
    let mut settings = workspace.load_settings()?;
    let normalized = normalize_path(&folder);

    if settings.remove_exclusion(&folder) {
        workspace.save_settings(&settings)?;
        output.success(&format!("Removed exclusion \"{}\"", normalized));
    } else {
        output.message(&format!("\"{}\" was not excluded.", normalized));
    }

    Ok(())
}

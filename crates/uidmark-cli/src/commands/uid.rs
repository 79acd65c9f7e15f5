//! Single-note UID command handlers

use anyhow::{bail, Result};

use uidmark_core::{RemoveOutcome, SetOutcome, UidService};

use super::Workspace;
use crate::output::{Output, OutputFormat};

/// Write a fresh UID, replacing any existing one
pub fn generate(workspace: &Workspace, note: String, output: &Output) -> Result<()> {
    let service = workspace.service()?;
    let path = workspace.note_path(&note)?;
    let outcome = service.generate_or_overwrite(&path)?;
    report_set(&service, &path, outcome, output)
}

/// Write a UID only if the note has none
pub fn create(workspace: &Workspace, note: String, output: &Output) -> Result<()> {
    let service = workspace.service()?;
    let path = workspace.note_path(&note)?;
    let outcome = service.create_if_missing(&path)?;
    report_set(&service, &path, outcome, output)
}

fn report_set(
    service: &UidService,
    path: &str,
    outcome: SetOutcome,
    output: &Output,
) -> Result<()> {
    let info = service.info(path)?;
    let key = &info.key;

    match outcome {
        SetOutcome::Assigned(uid) => match output.format {
            OutputFormat::Human => output.success(&format!("{} set for {}: {}", key, info.title, uid)),
            OutputFormat::Json => println!(
                "{}",
                serde_json::json!({"path": info.path, "key": key, "uid": uid, "created": true})
            ),
            OutputFormat::Quiet => println!("{}", uid),
        },
        SetOutcome::AlreadyPresent(uid) => match output.format {
            OutputFormat::Human => output.message(&format!(
                "Note {} already has a {}. Use \"generate\" to overwrite.",
                info.title, key
            )),
            OutputFormat::Json => println!(
                "{}",
                serde_json::json!({"path": info.path, "key": key, "uid": uid, "created": false})
            ),
            OutputFormat::Quiet => println!("{}", uid),
        },
        SetOutcome::Failed => bail!("Failed to set {} on {}", key, info.title),
    }

    Ok(())
}

/// Delete the note's UID
pub fn remove(workspace: &Workspace, note: String, output: &Output) -> Result<()> {
    let service = workspace.service()?;
    let path = workspace.note_path(&note)?;
    let key = service.settings().uid_key.clone();
    let title = service.note(&path)?.title().to_string();

    match service.remove(&path)? {
        RemoveOutcome::Removed => output.success(&format!("{} removed from {}", key, title)),
        RemoveOutcome::NotPresent => output.message(&format!("No {} found on {}.", key, title)),
        RemoveOutcome::Failed => bail!("Failed to remove {} from {}", key, title),
    }

    Ok(())
}

/// Print the note's UID
pub fn show(workspace: &Workspace, note: String, output: &Output) -> Result<()> {
    let service = workspace.service()?;
    let path = workspace.note_path(&note)?;
    output.print_uid(&service.info(&path)?)
}

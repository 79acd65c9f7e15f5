//! Bulk command handlers

use std::time::Duration;

use anyhow::{bail, Result};
use tracing::info;

use uidmark_core::reconcile::folder_label;
use uidmark_core::Notifier;

use super::Workspace;
use crate::output::Output;
use crate::prompt::{confirm, ConsoleNotifier};

/// Add UIDs to every in-scope note that lacks one
pub async fn scan(workspace: &Workspace, output: &Output) -> Result<()> {
    let service = workspace.service()?;
    let report = service.add_missing_in_scope().await?;
    output.print_scan_report(&report, &service.settings().uid_key)
}

/// Remove UIDs from every note under a folder
///
/// Asks first unless `yes` is set. Automatic generation is switched off and
/// persisted before anything is removed, so a running watcher does not put
/// the UIDs straight back.
pub async fn clear(
    workspace: &Workspace,
    folder: Option<String>,
    yes: bool,
    output: &Output,
) -> Result<()> {
    let mut service = workspace.service()?;
    let mut settings = service.settings().clone();
    let folder = folder.unwrap_or_else(|| settings.folder_to_clear.clone());
    if folder.trim().is_empty() {
        bail!(
            "No folder given. Pass one or set a default with \
             `uidmark config set folder_to_clear <folder>`."
        );
    }
    let label = folder_label(&service.folder(&folder)?).to_string();

    if !yes {
        if !output.should_prompt() {
            bail!("Refusing to clear without confirmation. Pass --yes.");
        }
        let prompt = format!(
            "Remove the {} field from every note in \"{}\"? This cannot be undone.",
            settings.uid_key, label
        );
        if !confirm(&prompt)? {
            output.message("Cancelled.");
            return Ok(());
        }
    }

    let was_auto = settings.auto_generate_uid;
    if was_auto {
        info!("Disabling automatic generation before clearing");
        settings.auto_generate_uid = false;
        workspace.save_settings(&settings)?;
        service.update_settings(settings);
    }

    let report = service.clear_in_folder(Some(&folder)).await?;

    if was_auto {
        ConsoleNotifier::new(output.is_quiet()).notify(
            "Automatic UID generation was disabled. You can re-enable it in settings if desired.",
            Some(Duration::from_secs(8)),
        );
    }

    output.print_clear_report(&report, &label)
}

//! Watch command handler
//!
//! Runs the automatic trigger for every markdown note created or modified in
//! the vault until interrupted. Settings changes are picked up live.

use anyhow::{bail, Result};
use tracing::{debug, info, warn};

use uidmark_core::{AutoOutcome, FsVault};

use super::Workspace;
use crate::output::Output;
use crate::watcher::{FileEvent, FileWatcher};

pub fn run(workspace: &Workspace, output: &Output) -> Result<()> {
    let mut service = workspace.service()?;
    if !service.settings().auto_generate_uid {
        bail!(
            "Automatic UID generation is disabled. Enable it with \
             `uidmark config set auto_generate_uid true`."
        );
    }

    let vault = FsVault::new(&workspace.vault_dir);
    let watcher = FileWatcher::new(&workspace.vault_dir, &workspace.settings_path)?;
    output.message(&format!(
        "Watching {} for new notes. Press Ctrl+C to stop.",
        workspace.vault_dir.display()
    ));

    for event in watcher.receiver.iter() {
        match event {
            FileEvent::Settings => match workspace.load_settings() {
                Ok(settings) => {
                    info!("Settings changed, reloading");
                    service.update_settings(settings);
                }
                Err(e) => warn!("Keeping previous settings: {:#}", e),
            },
            FileEvent::Note(path) => {
                let Some(relative) = vault.relative(&path) else {
                    continue;
                };
                match service.handle_auto_trigger(&relative) {
                    AutoOutcome::Assigned(uid) => output.success(&format!(
                        "{} set for {}: {}",
                        service.settings().uid_key,
                        relative,
                        uid
                    )),
                    AutoOutcome::Failed => {
                        warn!("Automatic generation failed for {}", relative)
                    }
                    other => debug!("{}: {:?}", relative, other),
                }
            }
        }
    }

    Ok(())
}

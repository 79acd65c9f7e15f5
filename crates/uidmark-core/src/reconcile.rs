//! Bulk reconciliation and the automatic trigger
//!
//! - `add_missing_in_scope`: give every eligible note without a UID a new one
//! - `clear_in_folder`: remove the UID from every note under a folder
//! - `AutoTrigger`: the debounced per-note path used on create/open events
//!
//! Bulk scans run on the caller's async runtime and yield to it every
//! [`YIELD_INTERVAL`] notes so a long scan never starves other tasks. A
//! failure on one note is counted and the scan carries on.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::accessor::UidAccessor;
use crate::debounce::Debouncer;
use crate::error::UidError;
use crate::identifier;
use crate::notice::{Notifier, ERROR_NOTICE, SUMMARY_NOTICE};
use crate::path::{file_name, is_under, normalize_path};
use crate::scope::is_eligible_for_auto;
use crate::settings::Settings;
use crate::vault::{Document, Entry, Vault, MARKDOWN_EXTENSION};

/// Notes processed between yields to the runtime
pub const YIELD_INTERVAL: usize = 25;

/// Notes processed between progress notices
pub const PROGRESS_INTERVAL: usize = 100;

/// Tally of an "add missing UIDs" scan
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub total: usize,
    pub added: usize,
    pub skipped_existing: usize,
    pub skipped_scope: usize,
    pub errors: usize,
}

/// Tally of a folder clear
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClearReport {
    pub total: usize,
    pub cleared: usize,
    pub unchanged: usize,
    pub errors: usize,
}

/// Add a UID to every in-scope note that lacks one
///
/// The final tally is notified once. Failing to list the vault is the only
/// error returned; it is notified as well.
pub async fn add_missing_in_scope(
    vault: &dyn Vault,
    notifier: &dyn Notifier,
    settings: &Settings,
) -> Result<ScanReport, UidError> {
    let accessor = UidAccessor::new(vault, notifier, &settings.uid_key);
    let key = accessor.key();

    let documents = match vault.list_documents(MARKDOWN_EXTENSION) {
        Ok(documents) => documents,
        Err(e) => {
            error!("Failed to list notes for bulk {} generation: {}", key, e);
            notifier.notify(
                &format!("Failed to scan for missing {}s: {}", key, e),
                Some(ERROR_NOTICE),
            );
            return Err(e.into());
        }
    };

    let mut report = ScanReport {
        total: documents.len(),
        ..ScanReport::default()
    };
    info!("Scanning {} notes for missing {}s", report.total, key);
    notifier.notify(
        &format!("Scanning {} notes for missing {}s...", report.total, key),
        None,
    );

    for (i, document) in documents.iter().enumerate() {
        if !document.is_markdown() || !is_eligible_for_auto(document.path(), settings) {
            report.skipped_scope += 1;
        } else if accessor.read(document).is_some() {
            report.skipped_existing += 1;
        } else {
            let uid = identifier::generate();
            match accessor.try_set(document, &uid, false) {
                Ok(true) => {
                    debug!("Added {} to {}", key, document.path());
                    report.added += 1;
                }
                // Someone else committed a UID between the read and the edit
                Ok(false) => report.skipped_existing += 1,
                Err(e) => {
                    warn!("Failed to add {} to {}: {}", key, document.path(), e);
                    report.errors += 1;
                }
            }
        }

        let processed = i + 1;
        if processed % PROGRESS_INTERVAL == 0 && processed < report.total {
            notifier.notify(
                &format!("Processed {}/{} notes...", processed, report.total),
                None,
            );
        }
        if processed % YIELD_INTERVAL == 0 {
            tokio::task::yield_now().await;
        }
    }

    let mut message = format!(
        "Scan complete. Added {} {}s. {} already had one, {} out of scope.",
        report.added, key, report.skipped_existing, report.skipped_scope
    );
    if report.errors > 0 {
        message.push_str(&format!(
            " Encountered {} errors (check logs).",
            report.errors
        ));
    }
    info!("{}", message);
    notifier.notify(&message, Some(SUMMARY_NOTICE));

    Ok(report)
}

/// Remove the UID from every markdown note under `folder`
///
/// Scope and exclusions do not apply. `"/"` means the whole vault. Nothing is
/// touched unless `folder` resolves to an existing folder.
pub async fn clear_in_folder(
    vault: &dyn Vault,
    notifier: &dyn Notifier,
    settings: &Settings,
    folder: &str,
) -> Result<ClearReport, UidError> {
    let requested = folder.trim();
    if requested.is_empty() {
        return Err(UidError::EmptyFolderPath);
    }

    let target = normalize_path(requested);
    match vault.resolve(&target)? {
        Some(Entry::Folder(_)) => {}
        _ => return Err(UidError::FolderNotFound(requested.to_string())),
    }

    let accessor = UidAccessor::new(vault, notifier, &settings.uid_key);
    let key = accessor.key();
    let label = folder_label(&target);

    info!("Starting {} clearing for folder '{}'", key, label);
    notifier.notify(
        &format!(
            "Clearing {}s in \"{}\"... This may take a moment.",
            key, label
        ),
        None,
    );

    let documents: Vec<Document> = match vault.list_documents(MARKDOWN_EXTENSION) {
        Ok(documents) => documents
            .into_iter()
            .filter(|d| is_under(d.path(), &target))
            .collect(),
        Err(e) => {
            error!("Failed to list notes for {} clearing in '{}': {}", key, label, e);
            notifier.notify(
                &format!("Failed to clear {}s in \"{}\": {}", key, label, e),
                Some(ERROR_NOTICE),
            );
            return Err(e.into());
        }
    };

    let mut report = ClearReport {
        total: documents.len(),
        ..ClearReport::default()
    };

    if documents.is_empty() {
        notifier.notify(
            &format!("No markdown files found within \"{}\".", label),
            None,
        );
        return Ok(report);
    }

    for (i, document) in documents.iter().enumerate() {
        match accessor.try_remove(document) {
            Ok(true) => report.cleared += 1,
            Ok(false) => report.unchanged += 1,
            Err(e) => {
                warn!("Failed to remove {} from {}: {}", key, document.path(), e);
                report.errors += 1;
            }
        }
        if (i + 1) % YIELD_INTERVAL == 0 {
            tokio::task::yield_now().await;
        }
    }

    let mut message = format!(
        "UID clearing complete for \"{}\". Removed {} {}s.",
        label, report.cleared, key
    );
    if report.errors > 0 {
        message.push_str(&format!(
            " Encountered {} errors (check logs).",
            report.errors
        ));
    }
    info!(
        "UID clearing finished. Removed: {}, Errors: {}",
        report.cleared, report.errors
    );
    notifier.notify(&message, Some(SUMMARY_NOTICE));

    Ok(report)
}

/// Display name of a folder
pub fn folder_label(folder: &str) -> &str {
    if folder.is_empty() {
        "/"
    } else {
        file_name(folder)
    }
}

/// What the automatic trigger did with an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoOutcome {
    Disabled,
    NotMarkdown,
    Debounced,
    OutOfScope,
    AlreadyPresent,
    Assigned(String),
    Failed,
}

/// Debounced create/open handler
#[derive(Debug, Default)]
pub struct AutoTrigger {
    debouncer: Debouncer,
}

impl AutoTrigger {
    pub fn new(window: Duration) -> Self {
        Self {
            debouncer: Debouncer::new(window),
        }
    }

    /// Handle a create/open event for `document` that happened at `now`
    pub fn handle(
        &mut self,
        vault: &dyn Vault,
        notifier: &dyn Notifier,
        settings: &Settings,
        document: &Document,
        now: Instant,
    ) -> AutoOutcome {
        if !settings.auto_generate_uid {
            return AutoOutcome::Disabled;
        }
        if !document.is_markdown() {
            return AutoOutcome::NotMarkdown;
        }
        if !self.debouncer.accept(document.path(), now) {
            return AutoOutcome::Debounced;
        }
        if !is_eligible_for_auto(document.path(), settings) {
            return AutoOutcome::OutOfScope;
        }

        let accessor = UidAccessor::new(vault, notifier, &settings.uid_key);
        if accessor.read(document).is_some() {
            return AutoOutcome::AlreadyPresent;
        }

        info!("Auto-generating {} for: {}", accessor.key(), document.path());
        let uid = identifier::generate();
        if accessor.set(document, &uid, false) {
            AutoOutcome::Assigned(uid)
        } else if accessor.read(document).is_some() {
            AutoOutcome::AlreadyPresent
        } else {
            AutoOutcome::Failed
        }
    }
}

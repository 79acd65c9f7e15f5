//! UID service
//!
//! Facade over a vault, a notifier and the current settings. Hosts call these
//! methods from their commands and event handlers; each one maps to a single
//! user-facing action.

use std::collections::BTreeSet;
use std::time::Instant;

use tracing::debug;

use crate::accessor::UidAccessor;
use crate::error::UidError;
use crate::format::render_entry;
use crate::identifier;
use crate::notice::Notifier;
use crate::path::{is_under, normalize_path};
use crate::reconcile::{self, AutoOutcome, AutoTrigger, ClearReport, ScanReport};
use crate::settings::Settings;
use crate::vault::{Document, Entry, Vault, MARKDOWN_EXTENSION};

/// Result of a set request on one note
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetOutcome {
    /// A new UID was written
    Assigned(String),
    /// The note already had this UID; nothing was written
    AlreadyPresent(String),
    /// The write failed; the user has been notified
    Failed,
}

/// Result of a remove request on one note
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    NotPresent,
    /// The write failed; the user has been notified
    Failed,
}

/// Everything known about one note's UID
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct UidInfo {
    pub path: String,
    pub title: String,
    pub key: String,
    pub uid: Option<String>,
}

pub struct UidService {
    vault: Box<dyn Vault>,
    notifier: Box<dyn Notifier>,
    settings: Settings,
    trigger: AutoTrigger,
}

impl UidService {
    pub fn new(vault: Box<dyn Vault>, notifier: Box<dyn Notifier>, settings: Settings) -> Self {
        Self {
            vault,
            notifier,
            settings,
            trigger: AutoTrigger::default(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace the active settings; later calls use the new key and scope
    pub fn update_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn vault(&self) -> &dyn Vault {
        self.vault.as_ref()
    }

    fn accessor(&self) -> UidAccessor<'_> {
        UidAccessor::new(
            self.vault.as_ref(),
            self.notifier.as_ref(),
            &self.settings.uid_key,
        )
    }

    /// Resolve `path` to a markdown note
    pub fn note(&self, path: &str) -> Result<Document, UidError> {
        match self.vault.resolve(path)? {
            Some(Entry::Document(document)) if document.is_markdown() => Ok(document),
            Some(Entry::Document(document)) => {
                Err(UidError::NotMarkdown(document.path().to_string()))
            }
            _ => Err(UidError::NoteNotFound(normalize_path(path))),
        }
    }

    /// Give the note a fresh UID, replacing any existing one
    pub fn generate_or_overwrite(&self, path: &str) -> Result<SetOutcome, UidError> {
        let document = self.note(path)?;
        let uid = identifier::generate();
        if self.accessor().set(&document, &uid, true) {
            Ok(SetOutcome::Assigned(uid))
        } else {
            Ok(SetOutcome::Failed)
        }
    }

    /// Give the note a UID only if it has none
    pub fn create_if_missing(&self, path: &str) -> Result<SetOutcome, UidError> {
        let document = self.note(path)?;
        let accessor = self.accessor();
        if let Some(existing) = accessor.read(&document) {
            return Ok(SetOutcome::AlreadyPresent(existing));
        }

        let uid = identifier::generate();
        if accessor.set(&document, &uid, false) {
            Ok(SetOutcome::Assigned(uid))
        } else {
            Ok(SetOutcome::Failed)
        }
    }

    pub fn remove(&self, path: &str) -> Result<RemoveOutcome, UidError> {
        let document = self.note(path)?;
        let accessor = self.accessor();
        if accessor.remove(&document) {
            Ok(RemoveOutcome::Removed)
        } else if accessor.read(&document).is_none() {
            Ok(RemoveOutcome::NotPresent)
        } else {
            Ok(RemoveOutcome::Failed)
        }
    }

    pub fn info(&self, path: &str) -> Result<UidInfo, UidError> {
        let document = self.note(path)?;
        let accessor = self.accessor();
        Ok(UidInfo {
            path: document.path().to_string(),
            title: document.title().to_string(),
            key: accessor.key().to_string(),
            uid: accessor.read(&document),
        })
    }

    /// The note's UID, or `MissingUid` if it has none
    pub fn uid_of(&self, path: &str) -> Result<String, UidError> {
        let document = self.note(path)?;
        let accessor = self.accessor();
        accessor.read(&document).ok_or_else(|| UidError::MissingUid {
            key: accessor.key().to_string(),
            title: document.title().to_string(),
        })
    }

    /// Copy line for one note
    pub fn title_entry(&self, path: &str) -> Result<String, UidError> {
        let document = self.note(path)?;
        Ok(self.entry_for(&document))
    }

    /// Resolve `folder` to the normalized path of an existing folder
    ///
    /// `"/"` is the vault root.
    pub fn folder(&self, folder: &str) -> Result<String, UidError> {
        let requested = folder.trim();
        if requested.is_empty() {
            return Err(UidError::EmptyFolderPath);
        }
        match self.vault.resolve(requested)? {
            Some(Entry::Folder(path)) => Ok(path),
            _ => Err(UidError::FolderNotFound(requested.to_string())),
        }
    }

    /// Copy lines for every markdown note under `folder`, sorted by path
    ///
    /// An empty result means the folder holds no markdown notes.
    pub fn folder_entries(&self, folder: &str) -> Result<Vec<String>, UidError> {
        let target = self.folder(folder)?;

        let mut documents: Vec<Document> = self
            .vault
            .list_documents(MARKDOWN_EXTENSION)?
            .into_iter()
            .filter(|d| is_under(d.path(), &target))
            .collect();
        documents.sort();

        Ok(documents.iter().map(|d| self.entry_for(d)).collect())
    }

    /// Copy lines for a selection of paths
    ///
    /// Folders and non-markdown files are skipped, duplicates collapse, and
    /// input order is kept.
    pub fn selection_entries(&self, paths: &[String]) -> Result<Vec<String>, UidError> {
        let mut seen = BTreeSet::new();
        let mut entries = Vec::new();

        for path in paths {
            let Some(Entry::Document(document)) = self.vault.resolve(path)? else {
                debug!("Skipping selection entry {}", path);
                continue;
            };
            if !document.is_markdown() || !seen.insert(document.path().to_string()) {
                continue;
            }
            entries.push(self.entry_for(&document));
        }

        if entries.is_empty() {
            return Err(UidError::EmptySelection);
        }
        Ok(entries)
    }

    fn entry_for(&self, document: &Document) -> String {
        let uid = self.accessor().read(document);
        render_entry(&self.settings, document.title(), uid.as_deref())
    }

    pub async fn add_missing_in_scope(&self) -> Result<ScanReport, UidError> {
        reconcile::add_missing_in_scope(
            self.vault.as_ref(),
            self.notifier.as_ref(),
            &self.settings,
        )
        .await
    }

    /// Clear UIDs under `folder`, or under the configured folder if `None`
    pub async fn clear_in_folder(&self, folder: Option<&str>) -> Result<ClearReport, UidError> {
        let folder = folder.unwrap_or(&self.settings.folder_to_clear);
        reconcile::clear_in_folder(
            self.vault.as_ref(),
            self.notifier.as_ref(),
            &self.settings,
            folder,
        )
        .await
    }

    /// Feed a create/open event for `path` to the automatic trigger
    pub fn handle_auto_trigger(&mut self, path: &str) -> AutoOutcome {
        self.handle_auto_trigger_at(path, Instant::now())
    }

    pub fn handle_auto_trigger_at(&mut self, path: &str, now: Instant) -> AutoOutcome {
        let document = Document::new(path);
        self.trigger.handle(
            self.vault.as_ref(),
            self.notifier.as_ref(),
            &self.settings,
            &document,
            now,
        )
    }
}

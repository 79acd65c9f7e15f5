//! In-memory vault
//!
//! Holds notes as front matter mappings keyed by path. Useful for tests and for
//! embedding the core in a host that keeps its own metadata index. Reads and
//! writes can be made to fail per path to exercise error handling.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use super::frontmatter;
use super::{Document, Entry, Frontmatter, Vault};
use crate::error::{VaultError, VaultResult};
use crate::path::{extension, normalize_path, parent_of};

#[derive(Debug, Default)]
struct MemoryState {
    notes: BTreeMap<String, Option<Frontmatter>>,
    folders: BTreeSet<String>,
    failing_reads: BTreeSet<String>,
    failing_writes: BTreeSet<String>,
    failing_list: bool,
    commits: usize,
}

/// Vault that keeps everything in memory
#[derive(Debug, Default)]
pub struct MemoryVault {
    state: Mutex<MemoryState>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Add or replace a note; its parent folders are created implicitly
    pub fn insert(&self, path: &str, frontmatter: Option<Frontmatter>) -> Document {
        let document = Document::new(path);
        let mut state = self.state();
        let mut folder = parent_of(document.path()).to_string();
        while !folder.is_empty() {
            let next = parent_of(&folder).to_string();
            state.folders.insert(folder);
            folder = next;
        }
        state.notes.insert(document.path().to_string(), frontmatter);
        document
    }

    /// Add a note whose front matter is given as YAML
    ///
    /// Empty YAML means the note has no front matter block.
    pub fn insert_yaml(&self, path: &str, yaml: &str) -> Result<Document, String> {
        let frontmatter = if yaml.trim().is_empty() {
            None
        } else {
            Some(frontmatter::parse(yaml)?)
        };
        Ok(self.insert(path, frontmatter))
    }

    /// Register an empty folder
    pub fn insert_folder(&self, path: &str) {
        let folder = normalize_path(path);
        if !folder.is_empty() {
            self.state().folders.insert(folder);
        }
    }

    /// Make every read of `path` fail
    pub fn fail_reads_for(&self, path: &str) {
        self.state().failing_reads.insert(normalize_path(path));
    }

    /// Make every commit to `path` fail
    pub fn fail_writes_for(&self, path: &str) {
        self.state().failing_writes.insert(normalize_path(path));
    }

    /// Make listing documents fail
    pub fn fail_listing(&self) {
        self.state().failing_list = true;
    }

    /// Current front matter of a note, bypassing failure injection
    pub fn snapshot(&self, path: &str) -> Option<Frontmatter> {
        self.state()
            .notes
            .get(&normalize_path(path))
            .cloned()
            .flatten()
    }

    /// Number of committed edits so far
    pub fn commits(&self) -> usize {
        self.state().commits
    }
}

impl Vault for MemoryVault {
    fn list_documents(&self, ext: &str) -> VaultResult<Vec<Document>> {
        let state = self.state();
        if state.failing_list {
            return Err(VaultError::Injected {
                path: String::new(),
                details: "injected listing failure".to_string(),
            });
        }
        Ok(state
            .notes
            .keys()
            .filter(|path| extension(path) == Some(ext))
            .map(|path| Document::new(path))
            .collect())
    }

    fn frontmatter(&self, document: &Document) -> VaultResult<Option<Frontmatter>> {
        let state = self.state();
        if state.failing_reads.contains(document.path()) {
            return Err(VaultError::Injected {
                path: document.path().to_string(),
                details: "read failure".to_string(),
            });
        }
        match state.notes.get(document.path()) {
            Some(frontmatter) => Ok(frontmatter.clone()),
            None => Err(VaultError::NotFound {
                path: document.path().into(),
            }),
        }
    }

    fn edit_frontmatter(
        &self,
        document: &Document,
        edit: &mut dyn FnMut(&mut Frontmatter) -> bool,
    ) -> VaultResult<bool> {
        let mut state = self.state();
        let Some(current) = state.notes.get(document.path()) else {
            return Err(VaultError::NotFound {
                path: document.path().into(),
            });
        };

        // Work on a copy so a failed commit leaves the stored note untouched
        let mut working = current.clone().unwrap_or_default();
        if !edit(&mut working) {
            return Ok(false);
        }

        if state.failing_writes.contains(document.path()) {
            return Err(VaultError::Injected {
                path: document.path().to_string(),
                details: "write failure".to_string(),
            });
        }

        let stored = if working.is_empty() {
            None
        } else {
            Some(working)
        };
        state.notes.insert(document.path().to_string(), stored);
        state.commits += 1;
        Ok(true)
    }

    fn resolve(&self, path: &str) -> VaultResult<Option<Entry>> {
        let normalized = normalize_path(path);
        let state = self.state();
        if normalized.is_empty() || state.folders.contains(&normalized) {
            return Ok(Some(Entry::Folder(normalized)));
        }
        if state.notes.contains_key(&normalized) {
            return Ok(Some(Entry::Document(Document::new(&normalized))));
        }
        Ok(None)
    }
}

//! Reading and writing the UID field
//!
//! The UID lives in a note's front matter under the configured key. Writes
//! happen inside one atomic front matter edit; a write also removes the legacy
//! `uid` / `Uid` / `UID` keys so a note never carries two identifier fields
//! under different casings.

use serde_yaml::Value;
use tracing::{debug, error, warn};

use crate::error::VaultResult;
use crate::notice::{Notifier, ERROR_NOTICE};
use crate::settings::normalize_uid_key;
use crate::vault::{Document, Frontmatter, Vault};

/// Key spellings cleaned up whenever a UID is written
pub const LEGACY_KEYS: [&str; 3] = ["uid", "Uid", "UID"];

/// UID operations bound to a vault, a notifier and a key
pub struct UidAccessor<'a> {
    vault: &'a dyn Vault,
    notifier: &'a dyn Notifier,
    key: String,
}

impl<'a> UidAccessor<'a> {
    pub fn new(vault: &'a dyn Vault, notifier: &'a dyn Notifier, key: &str) -> Self {
        Self {
            vault,
            notifier,
            key: normalize_uid_key(key),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The note's UID, if it has one
    ///
    /// Strings are returned as-is and numbers as their decimal text; any other
    /// value counts as no UID. Read failures are logged, never returned.
    pub fn read(&self, document: &Document) -> Option<String> {
        match self.vault.frontmatter(document) {
            Ok(Some(frontmatter)) => uid_value(&frontmatter, &self.key),
            Ok(None) => None,
            Err(e) => {
                warn!("Error reading metadata for {}: {}", document.path(), e);
                None
            }
        }
    }

    /// Write `value` as the note's UID, reporting storage failures
    ///
    /// Returns Ok(true) only if the stored value changed. Non-markdown notes
    /// and empty values are refused without touching storage.
    pub fn try_set(&self, document: &Document, value: &str, overwrite: bool) -> VaultResult<bool> {
        if !document.is_markdown() {
            debug!("Refusing to set {} on non-markdown {}", self.key, document.path());
            return Ok(false);
        }
        if value.is_empty() {
            warn!(
                "Attempted to set an empty {} for {}. Aborting.",
                self.key,
                document.path()
            );
            return Ok(false);
        }

        let key = self.key.as_str();
        let new_value = Value::String(value.to_string());
        let mut changed = false;

        self.vault.edit_frontmatter(document, &mut |frontmatter| {
            let current = frontmatter.get(key);
            let present = current.is_some_and(|v| !is_blank(v));
            if present && !overwrite {
                return false;
            }
            if current != Some(&new_value) {
                frontmatter.insert(Value::String(key.to_string()), new_value.clone());
                changed = true;
            }

            let mut cleaned = false;
            for legacy in LEGACY_KEYS {
                if legacy != key {
                    cleaned |= frontmatter.shift_remove(legacy).is_some();
                }
            }
            changed || cleaned
        })?;

        Ok(changed)
    }

    /// Write `value` as the note's UID
    ///
    /// Storage failures are logged, shown to the user, and reported as false.
    pub fn set(&self, document: &Document, value: &str, overwrite: bool) -> bool {
        match self.try_set(document, value, overwrite) {
            Ok(changed) => changed,
            Err(e) => {
                error!(
                    "Error processing front matter for {} during set: {}",
                    document.path(),
                    e
                );
                if let Some(hint) = e.recovery_suggestion() {
                    warn!("{}", hint);
                }
                self.notifier.notify(
                    &format!("Error setting {}. Check logs.", self.key),
                    Some(ERROR_NOTICE),
                );
                false
            }
        }
    }

    /// Delete the UID key, reporting storage failures
    pub fn try_remove(&self, document: &Document) -> VaultResult<bool> {
        let key = self.key.as_str();
        self.vault.edit_frontmatter(document, &mut |frontmatter| {
            frontmatter.shift_remove(key).is_some()
        })
    }

    /// Delete the UID key
    ///
    /// Returns true if a UID was present and removed.
    pub fn remove(&self, document: &Document) -> bool {
        match self.try_remove(document) {
            Ok(removed) => removed,
            Err(e) => {
                error!(
                    "Error processing front matter for {} during removal: {}",
                    document.path(),
                    e
                );
                if let Some(hint) = e.recovery_suggestion() {
                    warn!("{}", hint);
                }
                self.notifier.notify(
                    &format!("Error removing {}. Check logs.", self.key),
                    Some(ERROR_NOTICE),
                );
                false
            }
        }
    }
}

/// Extract a UID from parsed front matter
pub fn uid_value(frontmatter: &Frontmatter, key: &str) -> Option<String> {
    match frontmatter.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

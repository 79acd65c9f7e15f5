//! Auto-generation scope
//!
//! One decision function answers "may a UID be assigned to this note without
//! the user asking?". Both the create/open trigger and the bulk scan call it.

use crate::path::{is_under, normalize_path, parent_of};
use crate::settings::{Scope, Settings};

/// Decide whether `path` is eligible for automatic UID assignment
///
/// Exclusions win over scope. With folder scope, an unset folder makes
/// nothing eligible.
pub fn is_eligible_for_auto(path: &str, settings: &Settings) -> bool {
    let path = normalize_path(path);

    if is_excluded(&path, settings) {
        return false;
    }

    if settings.auto_generation_scope == Scope::Folder {
        let base = normalize_path(&settings.auto_generation_folder);
        if base.is_empty() {
            return false;
        }
        let inside = path.starts_with(&format!("{}/", base));
        if !inside && parent_of(&path) != base {
            return false;
        }
    }

    true
}

/// True if `path` equals or lies under any exclusion
pub fn is_excluded(path: &str, settings: &Settings) -> bool {
    settings.auto_generation_exclusions.iter().any(|entry| {
        let entry = normalize_path(entry);
        !entry.is_empty() && is_under(path, &entry)
    })
}

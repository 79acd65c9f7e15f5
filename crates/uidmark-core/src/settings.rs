//! Settings
//!
//! Settings are loaded from:
//! 1. Default values
//! 2. Settings file (`<vault>/.uidmark/settings.toml`, or `UIDMARK_CONFIG`)
//! 3. Environment variables (UIDMARK_* prefix)
//!
//! Environment variables take precedence over file values. Loading merges the
//! file over the defaults field by field, so a missing or corrupt value only
//! resets that one field.

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::warn;

use crate::path::normalize_path;
use crate::vault::fs::atomic_write;

/// Environment variable prefix
const ENV_PREFIX: &str = "UIDMARK";

/// Directory inside the vault that holds tool state
pub const STATE_DIR: &str = ".uidmark";

pub const DEFAULT_UID_KEY: &str = "uid";
pub const DEFAULT_COPY_FORMAT: &str = "{title} - {uidKey}: {uid}";
pub const DEFAULT_COPY_FORMAT_MISSING: &str = "{title} - No {uidKey}";

/// Which notes automatic generation applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Every note in the vault
    #[default]
    Vault,
    /// Only notes inside `auto_generation_folder`
    Folder,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Vault => write!(f, "vault"),
            Scope::Folder => write!(f, "folder"),
        }
    }
}

impl FromStr for Scope {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "vault" => Ok(Scope::Vault),
            "folder" => Ok(Scope::Folder),
            other => bail!("Invalid scope '{}'. Use 'vault' or 'folder'.", other),
        }
    }
}

/// Persisted settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Front matter key holding the UID
    pub uid_key: String,

    /// Assign UIDs when notes are created or opened
    pub auto_generate_uid: bool,

    pub auto_generation_scope: Scope,

    /// Target folder when scope is `folder`
    pub auto_generation_folder: String,

    /// Folders never touched by automatic generation
    pub auto_generation_exclusions: Vec<String>,

    /// Default folder for `clear`
    pub folder_to_clear: String,

    /// Template used when a note has a UID
    pub copy_format_string: String,

    /// Template used when a note has no UID
    pub copy_format_string_missing_uid: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            uid_key: DEFAULT_UID_KEY.to_string(),
            auto_generate_uid: false,
            auto_generation_scope: Scope::Vault,
            auto_generation_folder: String::new(),
            auto_generation_exclusions: Vec::new(),
            folder_to_clear: String::new(),
            copy_format_string: DEFAULT_COPY_FORMAT.to_string(),
            copy_format_string_missing_uid: DEFAULT_COPY_FORMAT_MISSING.to_string(),
        }
    }
}

/// Keys accepted by [`Settings::set`]
pub const SETTING_KEYS: &[&str] = &[
    "uid_key",
    "auto_generate_uid",
    "auto_generation_scope",
    "auto_generation_folder",
    "auto_generation_exclusions",
    "folder_to_clear",
    "copy_format_string",
    "copy_format_string_missing_uid",
];

impl Settings {
    /// Load settings for a vault
    pub fn load(vault_dir: &Path) -> Result<Self> {
        Self::load_from_path(&Self::settings_file_path(vault_dir))
    }

    /// Load settings from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut settings = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read settings file: {:?}", path))?;
            Self::merge_with_defaults(&content)
        } else {
            Self::default()
        };

        settings.apply_env_overrides();
        settings.normalize();
        Ok(settings)
    }

    /// Load settings from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Self {
        let mut settings = Self::merge_with_defaults(toml_content);
        settings.apply_env_overrides();
        settings.normalize();
        settings
    }

    /// Overlay whatever parses in `content` onto the defaults
    fn merge_with_defaults(content: &str) -> Self {
        let mut settings = Self::default();

        let table = match content.parse::<toml::Table>() {
            Ok(table) => table,
            Err(e) => {
                warn!("Settings file is not valid TOML, using defaults: {}", e);
                return settings;
            }
        };

        merge_field(&table, "uid_key", &mut settings.uid_key);
        merge_field(&table, "auto_generate_uid", &mut settings.auto_generate_uid);
        merge_field(
            &table,
            "auto_generation_scope",
            &mut settings.auto_generation_scope,
        );
        merge_field(
            &table,
            "auto_generation_folder",
            &mut settings.auto_generation_folder,
        );
        merge_field(
            &table,
            "auto_generation_exclusions",
            &mut settings.auto_generation_exclusions,
        );
        merge_field(&table, "folder_to_clear", &mut settings.folder_to_clear);
        merge_field(&table, "copy_format_string", &mut settings.copy_format_string);
        merge_field(
            &table,
            "copy_format_string_missing_uid",
            &mut settings.copy_format_string_missing_uid,
        );

        settings
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // UIDMARK_UID_KEY
        if let Ok(val) = std::env::var(format!("{}_UID_KEY", ENV_PREFIX)) {
            self.uid_key = val;
        }

        // UIDMARK_AUTO_GENERATE
        if let Ok(val) = std::env::var(format!("{}_AUTO_GENERATE", ENV_PREFIX)) {
            self.auto_generate_uid = val.eq_ignore_ascii_case("true") || val == "1";
        }
    }

    /// Restore the field invariants
    ///
    /// Paths are normalized, the key has no whitespace, exclusions hold no
    /// empty or duplicate entries, and empty templates fall back to defaults.
    pub fn normalize(&mut self) {
        self.uid_key = normalize_uid_key(&self.uid_key);
        self.auto_generation_folder = normalize_path(&self.auto_generation_folder);
        self.folder_to_clear = normalize_path(&self.folder_to_clear);

        let mut exclusions: Vec<String> = Vec::new();
        for entry in &self.auto_generation_exclusions {
            let entry = normalize_path(entry);
            if !entry.is_empty() && !exclusions.contains(&entry) {
                exclusions.push(entry);
            }
        }
        self.auto_generation_exclusions = exclusions;

        if self.copy_format_string.is_empty() {
            self.copy_format_string = DEFAULT_COPY_FORMAT.to_string();
        }
        if self.copy_format_string_missing_uid.is_empty() {
            self.copy_format_string_missing_uid = DEFAULT_COPY_FORMAT_MISSING.to_string();
        }
    }

    /// Update a single setting from its textual value
    ///
    /// This is the only mutation entry point used by front ends; the caller
    /// persists the result with [`Settings::save_to_path`].
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "uid_key" => self.uid_key = value.to_string(),
            "auto_generate_uid" => {
                self.auto_generate_uid = value
                    .trim()
                    .parse()
                    .context("Invalid value for auto_generate_uid. Use 'true' or 'false'.")?;
            }
            "auto_generation_scope" => self.auto_generation_scope = value.parse()?,
            "auto_generation_folder" => self.auto_generation_folder = value.to_string(),
            "auto_generation_exclusions" => {
                self.auto_generation_exclusions = value
                    .split(',')
                    .map(|s| s.to_string())
                    .collect();
            }
            "folder_to_clear" => self.folder_to_clear = value.to_string(),
            "copy_format_string" => self.copy_format_string = value.to_string(),
            "copy_format_string_missing_uid" => {
                self.copy_format_string_missing_uid = value.to_string()
            }
            _ => {
                bail!(
                    "Unknown setting: '{}'\nValid keys: {}",
                    key,
                    SETTING_KEYS.join(", ")
                );
            }
        }
        self.normalize();
        Ok(())
    }

    /// Add a folder to the exclusion list
    ///
    /// Returns false if the folder was already excluded or normalizes to the
    /// vault root.
    pub fn add_exclusion(&mut self, folder: &str) -> bool {
        let folder = normalize_path(folder);
        if folder.is_empty() || self.auto_generation_exclusions.contains(&folder) {
            return false;
        }
        self.auto_generation_exclusions.push(folder);
        true
    }

    /// Remove a folder from the exclusion list
    pub fn remove_exclusion(&mut self, folder: &str) -> bool {
        let folder = normalize_path(folder);
        let before = self.auto_generation_exclusions.len();
        self.auto_generation_exclusions.retain(|f| *f != folder);
        self.auto_generation_exclusions.len() != before
    }

    /// Save settings to a file, creating its directory if needed
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize settings")?;
        atomic_write(path, content.as_bytes())
            .with_context(|| format!("Failed to write settings file: {:?}", path))
    }

    /// Get the settings file path for a vault
    ///
    /// Can be overridden with UIDMARK_CONFIG environment variable
    pub fn settings_file_path(vault_dir: &Path) -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        vault_dir.join(STATE_DIR).join("settings.toml")
    }
}

/// Trim the key and drop any internal whitespace; empty means default
pub fn normalize_uid_key(key: &str) -> String {
    let cleaned: String = key.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        DEFAULT_UID_KEY.to_string()
    } else {
        cleaned
    }
}

fn merge_field<T: DeserializeOwned>(table: &toml::Table, key: &str, slot: &mut T) {
    let Some(value) = table.get(key) else {
        return;
    };
    match value.clone().try_into::<T>() {
        Ok(parsed) => *slot = parsed,
        Err(e) => warn!("Ignoring invalid value for setting '{}': {}", key, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &["UIDMARK_UID_KEY", "UIDMARK_AUTO_GENERATE", "UIDMARK_CONFIG"];

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.uid_key, "uid");
        assert!(!settings.auto_generate_uid);
        assert_eq!(settings.auto_generation_scope, Scope::Vault);
        assert!(settings.auto_generation_exclusions.is_empty());
        assert_eq!(settings.copy_format_string, "{title} - {uidKey}: {uid}");
        assert_eq!(settings.copy_format_string_missing_uid, "{title} - No {uidKey}");
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            uid_key = "id"
            auto_generate_uid = true
            auto_generation_scope = "folder"
            auto_generation_folder = "/notes/inbox/"
            auto_generation_exclusions = ["templates", "notes/inbox/drafts/"]
        "#;

        let settings = Settings::load_from_str(toml);
        assert_eq!(settings.uid_key, "id");
        assert!(settings.auto_generate_uid);
        assert_eq!(settings.auto_generation_scope, Scope::Folder);
        assert_eq!(settings.auto_generation_folder, "notes/inbox");
        assert_eq!(
            settings.auto_generation_exclusions,
            vec!["templates".to_string(), "notes/inbox/drafts".to_string()]
        );
        // Untouched fields keep their defaults
        assert_eq!(settings.copy_format_string, DEFAULT_COPY_FORMAT);
    }

    #[test]
    fn test_corrupt_fields_fall_back_individually() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            uid_key = "id"
            auto_generate_uid = "yes please"
            auto_generation_scope = "galaxy"
            auto_generation_exclusions = "templates"
            copy_format_string = ""
        "#;

        let settings = Settings::load_from_str(toml);
        assert_eq!(settings.uid_key, "id");
        assert!(!settings.auto_generate_uid);
        assert_eq!(settings.auto_generation_scope, Scope::Vault);
        assert!(settings.auto_generation_exclusions.is_empty());
        assert_eq!(settings.copy_format_string, DEFAULT_COPY_FORMAT);
    }

    #[test]
    fn test_unparseable_file_yields_defaults() {
        let _guard = EnvGuard::new(ENV_VARS);

        let settings = Settings::load_from_str("this is = = not toml [");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_uid_key_normalization() {
        assert_eq!(normalize_uid_key("  my id "), "myid");
        assert_eq!(normalize_uid_key("note\tid"), "noteid");
        assert_eq!(normalize_uid_key("   "), "uid");
        assert_eq!(normalize_uid_key(""), "uid");
    }

    #[test]
    fn test_exclusions_deduplicated() {
        let mut settings = Settings {
            auto_generation_exclusions: vec![
                "a/".to_string(),
                "/a".to_string(),
                "".to_string(),
                "b".to_string(),
            ],
            ..Settings::default()
        };
        settings.normalize();
        assert_eq!(
            settings.auto_generation_exclusions,
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn test_set_entry_point() {
        let mut settings = Settings::default();

        settings.set("uid_key", " note id ").unwrap();
        assert_eq!(settings.uid_key, "noteid");

        settings.set("auto_generate_uid", "true").unwrap();
        assert!(settings.auto_generate_uid);
        assert!(settings.set("auto_generate_uid", "maybe").is_err());

        settings.set("auto_generation_scope", "Folder").unwrap();
        assert_eq!(settings.auto_generation_scope, Scope::Folder);

        settings
            .set("auto_generation_exclusions", "a/, /b,,a")
            .unwrap();
        assert_eq!(
            settings.auto_generation_exclusions,
            vec!["a".to_string(), "b".to_string()]
        );

        settings.set("copy_format_string", "").unwrap();
        assert_eq!(settings.copy_format_string, DEFAULT_COPY_FORMAT);

        assert!(settings.set("colour", "blue").is_err());
    }

    #[test]
    fn test_add_and_remove_exclusion() {
        let mut settings = Settings::default();
        assert!(settings.add_exclusion("templates/"));
        assert!(!settings.add_exclusion("/templates"));
        assert!(!settings.add_exclusion("/"));
        assert_eq!(settings.auto_generation_exclusions, vec!["templates"]);

        assert!(settings.remove_exclusion("templates"));
        assert!(!settings.remove_exclusion("templates"));
        assert!(settings.auto_generation_exclusions.is_empty());
    }

    #[test]
    fn test_env_override_uid_key() {
        let _guard = EnvGuard::new(ENV_VARS);

        env::set_var("UIDMARK_UID_KEY", "zettel id");
        let settings = Settings::load_from_str("uid_key = \"id\"");
        assert_eq!(settings.uid_key, "zettelid");
    }

    #[test]
    fn test_env_override_auto_generate() {
        let _guard = EnvGuard::new(ENV_VARS);

        env::set_var("UIDMARK_AUTO_GENERATE", "1");
        assert!(Settings::load_from_str("").auto_generate_uid);

        env::set_var("UIDMARK_AUTO_GENERATE", "false");
        assert!(!Settings::load_from_str("auto_generate_uid = true").auto_generate_uid);
    }

    #[test]
    fn test_save_and_reload() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();

        let path = Settings::settings_file_path(temp_dir.path());
        assert!(path.ends_with(".uidmark/settings.toml"));

        let mut settings = Settings::default();
        settings.uid_key = "id".to_string();
        settings.add_exclusion("archive");
        settings.save_to_path(&path).unwrap();

        let loaded = Settings::load(temp_dir.path()).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let _guard = EnvGuard::new(ENV_VARS);

        let settings = Settings::load_from_path(Path::new("/nonexistent/settings.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }
}

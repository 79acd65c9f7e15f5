//! CLI command handlers

pub mod bulk;
pub mod config;
pub mod copy;
pub mod exclusions;
pub mod uid;
pub mod watch;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::debug;

use uidmark_core::{FsVault, Settings, UidService};

use crate::prompt::ConsoleNotifier;
use crate::watcher::expand_home;

/// Environment variable naming the vault directory
const VAULT_ENV: &str = "UIDMARK_VAULT";

/// Where the vault and its settings live for this invocation
pub struct Workspace {
    pub vault_dir: PathBuf,
    pub settings_path: PathBuf,
    quiet: bool,
}

impl Workspace {
    /// Resolve the vault from `--vault`, then UIDMARK_VAULT, then the cwd
    ///
    /// The settings file comes from `--config`, then UIDMARK_CONFIG, then
    /// `<vault>/.uidmark/settings.toml`.
    pub fn resolve(vault: Option<PathBuf>, config: Option<PathBuf>, quiet: bool) -> Result<Self> {
        let requested = match vault {
            Some(path) => path,
            None => match std::env::var(VAULT_ENV) {
                Ok(path) if !path.is_empty() => PathBuf::from(path),
                _ => std::env::current_dir().context("Failed to read current directory")?,
            },
        };

        let requested = expand_home(&requested);
        if !requested.is_dir() {
            bail!("Vault directory not found: {}", requested.display());
        }
        let vault_dir = requested
            .canonicalize()
            .with_context(|| format!("Failed to resolve vault path {:?}", requested))?;

        let settings_path = match config {
            Some(path) => expand_home(&path),
            None => Settings::settings_file_path(&vault_dir),
        };

        debug!(
            "Using vault {:?} with settings {:?}",
            vault_dir, settings_path
        );

        Ok(Self {
            vault_dir,
            settings_path,
            quiet,
        })
    }

    pub fn load_settings(&self) -> Result<Settings> {
        Settings::load_from_path(&self.settings_path).context("Failed to load settings")
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        settings
            .save_to_path(&self.settings_path)
            .context("Failed to save settings")
    }

    /// Build a service over the filesystem vault with the current settings
    pub fn service(&self) -> Result<UidService> {
        Ok(UidService::new(
            Box::new(FsVault::new(&self.vault_dir)),
            Box::new(ConsoleNotifier::new(self.quiet)),
            self.load_settings()?,
        ))
    }

    /// Turn a note argument into a vault-relative path
    ///
    /// Absolute paths must lie inside the vault. Relative paths are taken
    /// relative to the vault root.
    pub fn note_path(&self, arg: &str) -> Result<String> {
        let path = Path::new(arg);
        if path.is_absolute() {
            let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
            return FsVault::new(&self.vault_dir)
                .relative(&canonical)
                .with_context(|| format!("{} is outside the vault", arg));
        }
        Ok(arg.trim_start_matches("./").to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_explicit_vault() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("custom.toml");

        let workspace =
            Workspace::resolve(Some(dir.path().to_path_buf()), Some(config.clone()), true)
                .unwrap();

        assert_eq!(workspace.vault_dir, dir.path().canonicalize().unwrap());
        assert_eq!(workspace.settings_path, config);
    }

    #[test]
    fn test_resolve_missing_vault() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(Workspace::resolve(Some(missing), None, true).is_err());
    }

    #[test]
    fn test_note_path() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.md"), "").unwrap();
        let workspace = Workspace::resolve(
            Some(dir.path().to_path_buf()),
            Some(dir.path().join("s.toml")),
            true,
        )
        .unwrap();

        assert_eq!(workspace.note_path("./notes/b.md").unwrap(), "notes/b.md");
        assert_eq!(workspace.note_path("a.md").unwrap(), "a.md");
        assert_eq!(
            workspace
                .note_path(dir.path().join("a.md").to_str().unwrap())
                .unwrap(),
            "a.md"
        );
        assert!(workspace.note_path("/definitely/elsewhere.md").is_err());
    }
}

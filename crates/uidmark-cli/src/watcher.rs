//! Vault file watcher
//!
//! Forwards creations and modifications of markdown notes, plus changes to the
//! settings file, over a channel. Events arrive from the `notify` thread and
//! are consumed sequentially by the caller.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use crossbeam_channel::{bounded, Receiver, Sender};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEvent {
    /// A markdown note was created or modified
    Note(PathBuf),
    /// The settings file changed
    Settings,
}

pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    pub receiver: Receiver<FileEvent>,
}

impl FileWatcher {
    pub fn new(vault_dir: &Path, settings_path: &Path) -> Result<Self> {
        let (tx, rx) = bounded::<FileEvent>(256);
        let watcher = create_watcher(tx, &expand_home(vault_dir), settings_path)?;

        Ok(FileWatcher {
            _watcher: watcher,
            receiver: rx,
        })
    }
}

fn create_watcher(
    tx: Sender<FileEvent>,
    vault_dir: &Path,
    settings_path: &Path,
) -> Result<RecommendedWatcher> {
    let root = vault_dir.to_path_buf();
    let settings = settings_path.to_path_buf();
    let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
        match res {
            Ok(event) => {
                for file_event in classify(&event, &root, &settings) {
                    let _ = tx.send(file_event);
                }
            }
            Err(e) => warn!("Watch error: {:?}", e),
        }
    })
    .context("Failed to create file watcher")?;

    watcher
        .watch(vault_dir, RecursiveMode::Recursive)
        .with_context(|| format!("Failed to watch {:?}", vault_dir))?;

    // A settings file kept outside the vault needs its own watch
    if !settings_path.starts_with(vault_dir) {
        if let Some(parent) = settings_path.parent().filter(|p| p.is_dir()) {
            watcher
                .watch(parent, RecursiveMode::NonRecursive)
                .with_context(|| format!("Failed to watch {:?}", parent))?;
        }
    }

    Ok(watcher)
}

/// Turn a raw event into the events we care about
fn classify(event: &Event, vault_dir: &Path, settings_path: &Path) -> Vec<FileEvent> {
    if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
        return Vec::new();
    }

    event
        .paths
        .iter()
        .filter_map(|path| {
            if path == settings_path {
                Some(FileEvent::Settings)
            } else if is_visible_markdown(path.strip_prefix(vault_dir).ok()?) {
                Some(FileEvent::Note(path.clone()))
            } else {
                None
            }
        })
        .collect()
}

/// Markdown file that is not hidden and not inside a hidden directory
fn is_visible_markdown(relative: &Path) -> bool {
    let is_markdown = relative.extension().is_some_and(|ext| ext == "md");
    let hidden = relative
        .components()
        .any(|c| c.as_os_str().to_string_lossy().starts_with('.'));
    is_markdown && !hidden
}

/// Expand a leading `~/` to the home directory
pub fn expand_home(path: &Path) -> PathBuf {
    let text = path.to_string_lossy();
    if let Some(rest) = text.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind, RemoveKind};

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    fn vault() -> &'static Path {
        Path::new("/vault")
    }

    #[test]
    fn test_classify_markdown_changes() {
        let settings = Path::new("/vault/.uidmark/settings.toml");

        assert_eq!(
            classify(
                &event(EventKind::Create(CreateKind::File), "/vault/a.md"),
                vault(),
                settings
            ),
            vec![FileEvent::Note(PathBuf::from("/vault/a.md"))]
        );
        assert_eq!(
            classify(
                &event(EventKind::Modify(ModifyKind::Any), "/vault/notes/b.md"),
                vault(),
                settings
            )
            .len(),
            1
        );
    }

    #[test]
    fn test_classify_ignores_noise() {
        let settings = Path::new("/vault/.uidmark/settings.toml");

        for (kind, path) in [
            (EventKind::Remove(RemoveKind::File), "/vault/a.md"),
            (EventKind::Create(CreateKind::File), "/vault/a.txt"),
            (EventKind::Create(CreateKind::File), "/vault/.a.md.uidmark.tmp"),
            (EventKind::Modify(ModifyKind::Any), "/vault/.obsidian/x.md"),
            (EventKind::Create(CreateKind::File), "/elsewhere/a.md"),
        ] {
            assert!(
                classify(&event(kind, path), vault(), settings).is_empty(),
                "{}",
                path
            );
        }
    }

    #[test]
    fn test_classify_settings_change() {
        let settings = Path::new("/vault/.uidmark/settings.toml");
        assert_eq!(
            classify(
                &event(
                    EventKind::Modify(ModifyKind::Any),
                    "/vault/.uidmark/settings.toml"
                ),
                vault(),
                settings
            ),
            vec![FileEvent::Settings]
        );
    }

    #[test]
    fn test_hidden_vault_parent_is_allowed() {
        let root = Path::new("/home/me/.notes/vault");
        let settings = Path::new("/home/me/.notes/vault/.uidmark/settings.toml");
        assert_eq!(
            classify(
                &event(
                    EventKind::Create(CreateKind::File),
                    "/home/me/.notes/vault/a.md"
                ),
                root,
                settings
            )
            .len(),
            1
        );
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home(Path::new("/abs/path")), PathBuf::from("/abs/path"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home(Path::new("~/vault")), home.join("vault"));
        }
    }
}

//! Filesystem vault
//!
//! A directory tree of markdown notes. Edits use atomic writes (write to a
//! hidden temp file next to the note, then rename) so a note is never left
//! partially written.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use super::frontmatter;
use super::{Document, Entry, Frontmatter, Vault};
use crate::error::{VaultError, VaultResult};
use crate::path::{normalize_path, stays_inside};

/// Vault backed by a directory on disk
#[derive(Debug, Clone)]
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Absolute path of a vault-relative path
    pub fn absolute(&self, path: &str) -> PathBuf {
        normalize_path(path)
            .split('/')
            .filter(|s| !s.is_empty())
            .fold(self.root.clone(), |acc, segment| acc.join(segment))
    }

    /// Vault-relative path of an absolute path inside the vault
    pub fn relative(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let joined = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        Some(normalize_path(&joined))
    }

    fn read_note(&self, document: &Document) -> VaultResult<(PathBuf, String)> {
        let path = self.absolute(document.path());
        if !stays_inside(&normalize_path(document.path())) {
            return Err(VaultError::NotFound { path });
        }
        let content =
            fs::read_to_string(&path).map_err(|e| VaultError::from_io(e, path.clone(), false))?;
        Ok((path, content))
    }
}

impl Vault for FsVault {
    fn list_documents(&self, extension: &str) -> VaultResult<Vec<Document>> {
        if !self.root.is_dir() {
            return Err(VaultError::NotFound {
                path: self.root.clone(),
            });
        }

        let mut documents = Vec::new();
        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) if e.depth() == 0 => {
                    return Err(VaultError::Walk {
                        path: self.root.clone(),
                        details: e.to_string(),
                    });
                }
                Err(e) => {
                    warn!("Skipping unreadable vault entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.path().extension().and_then(|s| s.to_str()) != Some(extension) {
                continue;
            }
            if let Some(rel) = self.relative(entry.path()) {
                documents.push(Document::new(&rel));
            }
        }

        documents.sort();
        debug!("Listed {} .{} documents", documents.len(), extension);
        Ok(documents)
    }

    fn frontmatter(&self, document: &Document) -> VaultResult<Option<Frontmatter>> {
        let (path, content) = self.read_note(document)?;
        match frontmatter::split(&content).0 {
            Some(yaml) => frontmatter::parse(yaml)
                .map(Some)
                .map_err(|details| VaultError::InvalidFrontmatter { path, details }),
            None => Ok(None),
        }
    }

    fn edit_frontmatter(
        &self,
        document: &Document,
        edit: &mut dyn FnMut(&mut Frontmatter) -> bool,
    ) -> VaultResult<bool> {
        let (path, content) = self.read_note(document)?;
        let (yaml, body) = frontmatter::split(&content);

        let mut mapping = match yaml {
            Some(yaml) => frontmatter::parse(yaml).map_err(|details| {
                VaultError::InvalidFrontmatter {
                    path: path.clone(),
                    details,
                }
            })?,
            None => Frontmatter::new(),
        };

        if !edit(&mut mapping) {
            return Ok(false);
        }

        let updated = frontmatter::compose(&mapping, body).map_err(|details| {
            VaultError::InvalidFrontmatter {
                path: path.clone(),
                details,
            }
        })?;
        atomic_write(&path, updated.as_bytes())?;
        debug!("Committed front matter edit to {}", document.path());
        Ok(true)
    }

    fn resolve(&self, path: &str) -> VaultResult<Option<Entry>> {
        let normalized = normalize_path(path);
        if !stays_inside(&normalized) {
            debug!("Refusing to resolve {} outside the vault", path);
            return Ok(None);
        }
        let absolute = self.absolute(&normalized);
        let metadata = match fs::metadata(&absolute) {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(VaultError::from_io(e, absolute, false)),
        };

        if metadata.is_dir() {
            Ok(Some(Entry::Folder(normalized)))
        } else if metadata.is_file() {
            Ok(Some(Entry::Document(Document::new(&normalized))))
        } else {
            Ok(None)
        }
    }
}

/// Atomically replace `path` with `data`
///
/// Writes a hidden sibling temp file, syncs it, then renames it over the
/// target. Creates the parent directory if needed.
pub(crate) fn atomic_write(path: &Path, data: &[u8]) -> VaultResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| VaultError::from_io(e, parent.into(), true))?;
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_path = path.with_file_name(format!(".{}.uidmark.tmp", file_name));

    let mut file =
        File::create(&temp_path).map_err(|e| VaultError::from_io(e, temp_path.clone(), true))?;
    file.write_all(data)
        .map_err(|e| VaultError::from_io(e, temp_path.clone(), true))?;
    file.sync_all()
        .map_err(|e| VaultError::from_io(e, temp_path.clone(), true))?;

    if let Err(source) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(VaultError::AtomicWriteFailed {
            from: temp_path,
            to: path.to_path_buf(),
            source,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Value;
    use tempfile::TempDir;

    fn write(dir: &TempDir, rel: &str, content: &str) {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn read(dir: &TempDir, rel: &str) -> String {
        fs::read_to_string(dir.path().join(rel)).unwrap()
    }

    #[test]
    fn test_list_documents_skips_hidden_and_other_extensions() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.md", "a");
        write(&dir, "notes/b.md", "b");
        write(&dir, "notes/deep/c.md", "c");
        write(&dir, "notes/image.png", "png");
        write(&dir, ".obsidian/workspace.md", "hidden");
        write(&dir, ".uidmark/settings.toml", "");

        let vault = FsVault::new(dir.path());
        let docs = vault.list_documents("md").unwrap();
        let paths: Vec<&str> = docs.iter().map(|d| d.path()).collect();
        assert_eq!(paths, vec!["a.md", "notes/b.md", "notes/deep/c.md"]);
    }

    #[test]
    fn test_list_documents_missing_root() {
        let vault = FsVault::new("/nonexistent/uidmark/vault");
        assert!(matches!(
            vault.list_documents("md"),
            Err(VaultError::NotFound { .. })
        ));
    }

    #[test]
    fn test_frontmatter_read() {
        let dir = TempDir::new().unwrap();
        write(&dir, "with.md", "---\nuid: abc\n---\nbody\n");
        write(&dir, "without.md", "body only\n");
        write(&dir, "broken.md", "---\n- just\n- a list\n---\n");

        let vault = FsVault::new(dir.path());
        let fm = vault.frontmatter(&Document::new("with.md")).unwrap().unwrap();
        assert_eq!(fm.get("uid"), Some(&Value::from("abc")));
        assert!(vault
            .frontmatter(&Document::new("without.md"))
            .unwrap()
            .is_none());
        assert!(matches!(
            vault.frontmatter(&Document::new("broken.md")),
            Err(VaultError::InvalidFrontmatter { .. })
        ));
        assert!(matches!(
            vault.frontmatter(&Document::new("missing.md")),
            Err(VaultError::NotFound { .. })
        ));
    }

    #[test]
    fn test_edit_adds_block_and_preserves_body() {
        let dir = TempDir::new().unwrap();
        let body = "# Title\n\nSome *markdown* body.\n---\nnot front matter\n";
        write(&dir, "note.md", body);

        let vault = FsVault::new(dir.path());
        let committed = vault
            .edit_frontmatter(&Document::new("note.md"), &mut |fm| {
                fm.insert(Value::from("uid"), Value::from("abc"));
                true
            })
            .unwrap();

        assert!(committed);
        assert_eq!(read(&dir, "note.md"), format!("---\nuid: abc\n---\n{}", body));
    }

    #[test]
    fn test_edit_declined_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let original = "---\ntitle:   spaced   \n---\nbody\n";
        write(&dir, "note.md", original);

        let vault = FsVault::new(dir.path());
        let committed = vault
            .edit_frontmatter(&Document::new("note.md"), &mut |_| false)
            .unwrap();

        assert!(!committed);
        assert_eq!(read(&dir, "note.md"), original);
    }

    #[test]
    fn test_edit_removing_last_key_drops_block() {
        let dir = TempDir::new().unwrap();
        write(&dir, "note.md", "---\nuid: abc\n---\nbody\n");

        let vault = FsVault::new(dir.path());
        vault
            .edit_frontmatter(&Document::new("note.md"), &mut |fm| {
                fm.shift_remove("uid").is_some()
            })
            .unwrap();

        assert_eq!(read(&dir, "note.md"), "body\n");
    }

    #[test]
    fn test_edit_invalid_frontmatter_leaves_file() {
        let dir = TempDir::new().unwrap();
        let original = "---\nkey: [unclosed\n---\nbody\n";
        write(&dir, "note.md", original);

        let vault = FsVault::new(dir.path());
        let result = vault.edit_frontmatter(&Document::new("note.md"), &mut |_| true);

        assert!(matches!(result, Err(VaultError::InvalidFrontmatter { .. })));
        assert_eq!(read(&dir, "note.md"), original);
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("sub").join("note.md");
        atomic_write(&target, b"hello").unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "hello");
        let leftovers: Vec<_> = fs::read_dir(target.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_resolve() {
        let dir = TempDir::new().unwrap();
        write(&dir, "notes/a.md", "a");

        let vault = FsVault::new(dir.path());
        assert_eq!(
            vault.resolve("notes").unwrap(),
            Some(Entry::Folder("notes".to_string()))
        );
        assert_eq!(
            vault.resolve("/notes/a.md").unwrap(),
            Some(Entry::Document(Document::new("notes/a.md")))
        );
        assert_eq!(
            vault.resolve("/").unwrap(),
            Some(Entry::Folder(String::new()))
        );
        assert_eq!(vault.resolve("nope").unwrap(), None);
    }

    #[test]
    fn test_paths_outside_vault_are_never_touched() {
        let dir = TempDir::new().unwrap();
        write(&dir, "vault/inside.md", "inside\n");
        write(&dir, "secret.md", "outside\n");

        let vault = FsVault::new(dir.path().join("vault"));
        assert_eq!(vault.resolve("../secret.md").unwrap(), None);
        assert_eq!(vault.resolve("notes/../../secret.md").unwrap(), None);
        assert_eq!(vault.resolve("..").unwrap(), None);

        let escaping = Document::new("../secret.md");
        let result = vault.edit_frontmatter(&escaping, &mut |fm| {
            fm.insert(Value::from("uid"), Value::from("x"));
            true
        });
        assert!(matches!(result, Err(VaultError::NotFound { .. })));
        assert!(vault.frontmatter(&escaping).is_err());
        assert_eq!(read(&dir, "secret.md"), "outside\n");
    }

    #[test]
    fn test_relative_and_absolute() {
        let vault = FsVault::new("/vault");
        assert_eq!(vault.absolute("notes/a.md"), PathBuf::from("/vault/notes/a.md"));
        assert_eq!(
            vault.relative(Path::new("/vault/notes/a.md")),
            Some("notes/a.md".to_string())
        );
        assert_eq!(vault.relative(Path::new("/elsewhere/a.md")), None);
    }
}

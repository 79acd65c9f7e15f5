//! Vault-relative path helpers
//!
//! All paths handled by the core are relative to the vault root, use `/` as
//! the separator, and carry no leading or trailing slash. The root itself is
//! the empty string.

/// Normalize a user- or host-supplied path
pub fn normalize_path(path: &str) -> String {
    let cleaned = path.replace('\\', "/").replace('\u{00A0}', " ");
    cleaned
        .trim()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// True if a normalized path has no `.` or `..` segments
///
/// Such paths could point outside the vault and are never resolved.
pub fn stays_inside(path: &str) -> bool {
    path.split('/').all(|segment| segment != "." && segment != "..")
}

/// True if `path` is `folder` itself or lies anywhere beneath it
///
/// Both arguments must already be normalized. Every path is under the root.
pub fn is_under(path: &str, folder: &str) -> bool {
    if folder.is_empty() {
        return true;
    }
    path == folder
        || path
            .strip_prefix(folder)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Immediate parent of a normalized path (`""` for top-level entries)
pub fn parent_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Last path segment
pub fn file_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// File name without its extension
pub fn file_stem(path: &str) -> &str {
    let name = file_name(path);
    match name.rfind('.') {
        Some(0) | None => name,
        Some(idx) => &name[..idx],
    }
}

/// Extension of the last segment, without the dot
pub fn extension(path: &str) -> Option<&str> {
    let name = file_name(path);
    match name.rfind('.') {
        Some(0) | None => None,
        Some(idx) => Some(&name[idx + 1..]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stays_inside() {
        assert!(stays_inside(""));
        assert!(stays_inside("notes/a.md"));
        assert!(stays_inside("notes/..hidden.md"));
        assert!(!stays_inside(".."));
        assert!(!stays_inside("../secret.md"));
        assert!(!stays_inside("notes/../../secret.md"));
        assert!(!stays_inside("./a.md"));
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("notes/inbox"), "notes/inbox");
        assert_eq!(normalize_path("/notes//inbox/"), "notes/inbox");
        assert_eq!(normalize_path("notes\\inbox\\a.md"), "notes/inbox/a.md");
        assert_eq!(normalize_path("  notes/inbox  "), "notes/inbox");
        assert_eq!(normalize_path("my\u{00A0}notes"), "my notes");
        assert_eq!(normalize_path("/"), "");
        assert_eq!(normalize_path(""), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for p in ["a//b/", "\\x\\y", " /z/ ", "plain.md"] {
            let once = normalize_path(p);
            assert_eq!(normalize_path(&once), once);
        }
    }

    #[test]
    fn test_is_under() {
        assert!(is_under("notes/inbox/a.md", "notes/inbox"));
        assert!(is_under("notes/inbox/deep/a.md", "notes"));
        assert!(is_under("notes/inbox", "notes/inbox"));
        assert!(!is_under("notes/inbox2/a.md", "notes/inbox"));
        assert!(!is_under("other/a.md", "notes"));
        assert!(is_under("anything.md", ""));
    }

    #[test]
    fn test_parent_and_names() {
        assert_eq!(parent_of("notes/inbox/a.md"), "notes/inbox");
        assert_eq!(parent_of("a.md"), "");
        assert_eq!(file_name("notes/a.md"), "a.md");
        assert_eq!(file_stem("notes/My Note.md"), "My Note");
        assert_eq!(file_stem("notes/archive.tar.md"), "archive.tar");
        assert_eq!(file_stem(".hidden"), ".hidden");
        assert_eq!(extension("notes/a.md"), Some("md"));
        assert_eq!(extension("notes/README"), None);
        assert_eq!(extension(".gitignore"), None);
    }
}

//! Storage collaborator
//!
//! The core never touches files directly. Everything it needs from the host
//! (listing notes, reading front matter, editing front matter atomically, and
//! resolving a path) goes through the [`Vault`] trait.
//!
//! - `fs`: markdown files with YAML front matter in a directory tree
//! - `memory`: in-memory notes, for tests and embedding
//! - `frontmatter`: splitting and re-assembling the front matter block

pub mod frontmatter;
pub mod fs;
pub mod memory;

pub use fs::FsVault;
pub use memory::MemoryVault;

use crate::error::VaultResult;
use crate::path::{extension, file_stem, normalize_path, parent_of};

/// Parsed front matter of a note
pub type Frontmatter = serde_yaml::Mapping;

/// Extension of notes eligible for UIDs
pub const MARKDOWN_EXTENSION: &str = "md";

/// A note in the vault, identified by its normalized vault-relative path
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Document {
    path: String,
}

impl Document {
    pub fn new(path: &str) -> Self {
        Self {
            path: normalize_path(path),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Display title: the file name without its extension
    pub fn title(&self) -> &str {
        file_stem(&self.path)
    }

    pub fn extension(&self) -> Option<&str> {
        extension(&self.path)
    }

    /// Path of the containing folder (`""` for the vault root)
    pub fn parent(&self) -> &str {
        parent_of(&self.path)
    }

    pub fn is_markdown(&self) -> bool {
        self.extension() == Some(MARKDOWN_EXTENSION)
    }
}

/// What a path resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Document(Document),
    /// A folder, by normalized path (`""` is the vault root)
    Folder(String),
}

/// Access to notes and their front matter
pub trait Vault {
    /// All documents with the given extension
    fn list_documents(&self, extension: &str) -> VaultResult<Vec<Document>>;

    /// Front matter of a document, `None` if it has none
    fn frontmatter(&self, document: &Document) -> VaultResult<Option<Frontmatter>>;

    /// Run `edit` against the document's front matter as one atomic edit
    ///
    /// `edit` receives the current mapping (empty if the note has none) and
    /// returns whether it changed anything. The edit is committed only when it
    /// returns true; either the whole mutation is persisted or none of it is.
    /// Returns whether a commit happened.
    fn edit_frontmatter(
        &self,
        document: &Document,
        edit: &mut dyn FnMut(&mut Frontmatter) -> bool,
    ) -> VaultResult<bool>;

    /// Resolve a vault-relative path
    fn resolve(&self, path: &str) -> VaultResult<Option<Entry>>;
}

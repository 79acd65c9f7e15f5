//! Error types
//!
//! `VaultError` covers failures of the storage collaborator. `UidError` covers
//! the "not found / not eligible" class of failures that abort a command with no
//! side effect, plus storage failures bubbled up from a vault.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or editing notes in a vault
#[derive(Error, Debug)]
pub enum VaultError {
    /// Permission denied accessing path
    #[error("Permission denied: cannot access '{path}'. Check file permissions.")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// File not found (when expected to exist)
    #[error("File not found: '{path}'")]
    NotFound { path: PathBuf },

    /// Failed to read file
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write file
    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Atomic write failed during rename
    #[error("Atomic write failed: could not rename '{from}' to '{to}': {source}")]
    AtomicWriteFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Front matter exists but is not a YAML mapping
    #[error("Invalid front matter in '{path}': {details}")]
    InvalidFrontmatter { path: PathBuf, details: String },

    /// Failure injected by an in-memory vault
    #[error("Storage failure for '{path}': {details}")]
    Injected { path: String, details: String },

    /// Failed to walk the vault directory tree
    #[error("Failed to list notes under '{path}': {details}")]
    Walk { path: PathBuf, details: String },
}

impl VaultError {
    /// Create an error from an I/O error with path context
    ///
    /// Classifies the error based on its kind. `writing` selects between the
    /// read and write variants for everything that is not specially handled.
    pub fn from_io(error: io::Error, path: PathBuf, writing: bool) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => VaultError::PermissionDenied {
                path,
                source: error,
            },
            io::ErrorKind::NotFound => VaultError::NotFound { path },
            _ if writing => VaultError::Write {
                path,
                source: error,
            },
            _ => VaultError::Read {
                path,
                source: error,
            },
        }
    }

    /// Check if retrying after user action could succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            VaultError::PermissionDenied { .. } | VaultError::InvalidFrontmatter { .. }
        )
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            VaultError::PermissionDenied { .. } => {
                Some("Check file and directory permissions of the vault.")
            }
            VaultError::InvalidFrontmatter { .. } => {
                Some("Fix the YAML between the leading '---' lines of the note and try again.")
            }
            _ => None,
        }
    }
}

/// Result type for vault operations
pub type VaultResult<T> = Result<T, VaultError>;

/// Errors returned by UID commands
#[derive(Error, Debug)]
pub enum UidError {
    #[error("No note found at '{0}'")]
    NoteNotFound(String),

    #[error("'{0}' is not a markdown note")]
    NotMarkdown(String),

    #[error("Folder path empty")]
    EmptyFolderPath,

    #[error("Folder not found or path is not a folder: {0}")]
    FolderNotFound(String),

    #[error("No {key} found on {title}")]
    MissingUid { key: String, title: String },

    #[error("No markdown notes found in selection")]
    EmptySelection,

    #[error(transparent)]
    Vault(#[from] VaultError),
}

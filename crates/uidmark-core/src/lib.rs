//! uidmark Core Library
//!
//! This crate manages unique identifiers stored in the YAML front matter of
//! markdown notes: assigning, reading, removing and copying them, plus bulk
//! reconciliation and automatic assignment on note creation.
//!
//! # Architecture
//!
//! - **Vault**: storage collaborator; the core only sees front matter
//! - **Notifier**: user-facing notices, separate from logging
//!
//! Every write goes through one atomic front matter edit.
//!
//! # Quick Start
//!
//! ```text
//! let settings = Settings::load(vault_dir)?;
//! let service = UidService::new(
//!     Box::new(FsVault::new(vault_dir)),
//!     Box::new(TracingNotifier),
//!     settings,
//! );
//!
//! service.create_if_missing("inbox/Idea.md")?;
//! let report = service.add_missing_in_scope().await?;
//! ```
//!
//! # Modules
//!
//! - `service`: Command facade (main entry point)
//! - `accessor`: Reading and writing the UID field
//! - `reconcile`: Bulk scans and the automatic trigger
//! - `scope`: Auto-generation eligibility
//! - `format`: Copy templates
//! - `vault`: Storage trait and implementations
//! - `settings`: Persisted settings

pub mod accessor;
pub mod debounce;
pub mod error;
pub mod format;
pub mod identifier;
pub mod notice;
pub mod path;
pub mod reconcile;
pub mod scope;
pub mod service;
pub mod settings;
pub mod vault;

pub use accessor::UidAccessor;
pub use error::{UidError, VaultError, VaultResult};
pub use notice::{Notifier, RecordingNotifier, TracingNotifier};
pub use reconcile::{AutoOutcome, ClearReport, ScanReport};
pub use service::{RemoveOutcome, SetOutcome, UidInfo, UidService};
pub use settings::{Scope, Settings};
pub use vault::{Document, Entry, Frontmatter, FsVault, MemoryVault, Vault};

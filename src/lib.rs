//! gpg-notes-index - a searchable line index over individually encrypted notes
//!
//! This library maintains a single combined, line-level plaintext index
//! (itself stored encrypted) over a tree of GPG-encrypted note files,
//! without re-decrypting every file on every run. It supports:
//!
//! - Fingerprint-based change detection: unchanged files reuse their prior
//!   index entries verbatim and are never decrypted again
//! - Whole-file and inline-block decryption (armored blocks embedded in an
//!   otherwise plaintext carrier file)
//! - Three equivalent invocation surfaces sharing one merge core: full
//!   rescan, single-file update, explicit file-list update
//! - Pluggable crypto: the merge engine only sees the [`Crypto`] trait, so
//!   tests run against an in-memory fake while production uses the `gpg`
//!   subprocess adapter
//!
//! # Example
//!
//! ```no_run
//! use gpg_notes_index::{GpgCrypto, NoteIndexer};
//!
//! let indexer = NoteIndexer::new("/home/alice/notes", "/home/alice/.notes-index.gpg", GpgCrypto);
//! let changed = indexer.update_all(&["alice@example.org".to_string()])?;
//! for path in &changed {
//!     println!("Updated: {}", path);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod crypto;
pub mod index_storage;
pub mod indexer;
pub mod models;
pub mod utils;

// Re-export commonly used types
pub use crypto::{Crypto, GpgCrypto};
pub use indexer::NoteIndexer;
pub use models::Entry;

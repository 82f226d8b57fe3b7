//! Incremental index building over a tree of encrypted notes.
//!
//! The pipeline: [`scanner`] enumerates candidate files, [`fingerprint`]
//! computes their change-detection key, and [`merge`] decides per file
//! whether to reuse the prior run's entries or hand the file to
//! [`decompose`] for fresh decryption. Decryption is the expensive,
//! externally delegated operation; the whole point of the fingerprint step
//! is to skip it whenever the encrypted bytes are provably unchanged.

pub mod decompose;
pub mod fingerprint;
pub mod merge;
pub mod scanner;

pub use merge::NoteIndexer;
pub use scanner::ENCRYPTED_SUFFIX;

//! Data model for the encrypted notes index.
//!
//! The only persisted structure is [`Entry`], one line of decrypted content
//! tagged with the fingerprint of its encrypted source file.

pub mod entry;

pub use entry::Entry;

//! Capability interface for all cryptographic operations.
//!
//! The merge engine never talks to a key ring or cipher directly; everything
//! goes through the [`Crypto`] trait injected at construction time. The
//! production implementation is [`GpgCrypto`], a thin adapter around the
//! `gpg` binary; tests substitute an in-memory fake with no shared process
//! state.

pub mod gpg;

use std::path::Path;

use anyhow::Result;

pub use gpg::GpgCrypto;

/// The five operations the indexer needs from an encryption backend.
///
/// "Cannot decrypt" is an expected condition for note files (wrong key
/// material, garbage input) and is reported as an `Err` the caller degrades
/// on, never a panic.
pub trait Crypto: Sync {
    /// True if the key store holds a usable key for `id`.
    fn identity_exists(&self, id: &str) -> bool;

    /// Cheap pre-check: does the content at `path` look like well-formed
    /// encrypted material that could be decrypted in principle?
    fn can_decrypt(&self, path: &Path) -> bool;

    /// Decrypt an entire file.
    fn decrypt_file(&self, path: &Path) -> Result<Vec<u8>>;

    /// Decrypt a single in-memory block, markers included.
    fn decrypt_block(&self, block: &[u8]) -> Result<Vec<u8>>;

    /// Encrypt `plaintext` to every identity in `recipients`.
    fn encrypt(&self, plaintext: &[u8], recipients: &[String]) -> Result<Vec<u8>>;
}

impl<T: Crypto + ?Sized> Crypto for &T {
    fn identity_exists(&self, id: &str) -> bool {
        (**self).identity_exists(id)
    }

    fn can_decrypt(&self, path: &Path) -> bool {
        (**self).can_decrypt(path)
    }

    fn decrypt_file(&self, path: &Path) -> Result<Vec<u8>> {
        (**self).decrypt_file(path)
    }

    fn decrypt_block(&self, block: &[u8]) -> Result<Vec<u8>> {
        (**self).decrypt_block(block)
    }

    fn encrypt(&self, plaintext: &[u8], recipients: &[String]) -> Result<Vec<u8>> {
        (**self).encrypt(plaintext, recipients)
    }
}

//! Shared test utilities: an in-memory crypto fake and a notes-tree builder
#![allow(dead_code)]

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Result, bail};
use gpg_notes_index::Crypto;
use tempfile::TempDir;

/// Header marking a fake whole-file "encryption".
pub const FAKE_HEADER: &str = "FAKE-ENCRYPTED-V1";

const BLOCK_BEGIN: &str = "-----BEGIN PGP MESSAGE-----";
const BLOCK_END: &str = "-----END PGP MESSAGE-----";

/// In-memory stand-in for the gpg adapter.
///
/// Whole-file ciphertext is the plaintext prefixed with [`FAKE_HEADER`];
/// inline block payloads between the armor markers are the plaintext
/// itself. A payload containing `FAIL-THIS-BLOCK` refuses to decrypt.
/// Every real decryption bumps `decrypt_calls`, so tests can prove that
/// fingerprint reuse skipped the decryptor.
pub struct MemoryCrypto {
    identities: HashSet<String>,
    decrypt_calls: AtomicUsize,
}

impl MemoryCrypto {
    pub fn with_identities(ids: &[&str]) -> Self {
        Self {
            identities: ids.iter().map(|s| s.to_string()).collect(),
            decrypt_calls: AtomicUsize::new(0),
        }
    }

    pub fn decrypt_count(&self) -> usize {
        self.decrypt_calls.load(Ordering::SeqCst)
    }
}

impl Crypto for MemoryCrypto {
    fn identity_exists(&self, id: &str) -> bool {
        self.identities.contains(id)
    }

    fn can_decrypt(&self, path: &Path) -> bool {
        let Ok(bytes) = fs::read(path) else {
            return false;
        };
        let text = String::from_utf8_lossy(&bytes);
        text.starts_with(FAKE_HEADER) || text.contains(BLOCK_BEGIN)
    }

    fn decrypt_file(&self, path: &Path) -> Result<Vec<u8>> {
        self.decrypt_calls.fetch_add(1, Ordering::SeqCst);
        let bytes = fs::read(path)?;
        let text = String::from_utf8_lossy(&bytes);
        match text.strip_prefix(&format!("{}\n", FAKE_HEADER)) {
            Some(plaintext) => Ok(plaintext.as_bytes().to_vec()),
            None => bail!("not fake-encrypted: {}", path.display()),
        }
    }

    fn decrypt_block(&self, block: &[u8]) -> Result<Vec<u8>> {
        self.decrypt_calls.fetch_add(1, Ordering::SeqCst);
        let text = std::str::from_utf8(block)?;
        let inner: Vec<&str> = text.lines().filter(|l| !l.starts_with("-----")).collect();
        if inner.iter().any(|l| l.contains("FAIL-THIS-BLOCK")) {
            bail!("block refuses to decrypt");
        }
        let mut out = inner.join("\n");
        out.push('\n');
        Ok(out.into_bytes())
    }

    fn encrypt(&self, plaintext: &[u8], recipients: &[String]) -> Result<Vec<u8>> {
        if recipients.is_empty() {
            bail!("no recipients");
        }
        let mut out = format!("{}\n", FAKE_HEADER).into_bytes();
        out.extend_from_slice(plaintext);
        Ok(out)
    }
}

/// Builder for a temp directory holding a notes tree and an index location.
///
/// The notes root lives at `<temp>/notes` and the index at
/// `<temp>/index.gpg`, outside the notes root so a rescan never picks the
/// index itself up as a note.
pub struct NotesDirBuilder {
    temp_dir: TempDir,
}

impl NotesDirBuilder {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir(temp_dir.path().join("notes")).expect("Failed to create notes dir");
        Self { temp_dir }
    }

    /// The notes root directory.
    pub fn root(&self) -> PathBuf {
        self.temp_dir.path().join("notes")
    }

    /// The index file location (may not exist yet).
    pub fn cache_file(&self) -> PathBuf {
        self.temp_dir.path().join("index.gpg")
    }

    /// Absolute path of a note by root-relative name.
    pub fn note_path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    /// Write a whole-file fake-encrypted note. Returns its absolute path.
    pub fn write_note(&self, rel: &str, plaintext: &str) -> PathBuf {
        let path = self.note_path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create note parent dir");
        }
        fs::write(&path, format!("{}\n{}", FAKE_HEADER, plaintext))
            .expect("Failed to write note");
        path
    }

    /// Write a carrier note with one inline fake-armored block per payload.
    /// Returns its absolute path.
    pub fn write_inline_note(&self, rel: &str, payloads: &[&str]) -> PathBuf {
        let path = self.note_path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create note parent dir");
        }
        let mut carrier = String::from("carrier preamble\n");
        for payload in payloads {
            carrier.push_str(BLOCK_BEGIN);
            carrier.push('\n');
            carrier.push_str(payload);
            if !payload.ends_with('\n') {
                carrier.push('\n');
            }
            carrier.push_str(BLOCK_END);
            carrier.push('\n');
            carrier.push_str("text between blocks\n");
        }
        fs::write(&path, carrier).expect("Failed to write inline note");
        path
    }

    /// Write raw bytes at a root-relative name (for undecryptable input).
    pub fn write_raw(&self, rel: &str, bytes: &[u8]) -> PathBuf {
        let path = self.note_path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create note parent dir");
        }
        fs::write(&path, bytes).expect("Failed to write file");
        path
    }

    /// Delete a note by root-relative name.
    pub fn remove_note(&self, rel: &str) {
        fs::remove_file(self.note_path(rel)).expect("Failed to remove note");
    }
}

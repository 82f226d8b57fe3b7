//! Incremental merge of the prior index with the current note tree.
//!
//! # Error Handling Strategy
//!
//! This module follows a **graceful degradation** approach suitable for CLI
//! tools: per-file problems (a path outside the notes directory, an
//! unreadable file, content that will not decrypt with the current key
//! material) are reported as stderr warnings and the affected file simply
//! contributes nothing this run. The run itself always completes and
//! reports the set of changed paths. The exception is recipient gating: a
//! requested recipient set that validates down to nothing aborts the whole
//! build before any index state is touched, because an index encrypted to
//! zero recipients is worse than no index update at all.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::Result;
use rayon::prelude::*;

use crate::crypto::Crypto;
use crate::index_storage::persistence;
use crate::indexer::{decompose, fingerprint, scanner};
use crate::models::Entry;
use crate::utils::relative_to_root;

/// Prior-run entries bucketed by relative path, built once per run so the
/// staleness check is a constant-time lookup instead of a scan over the
/// whole prior entry list.
struct PriorIndex {
    by_path: HashMap<String, Vec<Entry>>,
}

impl PriorIndex {
    fn build(entries: Vec<Entry>) -> Self {
        let mut by_path: HashMap<String, Vec<Entry>> = HashMap::new();
        for entry in entries {
            by_path.entry(entry.path.clone()).or_default().push(entry);
        }
        Self { by_path }
    }

    /// Prior entries for `path`, but only when the recorded size and hash
    /// both match: the witness that the encrypted bytes are unchanged. All
    /// entries of a file share one fingerprint, so the first entry speaks
    /// for the whole set.
    fn unchanged(&self, path: &str, size: u64, hash: &str) -> Option<&[Entry]> {
        let entries = self.by_path.get(path)?;
        let first = entries.first()?;
        (first.size == size && first.content_hash == hash).then_some(entries.as_slice())
    }

    fn entries_for(&self, path: &str) -> Option<&[Entry]> {
        self.by_path.get(path).map(Vec::as_slice)
    }

    fn paths(&self) -> impl Iterator<Item = &String> {
        self.by_path.keys()
    }
}

/// What one candidate file contributed to the run.
enum FileOutcome {
    /// Never resolved to an indexable path; not marked seen, so the prior
    /// state for whatever it was decides its fate during reconciliation.
    Skipped,
    /// Fingerprint matched the prior run; entries reused verbatim without
    /// touching the decryptor.
    Unchanged { path: String, entries: Vec<Entry> },
    /// New or modified content, freshly decrypted and decomposed.
    Updated { path: String, entries: Vec<Entry> },
    /// Seen but unverifiable with current key material. Contributes no
    /// entries; the prior entries are not reused either, because the
    /// content may have changed in a way that cannot be checked.
    Undecryptable { path: String },
}

/// Incremental indexer over a tree of individually encrypted notes.
///
/// All cryptographic operations go through the injected [`Crypto`]
/// implementation, so the merge logic is exercised entirely with an
/// in-memory fake in tests and only the thin adapter layer talks to the
/// real external tool.
///
/// # Examples
///
/// ```no_run
/// use gpg_notes_index::{GpgCrypto, NoteIndexer};
///
/// let indexer = NoteIndexer::new("/home/alice/notes", "/home/alice/.notes-index.gpg", GpgCrypto);
/// let changed = indexer.update_all(&["alice@example.org".to_string()])?;
/// println!("{} files changed", changed.len());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub struct NoteIndexer<C: Crypto> {
    notes_dir: PathBuf,
    cache_file: PathBuf,
    crypto: C,
}

impl<C: Crypto> NoteIndexer<C> {
    pub fn new(notes_dir: impl Into<PathBuf>, cache_file: impl Into<PathBuf>, crypto: C) -> Self {
        Self { notes_dir: notes_dir.into(), cache_file: cache_file.into(), crypto }
    }

    /// Full rescan of the notes directory.
    ///
    /// Returns the sorted set of root-relative paths that were added,
    /// modified or removed. An empty set means the on-disk index was left
    /// untouched.
    pub fn update_all(&self, recipients: &[String]) -> Result<Vec<String>> {
        let Some(valid) = self.validated_recipients(recipients) else {
            return Ok(Vec::new());
        };
        let files = scanner::find_encrypted_files(&self.notes_dir, scanner::ENCRYPTED_SUFFIX);
        self.merge(&files, &valid)
    }

    /// Update the index for one explicitly named file.
    pub fn update_file(&self, file: &Path, recipients: &[String]) -> Result<Vec<String>> {
        self.update_files(&[file.to_path_buf()], recipients)
    }

    /// Update the index for an explicit list of files.
    ///
    /// Paths in the prior index that are not named here are preserved
    /// unchanged as long as their files still exist on disk; this surface
    /// must never silently delete notes it was not told about.
    pub fn update_files(&self, files: &[PathBuf], recipients: &[String]) -> Result<Vec<String>> {
        let Some(valid) = self.validated_recipients(recipients) else {
            return Ok(Vec::new());
        };
        self.merge(files, &valid)
    }

    /// Filter requested identities down to those the key store confirms.
    /// `None` aborts the build: writing an index for nobody is worse than
    /// writing nothing.
    fn validated_recipients(&self, requested: &[String]) -> Option<Vec<String>> {
        let mut valid = Vec::new();
        for id in requested {
            if self.crypto.identity_exists(id) {
                valid.push(id.clone());
            } else {
                eprintln!("Skipping missing recipient: {}", id);
            }
        }
        if valid.is_empty() {
            eprintln!("No valid recipients found, skipping index build");
            return None;
        }
        Some(valid)
    }

    /// The shared merge core behind all three invocation surfaces.
    fn merge(&self, candidates: &[PathBuf], recipients: &[String]) -> Result<Vec<String>> {
        let prior = PriorIndex::build(persistence::load_index(&self.crypto, &self.cache_file));

        // Fingerprint and decrypt candidates in parallel. The prior index is
        // read-only during this phase; outcomes are reduced sequentially
        // below, and nothing is persisted until every candidate finished.
        let outcomes: Vec<FileOutcome> = candidates
            .par_iter()
            .map(|file| self.process_candidate(file, &prior))
            .collect();

        let mut entries = Vec::new();
        let mut seen = HashSet::new();
        let mut changed = BTreeSet::new();
        for outcome in outcomes {
            match outcome {
                FileOutcome::Skipped => {}
                FileOutcome::Unchanged { path, entries: reused } => {
                    seen.insert(path);
                    entries.extend(reused);
                }
                FileOutcome::Updated { path, entries: fresh } => {
                    changed.insert(path.clone());
                    seen.insert(path);
                    entries.extend(fresh);
                }
                FileOutcome::Undecryptable { path } => {
                    seen.insert(path);
                }
            }
        }

        // Prior paths no candidate covered: keep them while their files
        // still exist, drop them (and record the change) once they are gone.
        for path in prior.paths() {
            if seen.contains(path) {
                continue;
            }
            if self.notes_dir.join(path).exists() {
                if let Some(kept) = prior.entries_for(path) {
                    entries.extend_from_slice(kept);
                }
            } else {
                changed.insert(path.clone());
            }
        }

        if changed.is_empty() {
            return Ok(Vec::new());
        }
        persistence::save_index(&self.crypto, entries, &self.cache_file, recipients)?;
        Ok(changed.into_iter().collect())
    }

    fn process_candidate(&self, file: &Path, prior: &PriorIndex) -> FileOutcome {
        if !file.to_string_lossy().ends_with(scanner::ENCRYPTED_SUFFIX) {
            eprintln!("Skipping non-encrypted file: {}", file.display());
            return FileOutcome::Skipped;
        }

        let path = match relative_to_root(&self.notes_dir, file) {
            Ok(path) => path,
            Err(e) => {
                eprintln!("Skipping file: {}", e);
                return FileOutcome::Skipped;
            }
        };

        match std::fs::metadata(file) {
            Ok(meta) if meta.is_file() => {}
            _ => {
                eprintln!("Skipping missing or non-regular file: {}", file.display());
                return FileOutcome::Skipped;
            }
        }

        let (size, hash) = fingerprint::fingerprint(file);
        if hash.is_empty() {
            eprintln!("Skipping unreadable file: {}", file.display());
            return FileOutcome::Skipped;
        }

        if let Some(reused) = prior.unchanged(&path, size, &hash) {
            return FileOutcome::Unchanged { path, entries: reused.to_vec() };
        }

        if !self.crypto.can_decrypt(file) {
            eprintln!("Skipping undecryptable file: {}", file.display());
            return FileOutcome::Undecryptable { path };
        }

        let entries = decompose::decompose(&self.crypto, file, &path, size, &hash);
        FileOutcome::Updated { path, entries }
    }
}

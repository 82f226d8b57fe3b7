//! Encrypted index persistence: pipe-delimited codec with atomic writes.
//!
//! The serialized index is plaintext, one entry per line:
//!
//! ```text
//! path|lineNumber|size|contentHash|content
//! ```
//!
//! That plaintext is encrypted before it touches disk and decrypted before
//! parsing. Because `content` is the trailing field, a literal `|` inside it
//! survives a round-trip; a `|` inside a path would not. Paths come from the
//! file system scan, where that character is not expected.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail, ensure};

use crate::crypto::Crypto;
use crate::models::Entry;

const FIELD_COUNT: usize = 5;

/// Parse decrypted index text. Lines that do not split into 5 fields are
/// discarded; numeric fields that fail to parse default to 0, matching the
/// lenient reload behavior the format has always had.
pub fn parse_index(text: &str) -> Vec<Entry> {
    let mut entries = Vec::new();
    for line in text.lines() {
        let parts: Vec<&str> = line.splitn(FIELD_COUNT, '|').collect();
        if parts.len() != FIELD_COUNT {
            continue;
        }
        entries.push(Entry {
            path: parts[0].to_string(),
            line_number: parts[1].parse().unwrap_or(0),
            size: parts[2].parse().unwrap_or(0),
            content_hash: parts[3].to_string(),
            content: parts[4].to_string(),
        });
    }
    entries
}

/// Serialize entries in their current order, one newline-terminated line
/// per entry.
pub fn serialize_index(entries: &[Entry]) -> String {
    let mut out = String::new();
    for entry in entries {
        out.push_str(&entry.path);
        out.push('|');
        out.push_str(&entry.line_number.to_string());
        out.push('|');
        out.push_str(&entry.size.to_string());
        out.push('|');
        out.push_str(&entry.content_hash);
        out.push('|');
        out.push_str(&entry.content);
        out.push('\n');
    }
    out
}

/// Load the prior index.
///
/// A missing or undecryptable index is first-run state, not an error: the
/// caller gets an empty entry list and proceeds as if nothing was indexed
/// before.
pub fn load_index<C: Crypto>(crypto: &C, cache_file: &Path) -> Vec<Entry> {
    if !cache_file.exists() {
        return Vec::new();
    }
    match crypto.decrypt_file(cache_file) {
        Ok(bytes) => parse_index(&String::from_utf8_lossy(&bytes)),
        Err(e) => {
            eprintln!(
                "Warning: could not decrypt prior index {}: {}",
                cache_file.display(),
                e
            );
            Vec::new()
        }
    }
}

/// Sort, serialize, encrypt and atomically replace the on-disk index.
///
/// The ciphertext lands in a sibling temp file first and is renamed into
/// place, so an interrupted run can never leave a truncated or unencrypted
/// index behind.
///
/// # Errors
///
/// Returns an error if `recipients` is empty (callers must have validated
/// recipients first), if encryption fails, or if the temp write or rename
/// fails.
pub fn save_index<C: Crypto>(
    crypto: &C,
    mut entries: Vec<Entry>,
    cache_file: &Path,
    recipients: &[String],
) -> Result<()> {
    ensure!(!recipients.is_empty(), "refusing to write index with no recipients");

    entries.sort_by(Entry::index_order);

    let ciphertext = crypto
        .encrypt(serialize_index(&entries).as_bytes(), recipients)
        .context("failed to encrypt index")?;

    let Some(name) = cache_file.file_name() else {
        bail!("invalid index location: {}", cache_file.display());
    };
    let temp_path = cache_file.with_file_name(format!("{}.tmp", name.to_string_lossy()));

    fs::write(&temp_path, &ciphertext)
        .with_context(|| format!("failed to write {}", temp_path.display()))?;
    fs::rename(&temp_path, cache_file)
        .with_context(|| format!("failed to replace {}", cache_file.display()))?;

    Ok(())
}

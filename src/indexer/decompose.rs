//! Decompose decrypted note content into ordered line entries.
//!
//! Two decomposition modes, selected by what the carrier file contains:
//!
//! - **Inline-block mode**: the file embeds one or more armored message
//!   blocks between literal begin/end markers. Each block is decrypted
//!   independently and its lines numbered from 1. A block that fails to
//!   decrypt is skipped with a warning while its siblings proceed.
//! - **Whole-file mode**: no inline markers found; the entire file is
//!   handed to the decryptor as one blob and entries carry line number 0.
//!
//! Total failure to decrypt yields an empty entry set and a warning, never
//! an error to the caller.

use std::fs;
use std::path::Path;

use crate::crypto::Crypto;
use crate::models::Entry;

const BLOCK_BEGIN: &str = "-----BEGIN PGP MESSAGE-----";
const BLOCK_END: &str = "-----END PGP MESSAGE-----";

/// Extract armored message blocks from carrier text, markers included.
/// An unterminated trailing block is discarded.
pub fn extract_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current = String::new();
    let mut in_block = false;

    for line in text.lines() {
        if line.starts_with(BLOCK_BEGIN) {
            in_block = true;
            current.clear();
        }
        if in_block {
            current.push_str(line);
            current.push('\n');
        }
        if line.starts_with(BLOCK_END) {
            in_block = false;
            blocks.push(std::mem::take(&mut current));
        }
    }

    blocks
}

/// Split a note's decrypted plaintext into [`Entry`] values tagged with the
/// encrypted file's fingerprint.
pub fn decompose<C: Crypto>(
    crypto: &C,
    file: &Path,
    path: &str,
    size: u64,
    hash: &str,
) -> Vec<Entry> {
    let carrier = fs::read(file)
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default();

    let blocks = extract_blocks(&carrier);
    if blocks.is_empty() {
        return match crypto.decrypt_file(file) {
            Ok(plaintext) => {
                line_entries(&String::from_utf8_lossy(&plaintext), path, false, size, hash)
            }
            Err(e) => {
                eprintln!("Warning: could not decrypt {}: {}", file.display(), e);
                Vec::new()
            }
        };
    }

    let mut entries = Vec::new();
    for block in &blocks {
        match crypto.decrypt_block(block.as_bytes()) {
            Ok(plaintext) => {
                entries.extend(line_entries(
                    &String::from_utf8_lossy(&plaintext),
                    path,
                    true,
                    size,
                    hash,
                ));
            }
            Err(e) => {
                eprintln!("Warning: skipping undecryptable block in {}: {}", file.display(), e);
            }
        }
    }
    entries
}

/// One entry per line. Numbered from 1 within a block, or all 0 for a
/// whole-file decryption.
fn line_entries(text: &str, path: &str, numbered: bool, size: u64, hash: &str) -> Vec<Entry> {
    text.lines()
        .enumerate()
        .map(|(i, line)| Entry {
            path: path.to_string(),
            line_number: if numbered { i as u64 + 1 } else { 0 },
            size,
            content_hash: hash.to_string(),
            content: line.to_string(),
        })
        .collect()
}

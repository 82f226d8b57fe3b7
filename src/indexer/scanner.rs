//! Recursive discovery of encrypted note files.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// File suffix marking a note as encrypted.
pub const ENCRYPTED_SUFFIX: &str = ".gpg";

/// Recursively collect files under `root` whose names end with `suffix`.
///
/// Directories are never returned. Per-entry traversal errors are swallowed
/// so a single unreadable subtree cannot block indexing the rest of the
/// tree.
pub fn find_encrypted_files(root: &Path, suffix: &str) -> Vec<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.to_string_lossy().ends_with(suffix))
        .collect()
}

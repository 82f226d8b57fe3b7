//! Content fingerprinting for change detection.

use std::fs::File;
use std::io;
use std::path::Path;

use md5::{Digest, Md5};

/// Compute `(size, hash)` of a file's raw bytes.
///
/// The hash is the lowercase hex MD5 of the *encrypted* content, matching
/// the persisted index format. On any open or read failure this returns the
/// `(0, "")` sentinel; callers must treat that as "file unusable", not as a
/// valid fingerprint of an empty file (an actual empty file hashes to the
/// well-known empty digest).
pub fn fingerprint(path: &Path) -> (u64, String) {
    let Ok(metadata) = std::fs::metadata(path) else {
        return (0, String::new());
    };
    let Ok(mut file) = File::open(path) else {
        return (0, String::new());
    };

    let mut hasher = Md5::new();
    if io::copy(&mut file, &mut hasher).is_err() {
        return (0, String::new());
    }

    (metadata.len(), format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_missing_file_returns_sentinel() {
        let dir = TempDir::new().unwrap();
        let (size, hash) = fingerprint(&dir.path().join("nope.gpg"));
        assert_eq!(size, 0);
        assert!(hash.is_empty());
    }

    #[test]
    fn test_empty_file_is_not_the_sentinel() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.gpg");
        fs::write(&path, b"").unwrap();

        let (size, hash) = fingerprint(&path);
        assert_eq!(size, 0);
        assert_eq!(hash, "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_same_bytes_same_fingerprint() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.gpg");
        let b = dir.path().join("b.gpg");
        fs::write(&a, b"identical bytes").unwrap();
        fs::write(&b, b"identical bytes").unwrap();

        assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn test_different_bytes_different_hash() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.gpg");
        let b = dir.path().join("b.gpg");
        fs::write(&a, b"first version!!").unwrap();
        fs::write(&b, b"second version!").unwrap();

        let (size_a, hash_a) = fingerprint(&a);
        let (size_b, hash_b) = fingerprint(&b);
        assert_eq!(size_a, size_b);
        assert_ne!(hash_a, hash_b);
    }
}

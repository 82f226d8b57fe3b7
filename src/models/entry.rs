use std::cmp::Ordering;

/// One indexed line of decrypted note content.
///
/// All entries produced from the same source file share the same
/// `(path, size, content_hash)` triple; that triple is the witness used to
/// decide whether the encrypted bytes changed since the last run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Root-relative, forward-slash-normalized path of the source file.
    pub path: String,
    /// 1-based position within its inline encrypted block, restarting at 1
    /// for each block. 0 when the file was decrypted as a single blob.
    pub line_number: u64,
    /// Byte length of the *encrypted* source file.
    pub size: u64,
    /// Content hash of the *encrypted* source file's bytes, lowercase hex.
    pub content_hash: String,
    /// One line of decrypted plaintext, newline stripped.
    pub content: String,
}

impl Entry {
    /// Persisted ordering: path ascending, then content ascending.
    /// Keeps the on-disk index stable and diffable regardless of scan order.
    pub fn index_order(a: &Entry, b: &Entry) -> Ordering {
        a.path.cmp(&b.path).then_with(|| a.content.cmp(&b.content))
    }
}

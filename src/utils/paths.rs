use std::path::{Component, Path};

use anyhow::{Context, Result, bail};

/// Resolve `file` against `root` and return its root-relative,
/// forward-slash-normalized path.
///
/// Both paths are made absolute (without touching the file system, so this
/// works for files that no longer exist) and the file must prove to lie
/// inside `root`. Callers skip files that fail here rather than indexing
/// them.
///
/// # Errors
///
/// Returns an error if:
/// - Either path cannot be made absolute
/// - The file resolves outside `root`, including via `..` components
pub fn relative_to_root(root: &Path, file: &Path) -> Result<String> {
    let abs_root = std::path::absolute(root)
        .with_context(|| format!("cannot resolve notes directory {}", root.display()))?;
    let abs_file = std::path::absolute(file)
        .with_context(|| format!("cannot resolve file path {}", file.display()))?;

    let Ok(rel) = abs_file.strip_prefix(&abs_root) else {
        bail!("{} is outside {}", file.display(), root.display());
    };

    // std::path::absolute keeps `..` components, so a lexical escape from the
    // root still shows up here and is rejected.
    let mut parts = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            _ => bail!("{} escapes {}", file.display(), root.display()),
        }
    }

    if parts.is_empty() {
        bail!("{} is the notes directory itself", file.display());
    }
    Ok(parts.join("/"))
}

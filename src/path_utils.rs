use std::path::{Component, Path, PathBuf};

/// Check whether `file` lies under `dir`, by purely lexical comparison.
///
/// True iff the lexical relativization of `file` against `dir` is non-empty
/// and does not start with the parent-directory token. `dir == file` counts
/// as inside (the relative path is `.`). Mixing an absolute path with a
/// relative one is always false. No filesystem access.
#[must_use]
pub fn is_in_directory(dir: &Path, file: &Path) -> bool {
    if dir.is_absolute() != file.is_absolute() {
        return false;
    }

    let mut dir_components = dir.components();
    let mut file_components = file.components();
    loop {
        match (dir_components.next(), file_components.next()) {
            // dir exhausted: the remainder of file is the relative path
            (None, None) => return true,
            (None, Some(Component::ParentDir)) => return false,
            (None, Some(_)) => return true,
            (Some(d), Some(f)) if d == f => {}
            // mismatch, or file ran out first: relativization starts with ".."
            (Some(_), _) => return false,
        }
    }
}

/// Lexically normalize a path: collapse `.` components and fold `..` into
/// the preceding component where possible. Mirrors
/// `std::filesystem::path::lexically_normal`; no filesystem access.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component),
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = match normalized.components().next_back() {
                    Some(Component::Normal(_)) => normalized.pop(),
                    _ => false,
                };
                if !popped && normalized.components().next_back() != Some(Component::RootDir) {
                    normalized.push(Component::ParentDir);
                }
            }
            Component::Normal(_) => normalized.push(component),
        }
    }
    normalized
}

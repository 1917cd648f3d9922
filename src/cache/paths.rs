// Cache path utilities.
// Locates the cache directory and maps storage keys onto file names.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Get the base cache directory (~/.cache/ghcard on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "ghcard").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Directory holding one file per persisted profile bundle.
pub fn profiles_dir(base: &Path) -> PathBuf {
    base.join("profiles")
}

/// Path of the file backing a storage key.
pub fn key_path(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("{}.json", sanitize_name(key)))
}

/// Sanitize a name for use in filesystem paths.
/// Replaces problematic characters with underscores.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}

//! Locate the most recent firmware debug binary.
//!
//! Searches the usual IDE and build-system output directories under the
//! current directory and picks the newest matching file, so the console
//! follows whatever was flashed last without needing an explicit path.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Directories searched for debug binaries, relative to the working
/// directory. The IDE writes to the first of these by default.
const SEARCH_DIRS: &[&str] = &[
    "GNU ARM v12.2.1 - Default",
    "build",
    "Debug",
    "Release",
    ".",
];

/// Extensions that count as firmware debug binaries.
const BINARY_PATTERNS: &[&str] = &["**/*.out", "**/*.axf", "**/*.elf"];

/// Search the standard output directories under `root` and return the
/// most recently modified debug binary, if any.
pub fn find_debug_binary_in(root: &Path) -> Option<PathBuf> {
    let mut candidates: Vec<(SystemTime, PathBuf)> = Vec::new();

    for dir in SEARCH_DIRS {
        let dir_path = root.join(dir);
        if !dir_path.is_dir() {
            continue;
        }
        for pattern in BINARY_PATTERNS {
            let full_pattern = dir_path.join(pattern);
            let Some(full_pattern) = full_pattern.to_str() else {
                continue;
            };
            let Ok(paths) = glob::glob(full_pattern) else {
                continue;
            };
            for path in paths.flatten() {
                if let Ok(modified) = path.metadata().and_then(|meta| meta.modified()) {
                    candidates.push((modified, path));
                }
            }
        }
    }

    candidates.sort_by_key(|(modified, _)| *modified);
    candidates.pop().map(|(_, path)| path)
}

/// [`find_debug_binary_in`] rooted at the current working directory.
pub fn find_debug_binary() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_debug_binary_in(&cwd)
}

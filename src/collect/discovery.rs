//! Assignment folder discovery.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Collect the distinct assignment folder names found one level below any
/// student folder, sorted.
///
/// Returns an empty list when `root` is not a directory. A student folder that
/// cannot be listed contributes nothing.
pub fn discover_assignments(root: &Path) -> Vec<String> {
    let entries = match fs::read_dir(root) {
        Ok(entries) if root.is_dir() => entries,
        _ => return Vec::new(),
    };

    let mut names = HashSet::new();
    for student in entries.flatten() {
        if !student.path().is_dir() {
            continue;
        }

        let children = match fs::read_dir(student.path()) {
            Ok(children) => children,
            Err(e) => {
                tracing::debug!("Skipping {}: {}", student.path().display(), e);
                continue;
            }
        };

        for child in children.flatten() {
            if child.path().is_dir() {
                names.insert(child.file_name().to_string_lossy().into_owned());
            }
        }
    }

    let mut names: Vec<String> = names.into_iter().collect();
    names.sort();
    names
}

//! Path and directory management.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

use filetime::FileTime;

use crate::error::{Error, Result};
use crate::fs::naming::sanitize_name;

/// Folder name used for the default output when no assignment was chosen.
pub const UNNAMED_ASSIGNMENT: &str = "unnamed_assignment";

/// Find a path in `folder` for `base` + `ext` that does not exist yet.
///
/// Tries `base.ext`, then `base (2).ext`, `base (3).ext` and so on. Nothing is
/// created; the caller claims the path by writing to it.
pub fn unique_destination(folder: &Path, base: &str, ext: impl AsRef<OsStr>) -> PathBuf {
    let ext = ext.as_ref();
    let candidate = |stem: String| {
        let mut name = OsString::from(stem);
        name.push(ext);
        folder.join(name)
    };

    let path = candidate(base.to_string());
    if !path.exists() {
        return path;
    }

    let mut counter: u64 = 2;
    loop {
        let path = candidate(format!("{} ({})", base, counter));
        if !path.exists() {
            return path;
        }
        counter += 1;
    }
}

/// Default output folder for an assignment under the downloads directory.
pub fn default_output_dir(downloads: &Path, assignment: Option<&str>) -> PathBuf {
    match assignment {
        Some(name) => downloads.join(sanitize_name(name)),
        None => downloads.join(UNNAMED_ASSIGNMENT),
    }
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Copy a file's bytes, permissions and access/modification times.
pub fn copy_with_metadata(from: &Path, to: &Path) -> Result<()> {
    let wrap = |source| Error::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    fs::copy(from, to).map_err(wrap)?;

    let metadata = fs::metadata(from).map_err(wrap)?;
    let atime = FileTime::from_last_access_time(&metadata);
    let mtime = FileTime::from_last_modification_time(&metadata);
    filetime::set_file_times(to, atime, mtime).map_err(wrap)?;

    Ok(())
}

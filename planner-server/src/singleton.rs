//! Singleton pattern to ensure only one planner-server writes a data file.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// A lock guard that releases the lock when dropped
pub struct LockGuard {
    _file: File,
}

/// The lock sits next to the data file, so two servers pointed at different
/// data files can run side by side.
fn lock_path(data_file: &Path) -> Result<PathBuf> {
    let dir = data_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    Ok(dir.join("planner-server.lock"))
}

/// Acquire an exclusive lock, failing if another instance is running
pub fn acquire_lock(data_file: &Path) -> Result<LockGuard> {
    let path = lock_path(data_file)?;
    let file = File::create(&path).context("Failed to create lock file")?;

    file.try_lock_exclusive().map_err(|_| {
        anyhow::anyhow!(
            "Another planner-server instance is already using {}.\n\
            If you believe this is an error, remove: {}",
            data_file.display(),
            path.display()
        )
    })?;

    Ok(LockGuard { _file: file })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_lock_on_same_data_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let data_file = dir.path().join("planner-data.json");

        let _guard = acquire_lock(&data_file).unwrap();
        assert!(acquire_lock(&data_file).is_err());

        let other = dir.path().join("other").join("planner-data.json");
        assert!(acquire_lock(&other).is_ok());
    }
}

//! Atomic file writes.
//!
//! Content is written to a `.{name}.tmp` sibling, synced, then renamed over
//! the target. Rename is atomic on POSIX when both paths share a filesystem;
//! the temp file is always created next to the target to satisfy that. On a
//! crash the worst leftover is the temp file itself.

use crate::error::{Result, VrocliError};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Atomically write bytes to a file, creating parent directories as needed.
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            VrocliError::PackageError(format!(
                "failed to create directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let temp_path = temp_sibling(path)?;

    write_and_sync(&temp_path, content)?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        VrocliError::PackageError(format!("failed to replace '{}': {}", path.display(), e))
    })?;

    Ok(())
}

/// Atomically write a string to a file.
pub fn atomic_write_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

/// Temp file path beside the target: `.{filename}.tmp`.
fn temp_sibling(target: &Path) -> Result<PathBuf> {
    let parent = target.parent().unwrap_or(Path::new("."));
    let filename = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| VrocliError::PackageError(format!("invalid path '{}'", target.display())))?;
    Ok(parent.join(format!(".{}.tmp", filename)))
}

fn write_and_sync(path: &Path, content: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|e| {
        VrocliError::PackageError(format!(
            "failed to create temporary file '{}': {}",
            path.display(),
            e
        ))
    })?;

    file.write_all(content)
        .and_then(|_| file.sync_all())
        .map_err(|e| {
            let _ = fs::remove_file(path);
            VrocliError::PackageError(format!("failed to write '{}': {}", path.display(), e))
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_new_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.js");

        atomic_write_file(&path, "/** @module test */\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "/** @module test */\n");
    }

    #[test]
    fn replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.js");
        fs::write(&path, "old").unwrap();

        atomic_write_file(&path, "new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("elements").join("abc").join("data");

        atomic_write(&path, &[0xFE, 0xFF]).unwrap();

        assert_eq!(fs::read(&path).unwrap(), vec![0xFE, 0xFF]);
    }

    #[test]
    fn leaves_no_temp_file_behind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.js");

        atomic_write_file(&path, "content").unwrap();

        assert!(!dir.path().join(".out.js.tmp").exists());
    }

    #[test]
    fn preserves_binary_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data");
        let bytes: Vec<u8> = (0..=255).collect();

        atomic_write(&path, &bytes).unwrap();

        assert_eq!(fs::read(&path).unwrap(), bytes);
    }
}

//! In-memory filesystem adapter.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::ports::filesystem::FileSystem;

/// In-memory filesystem keyed by full path.
///
/// Directories are implicit: a directory exists when at least one file lives
/// beneath it. `rename` moves whole subtrees, so the atomic-rename sequence
/// behaves the same as on a real disk.
pub struct MemFileSystem {
    files: Mutex<HashMap<PathBuf, String>>,
}

impl MemFileSystem {
    /// Creates an empty in-memory filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self { files: Mutex::new(HashMap::new()) }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, String>> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MemFileSystem {
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        self.lock()
            .get(path)
            .cloned()
            .ok_or_else(|| format!("file not found: {}", path.display()).into())
    }

    fn write(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.lock().insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn copy(
        &self,
        from: &Path,
        to: &Path,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut files = self.lock();
        let contents = files
            .get(from)
            .cloned()
            .ok_or_else(|| format!("file not found: {}", from.display()))?;
        files.insert(to.to_path_buf(), contents);
        Ok(())
    }

    fn rename(
        &self,
        from: &Path,
        to: &Path,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut files = self.lock();
        if let Some(contents) = files.remove(from) {
            files.insert(to.to_path_buf(), contents);
            return Ok(());
        }
        // Directory rename: move every entry under the prefix.
        let keys: Vec<PathBuf> = files.keys().filter(|k| k.starts_with(from)).cloned().collect();
        if keys.is_empty() {
            return Err(format!("path not found: {}", from.display()).into());
        }
        for k in keys {
            let Ok(tail) = k.strip_prefix(from).map(Path::to_path_buf) else { continue };
            if let Some(contents) = files.remove(&k) {
                files.insert(to.join(tail), contents);
            }
        }
        Ok(())
    }

    fn remove_file(
        &self,
        path: &Path,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.lock()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| format!("file not found: {}", path.display()).into())
    }

    fn remove_dir_all(
        &self,
        path: &Path,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut files = self.lock();
        let doomed: Vec<PathBuf> =
            files.keys().filter(|k| k.starts_with(path)).cloned().collect();
        if doomed.is_empty() {
            return Err(format!("directory not found: {}", path.display()).into());
        }
        for k in doomed {
            files.remove(&k);
        }
        Ok(())
    }

    fn ensure_dir(
        &self,
        _path: &Path,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        // Directories are implicit; nothing to create.
        Ok(())
    }

    fn list_dir(
        &self,
        path: &Path,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        let files = self.lock();
        let mut names: Vec<String> = files
            .keys()
            .filter_map(|k| {
                let tail = k.strip_prefix(path).ok()?;
                let first = tail.components().next()?;
                Some(first.as_os_str().to_string_lossy().into_owned())
            })
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    fn exists(&self, path: &Path) -> bool {
        let files = self.lock();
        files.contains_key(path) || files.keys().any(|k| k.starts_with(path) && k != path)
    }
}

//! Filesystem port for file I/O operations.

use std::path::Path;

/// Provides filesystem access for reading and writing store content.
///
/// Abstracting the filesystem allows deterministic testing without touching
/// the real disk. `rename` is the atomicity primitive the migration engine
/// builds on: implementations must move within one volume, never copy.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or is not valid UTF-8.
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;

    /// Writes the given contents to a file, creating parent directories and
    /// overwriting any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails (permissions, disk full, etc.).
    fn write(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Copies a file, creating the destination's parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or the copy fails.
    fn copy(&self, from: &Path, to: &Path)
        -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Renames a file or directory within the same volume.
    ///
    /// # Errors
    ///
    /// Returns an error if the rename fails or would cross volumes.
    fn rename(
        &self,
        from: &Path,
        to: &Path,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Removes a single file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be removed.
    fn remove_file(&self, path: &Path)
        -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Removes a directory and everything beneath it.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be removed.
    fn remove_dir_all(
        &self,
        path: &Path,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Creates a directory and any missing parents.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    fn ensure_dir(&self, path: &Path)
        -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Lists the entries in a directory, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not a directory or cannot be read.
    fn list_dir(
        &self,
        path: &Path,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>>;

    /// Returns `true` if the path exists on the filesystem.
    fn exists(&self, path: &Path) -> bool;
}

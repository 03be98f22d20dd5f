//! Path management for Libris
//!
//! Provides XDG-compliant path resolution for settings, the audit log and the
//! flat-file record store.
//!
//! ## Path Resolution Order
//!
//! 1. `--data-dir` command line flag (handled by the binary)
//! 2. `LIBRIS_DATA_DIR` environment variable (if set)
//! 3. Unix (Linux/macOS): `$XDG_CONFIG_HOME/libris` or `~/.config/libris`
//! 4. Windows: `%APPDATA%\libris`

use std::path::PathBuf;

use crate::error::LibrisError;

/// Manages all paths used by Libris
#[derive(Debug, Clone)]
pub struct LibrisPaths {
    /// Base directory for all Libris data
    base_dir: PathBuf,
}

impl LibrisPaths {
    /// Create a new LibrisPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, LibrisError> {
        let base_dir = if let Ok(custom) = std::env::var("LIBRIS_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create LibrisPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/libris/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory holding the record files
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to books.txt
    pub fn books_file(&self) -> PathBuf {
        self.data_dir().join("books.txt")
    }

    /// Get the path to members.txt
    pub fn members_file(&self) -> PathBuf {
        self.data_dir().join("members.txt")
    }

    /// Get the path to transactions.txt
    pub fn transactions_file(&self) -> PathBuf {
        self.data_dir().join("transactions.txt")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), LibrisError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| LibrisError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| LibrisError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if Libris has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, LibrisError> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg).join("libris"));
    }

    let base = directories::BaseDirs::new()
        .ok_or_else(|| LibrisError::Config("Could not determine home directory".into()))?;
    Ok(base.home_dir().join(".config").join("libris"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, LibrisError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| LibrisError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("libris"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LibrisPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
    }

    #[test]
    fn test_env_var_override() {
        let temp_dir = TempDir::new().unwrap();
        let custom_path = temp_dir.path().to_str().unwrap();

        env::set_var("LIBRIS_DATA_DIR", custom_path);

        let paths = LibrisPaths::new().unwrap();
        assert_eq!(paths.base_dir(), temp_dir.path());

        env::remove_var("LIBRIS_DATA_DIR");
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LibrisPaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();

        assert!(paths.base_dir().exists());
        assert!(paths.data_dir().exists());
    }

    #[test]
    fn test_file_paths() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LibrisPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(
            paths.books_file(),
            temp_dir.path().join("data").join("books.txt")
        );
        assert_eq!(
            paths.transactions_file(),
            temp_dir.path().join("data").join("transactions.txt")
        );
    }
}

//! # Storage Configuration

use std::path::PathBuf;

/// Storage configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageConfig {
    /// Directory holding the store file; `None` keeps everything in memory.
    pub data_dir: Option<PathBuf>,

    /// Store file name inside `data_dir`.
    pub file_name: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: Some(PathBuf::from("./data")),
            file_name: "vault.db".to_string(),
        }
    }
}

impl StorageConfig {
    /// Create a config for testing (in memory).
    pub fn for_testing() -> Self {
        Self {
            data_dir: None,
            ..Self::default()
        }
    }

    /// Full path of the store file, if file-backed.
    pub fn file_path(&self) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|dir| dir.join(&self.file_name))
    }
}

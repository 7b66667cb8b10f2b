use std::fs;
use std::path::{Path, PathBuf};

use crate::kernel::error::{Error, Result};
use crate::storage::error::StorageSystemError;
use crate::validity::InstallState;

/// A game's data directory on the local filesystem
#[derive(Debug, Clone)]
pub struct LocalDataDirectory {
    base_path: PathBuf,
}

impl LocalDataDirectory {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn resolve_path<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.base_path.join(path)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.resolve_path(name).exists()
    }

    /// Names of the regular files directly inside the directory, sorted
    pub fn list_files(&self) -> Result<Vec<String>> {
        if !self.base_path.is_dir() {
            return Err(Error::StorageSystem(StorageSystemError::DirectoryNotFound(
                self.base_path.clone(),
            )));
        }

        let entries = fs::read_dir(&self.base_path)
            .map_err(|e| Error::io(e, "read_dir", self.base_path.clone()))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::io(e, "read_dir_entry", self.base_path.clone()))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            // Non UTF-8 names cannot be referenced from metadata anyway
            if let Some(name) = entry.file_name().to_str() {
                files.push(name.to_string());
            }
        }
        files.sort();
        Ok(files)
    }
}

impl InstallState for LocalDataDirectory {
    fn has_file(&self, name: &str) -> bool {
        self.exists(name)
    }
}

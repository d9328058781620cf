//! YAML account files.
//!
//! Each account is one `<username>.yaml` file directly inside the accounts
//! directory.

use std::fs;
use std::path::{Path, PathBuf};

use folio_storage::{AccountStore, StorageError, StorageErrorKind};
use glob::Pattern;

use crate::BACKEND;

/// Account file extension.
const ACCOUNT_EXTENSION: &str = "yaml";

/// Filesystem account store.
pub struct FsAccountStore {
    accounts_dir: PathBuf,
}

impl FsAccountStore {
    /// Create a new account store reading from `accounts_dir`.
    #[must_use]
    pub fn new(accounts_dir: PathBuf) -> Self {
        Self { accounts_dir }
    }

    fn validate_username(username: &str) -> Result<(), StorageError> {
        if username.is_empty()
            || username.starts_with('.')
            || username.contains(['/', '\\'])
            || username.contains("..")
        {
            return Err(StorageError::invalid_path(username).with_backend(BACKEND));
        }
        Ok(())
    }

    fn account_path(&self, username: &str) -> PathBuf {
        self.accounts_dir
            .join(format!("{username}.{ACCOUNT_EXTENSION}"))
    }
}

impl AccountStore for FsAccountStore {
    fn list(&self) -> Result<Vec<String>, StorageError> {
        if !self.accounts_dir.is_dir() {
            return Ok(Vec::new());
        }

        let pattern = format!(
            "{}/*.{ACCOUNT_EXTENSION}",
            Pattern::escape(&self.accounts_dir.to_string_lossy())
        );
        let paths = glob::glob(&pattern).map_err(|e| {
            StorageError::new(StorageErrorKind::InvalidPath)
                .with_path(self.accounts_dir.clone())
                .with_backend(BACKEND)
                .with_source(e)
        })?;

        let mut usernames: Vec<String> = paths
            .filter_map(Result::ok)
            .filter(|p| p.is_file())
            .filter_map(|p| file_stem(&p))
            .collect();
        usernames.sort();
        Ok(usernames)
    }

    fn read(&self, username: &str) -> Result<String, StorageError> {
        Self::validate_username(username)?;
        let path = self.account_path(username);
        if !path.is_file() {
            return Err(StorageError::not_found(path).with_backend(BACKEND));
        }
        fs::read_to_string(&path)
            .map_err(|e| StorageError::io(e, Some(path.clone())).with_backend(BACKEND))
    }
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.starts_with('.'))
        .map(str::to_owned)
}

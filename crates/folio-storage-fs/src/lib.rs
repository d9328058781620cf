//! Filesystem storage implementation for Folio.
//!
//! This crate provides [`FsPageStore`], a filesystem-based implementation of
//! the [`PageStore`](folio_storage::PageStore) trait, and [`FsAccountStore`]
//! for YAML account files. The page store handles:
//!
//! - Resolving routes to directories, with or without ordering prefixes
//! - Recursive directory scanning for the page tree
//! - Creating, renaming and removing content files and directories
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use folio_storage::PageStore;
//! use folio_storage_fs::FsPageStore;
//!
//! let store = FsPageStore::new(PathBuf::from("user/pages"));
//! for node in store.scan()? {
//!     println!("{}: {:?}", node.route, node.file_name);
//! }
//! ```

mod accounts;
mod scanner;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use folio_storage::{PageNode, PageStore, StorageError, route};
use scanner::{Scanner, match_segment};

pub use accounts::FsAccountStore;

/// Backend identifier for error messages.
pub(crate) const BACKEND: &str = "Fs";

/// Filesystem page store.
///
/// Every operation walks the directories it needs; nothing is cached between
/// calls, so external edits are picked up immediately.
pub struct FsPageStore {
    /// Root directory of the page tree.
    source_dir: PathBuf,
    /// Scanner for node discovery.
    scanner: Scanner,
}

impl FsPageStore {
    /// Create a new filesystem page store rooted at `source_dir`.
    ///
    /// The directory does not need to exist yet; it is created on the first
    /// allocation.
    #[must_use]
    pub fn new(source_dir: PathBuf) -> Self {
        let scanner = Scanner::new(source_dir.clone());
        Self {
            source_dir,
            scanner,
        }
    }

    /// Reject routes that are not in normalized form.
    fn validate_route(route: &str) -> Result<(), StorageError> {
        if route::normalize(route)? != route {
            return Err(StorageError::invalid_path(route).with_backend(BACKEND));
        }
        Ok(())
    }

    /// Reject content file names that would escape the node directory.
    fn validate_file_name(file_name: &str) -> Result<(), StorageError> {
        let valid = !file_name.starts_with('.')
            && !file_name.contains(['/', '\\'])
            && Path::new(file_name).extension().is_some_and(|e| e == "md");
        if !valid {
            return Err(StorageError::invalid_path(file_name).with_backend(BACKEND));
        }
        Ok(())
    }

    fn require_node(&self, route: &str) -> Result<PageNode, StorageError> {
        self.find(route)?
            .ok_or_else(|| StorageError::not_found(route).with_backend(BACKEND))
    }

    /// Resolve a route to its content file path.
    fn require_content(&self, route: &str) -> Result<PathBuf, StorageError> {
        let node = self.require_node(route)?;
        let file_name = node
            .file_name
            .ok_or_else(|| StorageError::not_found(route).with_backend(BACKEND))?;
        Ok(self.source_dir.join(node.dir).join(file_name))
    }

    /// Create the directories missing for `route`, one segment at a time.
    ///
    /// `created` records the first directory made, as route and absolute path,
    /// so the caller can undo a partial walk.
    fn create_missing_dirs(
        &self,
        route: &str,
        created: &mut Option<(String, PathBuf)>,
    ) -> Result<(), StorageError> {
        let mut rel_dir = PathBuf::new();
        let mut current = String::new();
        for segment in route.split('/').filter(|s| !s.is_empty()) {
            current = route::join(&current, segment);
            let entries = self.scanner.read_entries(&rel_dir)?;
            if let Some(name) = match_segment(&entries, &rel_dir, segment) {
                rel_dir.push(name);
                continue;
            }

            rel_dir.push(segment);
            let dir = self.source_dir.join(&rel_dir);
            fs::create_dir(&dir).map_err(|e| Self::io_error(e, &dir))?;
            tracing::debug!(route = %current, dir = %dir.display(), "Created page directory");
            created.get_or_insert_with(|| (current.clone(), dir));
        }

        match self.scanner.resolve(route)? {
            Some(resolved) if resolved == rel_dir => Ok(()),
            _ => Err(StorageError::not_found(route).with_backend(BACKEND)),
        }
    }

    fn io_error(err: std::io::Error, path: &Path) -> StorageError {
        StorageError::io(err, Some(path.to_path_buf())).with_backend(BACKEND)
    }
}

impl PageStore for FsPageStore {
    fn scan(&self) -> Result<Vec<PageNode>, StorageError> {
        self.scanner.scan()
    }

    fn find(&self, route: &str) -> Result<Option<PageNode>, StorageError> {
        Self::validate_route(route)?;
        self.scanner.node(route)
    }

    fn read(&self, route: &str) -> Result<String, StorageError> {
        let path = self.require_content(route)?;
        fs::read_to_string(&path).map_err(|e| Self::io_error(e, &path))
    }

    fn mtime(&self, route: &str) -> Result<f64, StorageError> {
        let node = self.require_node(route)?;
        let dir = self.source_dir.join(&node.dir);
        let path = node.file_name.map_or_else(|| dir.clone(), |name| dir.join(name));
        let modified = fs::metadata(&path)
            .and_then(|m| m.modified())
            .map_err(|e| Self::io_error(e, &path))?;
        Ok(modified
            .duration_since(UNIX_EPOCH)
            .map_or(0.0, |d| d.as_secs_f64()))
    }

    fn allocate(&self, route: &str) -> Result<Option<String>, StorageError> {
        Self::validate_route(route)?;
        // A directory named `01.blog` is listed as `blog`.
        if route
            .split('/')
            .any(|segment| route::split_order_prefix(segment).0.is_some())
        {
            return Err(StorageError::invalid_path(route).with_backend(BACKEND));
        }
        fs::create_dir_all(&self.source_dir).map_err(|e| Self::io_error(e, &self.source_dir))?;

        let mut created = None;
        if let Err(err) = self.create_missing_dirs(route, &mut created) {
            if let Some((created_route, dir)) = created {
                match fs::remove_dir_all(&dir) {
                    Ok(()) => tracing::debug!(route = %created_route, "Removed partial allocation"),
                    Err(e) => tracing::warn!(
                        route = %created_route,
                        dir = %dir.display(),
                        error = %e,
                        "Failed to remove partial allocation"
                    ),
                }
            }
            return Err(err);
        }
        Ok(created.map(|(created_route, _)| created_route))
    }

    fn write(&self, route: &str, file_name: &str, contents: &str) -> Result<(), StorageError> {
        Self::validate_file_name(file_name)?;
        let node = self.require_node(route)?;
        let path = self.source_dir.join(node.dir).join(file_name);
        fs::write(&path, contents).map_err(|e| Self::io_error(e, &path))?;
        tracing::debug!(route, path = %path.display(), "Wrote content file");
        Ok(())
    }

    fn rename(&self, route: &str, file_name: &str) -> Result<(), StorageError> {
        Self::validate_file_name(file_name)?;
        let from = self.require_content(route)?;
        let to = from.with_file_name(file_name);
        if from == to {
            return Ok(());
        }
        fs::rename(&from, &to).map_err(|e| Self::io_error(e, &from))?;
        tracing::debug!(route, from = %from.display(), to = %to.display(), "Renamed content file");
        Ok(())
    }

    fn remove_file(&self, route: &str) -> Result<(), StorageError> {
        let path = self.require_content(route)?;
        fs::remove_file(&path).map_err(|e| Self::io_error(e, &path))?;
        tracing::debug!(route, path = %path.display(), "Removed content file");
        Ok(())
    }

    fn remove_dir(&self, route: &str) -> Result<(), StorageError> {
        if route.is_empty() {
            return Err(StorageError::invalid_path(route).with_backend(BACKEND));
        }
        let node = self.require_node(route)?;
        let dir = self.source_dir.join(node.dir);
        fs::remove_dir_all(&dir).map_err(|e| Self::io_error(e, &dir))?;
        tracing::debug!(route, dir = %dir.display(), "Removed page directory");
        Ok(())
    }
}

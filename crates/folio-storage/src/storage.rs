//! Storage traits and error types.
//!
//! Provides the [`PageStore`] trait for page-tree lookups and mutations, the
//! [`AccountStore`] trait for user account files, and [`StorageError`] for
//! unified error handling across backends.
//!
//! # Route Convention
//!
//! All route parameters are normalized routes, not file paths:
//! - `""` - root
//! - `"blog"` - top-level node
//! - `"blog/post1"` - nested node
//!
//! Implementations handle the mapping from routes to their internal layout.

use std::path::PathBuf;

use crate::node::PageNode;

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// Resource does not exist.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Resource already exists (for create operations).
    AlreadyExists,
    /// Invalid path or identifier.
    InvalidPath,
    /// Other/unknown error category.
    Other,
}

/// Storage error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StorageError {
    /// Semantic error category.
    pub kind: StorageErrorKind,
    /// Path context (if applicable).
    pub path: Option<PathBuf>,
    /// Backend identifier (e.g., "Fs").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    /// Create a new storage error.
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::NotFound).with_path(path)
    }

    /// Create an invalid path error.
    #[must_use]
    pub fn invalid_path(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::InvalidPath).with_path(path)
    }

    /// Create a storage error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StorageErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => StorageErrorKind::PermissionDenied,
            std::io::ErrorKind::AlreadyExists => StorageErrorKind::AlreadyExists,
            _ => StorageErrorKind::Other,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(p) = path {
            error = error.with_path(p);
        }
        error
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (path: /foo/bar)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StorageErrorKind::NotFound => "Not found",
            StorageErrorKind::PermissionDenied => "Permission denied",
            StorageErrorKind::AlreadyExists => "Already exists",
            StorageErrorKind::InvalidPath => "Invalid path",
            StorageErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Page tree backend.
///
/// Every call re-reads the backend; implementations keep no index between
/// calls.
pub trait PageStore: Send + Sync {
    /// All nodes except the root, depth-first, siblings in name order.
    ///
    /// Includes directory-only nodes.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the tree cannot be read.
    fn scan(&self) -> Result<Vec<PageNode>, StorageError>;

    /// Resolve a route to a node.
    ///
    /// Returns `Ok(None)` if no directory matches the route.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] for invalid routes or read failures.
    fn find(&self, route: &str) -> Result<Option<PageNode>, StorageError>;

    /// Read the content file of a page.
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::NotFound`] if the route is not a page.
    fn read(&self, route: &str) -> Result<String, StorageError>;

    /// Modification time of the node's content file (or directory) as seconds
    /// since Unix epoch.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the node doesn't exist.
    fn mtime(&self, route: &str) -> Result<f64, StorageError>;

    /// Ensure a directory exists for every segment of `route`.
    ///
    /// Returns the top-most route whose directory was created by this call,
    /// or `None` if every directory already existed. Removing that route
    /// undoes the allocation without touching pre-existing directories.
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::InvalidPath`] for segments that cannot be
    /// stored as a directory name, or [`StorageError`] if a directory cannot
    /// be created. Directories created before the failure are removed again.
    fn allocate(&self, route: &str) -> Result<Option<String>, StorageError>;

    /// Write `contents` to `file_name` inside the node's directory.
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::NotFound`] if the node doesn't exist.
    fn write(&self, route: &str, file_name: &str, contents: &str) -> Result<(), StorageError>;

    /// Rename the node's content file in place. The route does not change.
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::NotFound`] if the route is not a page.
    fn rename(&self, route: &str, file_name: &str) -> Result<(), StorageError>;

    /// Delete the node's content file, keeping its directory.
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::NotFound`] if the route is not a page.
    fn remove_file(&self, route: &str) -> Result<(), StorageError>;

    /// Delete the node's directory and everything below it.
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::NotFound`] if the node doesn't exist, or
    /// [`StorageErrorKind::InvalidPath`] for the root.
    fn remove_dir(&self, route: &str) -> Result<(), StorageError>;
}

/// User account backend.
pub trait AccountStore: Send + Sync {
    /// Usernames of all account files, sorted.
    ///
    /// Returns an empty list if the account directory doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the directory cannot be listed.
    fn list(&self) -> Result<Vec<String>, StorageError>;

    /// Raw contents of an account file.
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::NotFound`] if no such account exists, or
    /// [`StorageErrorKind::InvalidPath`] for malformed usernames.
    fn read(&self, username: &str) -> Result<String, StorageError>;
}

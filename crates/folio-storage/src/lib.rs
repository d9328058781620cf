//! Storage abstraction for Folio.
//!
//! This crate provides the [`PageStore`] and [`AccountStore`] traits that
//! decouple page-tree operations from the backend holding the files, along
//! with the value types they exchange:
//!
//! - [`PageNode`]: one resolved node of the page tree, children stored by value
//! - [`format`]: the frontmatter + body codec for a page's content file
//! - [`route`]: route normalization and ancestry helpers
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
//!     println!("{} (page: {})", node.route, node.is_page());
//! }
//! ```

pub mod format;
mod node;
pub mod route;
mod storage;

pub use format::{Document, FormatError, Header};
pub use node::{ChildRef, Children, PageNode, file_name_for_template, template_from_file_name};
pub use storage::{AccountStore, PageStore, StorageError, StorageErrorKind};

//! Page and user services for Folio.
//!
//! This crate provides:
//! - [`PageService`]: list, read, create, update and delete pages
//! - [`UserService`]: read-only access to user accounts
//! - [`ResourceFilter`]: per-resource field whitelist applied to every record
//!
//! Services are backend-agnostic and take their stores as trait objects.
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use folio_site::{PageService, ResourceFilter};
//! use folio_storage_fs::FsPageStore;
//!
//! let store = Arc::new(FsPageStore::new(PathBuf::from("user/pages")));
//! let pages = PageService::new(store, ResourceFilter::default());
//!
//! for page in pages.list()? {
//!     println!("{}", page["route"]);
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod filter;
mod merge;
mod page;
mod pages;
mod users;

pub use error::SiteError;
pub use filter::ResourceFilter;
pub use merge::deep_merge;
pub use page::PageInput;
pub use pages::PageService;
pub use users::UserService;

/// JSON object returned for a page or user, keys in output order.
pub type Record = serde_json::Map<String, serde_json::Value>;

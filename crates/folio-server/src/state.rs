//! Application state.
//!
//! Shared state for all request handlers.

use folio_site::{PageService, UserService};

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Page operations.
    pub(crate) pages: PageService,
    /// User account lookups.
    pub(crate) users: UserService,
}

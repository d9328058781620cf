//! Read-only access to user accounts.

use std::sync::Arc;

use folio_storage::{AccountStore, format};
use serde_json::Value;

use crate::{Record, ResourceFilter, SiteError};

/// Lists and reads user accounts.
pub struct UserService {
    store: Arc<dyn AccountStore>,
    filter: ResourceFilter,
}

impl UserService {
    /// Create a service over `store`, filtering records with `filter`.
    #[must_use]
    pub fn new(store: Arc<dyn AccountStore>, filter: ResourceFilter) -> Self {
        Self { store, filter }
    }

    /// All accounts, sorted by username.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] when there are no account files.
    pub fn list(&self) -> Result<Vec<Record>, SiteError> {
        let usernames = self.store.list()?;
        if usernames.is_empty() {
            return Err(SiteError::NotFound("No user accounts found".to_owned()));
        }

        usernames
            .iter()
            .map(|username| self.load(username).map(|r| self.filter.apply(r)))
            .collect()
    }

    /// A single account.
    pub fn get(&self, username: &str) -> Result<Record, SiteError> {
        self.load(username).map(|r| self.filter.apply(r))
    }

    /// Read an account file into a record, `username` first.
    fn load(&self, username: &str) -> Result<Record, SiteError> {
        let text = self.store.read(username).map_err(|e| match SiteError::from(e) {
            SiteError::NotFound(_) => SiteError::NotFound(format!("User {username} not found")),
            other => other,
        })?;
        let fields = format::parse_header(&text)
            .map_err(|e| SiteError::malformed(format!("{username}.yaml"), e))?;

        let mut record = Record::new();
        record.insert("username".to_owned(), Value::String(username.to_owned()));
        record.extend(fields);
        Ok(record)
    }
}

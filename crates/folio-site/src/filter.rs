//! Field whitelist applied to outgoing records.

use crate::Record;

/// Restricts records to a configured set of top-level keys.
///
/// An empty field list lets every key through.
#[derive(Clone, Debug, Default)]
pub struct ResourceFilter {
    fields: Vec<String>,
}

impl ResourceFilter {
    /// Create a filter keeping only `fields`.
    #[must_use]
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    /// Drop keys not in the whitelist. Surviving keys keep the record's order.
    #[must_use]
    pub fn apply(&self, record: Record) -> Record {
        if self.fields.is_empty() {
            return record;
        }
        record
            .into_iter()
            .filter(|(key, _)| self.fields.iter().any(|f| f == key))
            .collect()
    }
}

//! Page CRUD over a [`PageStore`].
//!
//! # Thread Safety
//!
//! Reads go straight to the store. Create, update and delete hold a
//! `Mutex<()>` so mutations made through one service never interleave.
//! Processes writing the same tree directly are not coordinated: a delete's
//! ancestor walk re-reads each ancestor and may see a tree that changed
//! underneath it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use folio_storage::{Document, PageNode, PageStore, file_name_for_template, format, route};

use crate::merge::deep_merge;
use crate::page::{PageInput, page_record};
use crate::{Record, ResourceFilter, SiteError};

/// Template used when a create request names none.
const DEFAULT_TEMPLATE: &str = "default";

/// Page operations exposed by the API.
pub struct PageService {
    store: Arc<dyn PageStore>,
    filter: ResourceFilter,
    /// Serializes mutations.
    write_lock: Mutex<()>,
}

impl PageService {
    /// Create a service over `store`, filtering records with `filter`.
    #[must_use]
    pub fn new(store: Arc<dyn PageStore>, filter: ResourceFilter) -> Self {
        Self {
            store,
            filter,
            write_lock: Mutex::new(()),
        }
    }

    /// Every node below the root, depth-first.
    pub fn list(&self) -> Result<Vec<Record>, SiteError> {
        self.store
            .scan()?
            .iter()
            .map(|node| self.render(node))
            .collect()
    }

    /// A single node, page or directory-only.
    pub fn get(&self, raw_route: &str) -> Result<Record, SiteError> {
        let route = route::normalize(raw_route)?;
        let node = self.require_node(&route)?;
        self.render(&node)
    }

    /// Create a page at `input.route`.
    ///
    /// Missing directories are created. If anything fails after that, the
    /// directories created by this call are removed again.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] for a missing route or unusable
    /// header, and [`SiteError::Conflict`] if a page already exists there.
    pub fn create(&self, input: &PageInput) -> Result<Record, SiteError> {
        let route = route::normalize(input.route()?)?;
        if route.is_empty() {
            return Err(SiteError::Validation(
                "You must provide a `route` field".to_owned(),
            ));
        }
        let header = input.header()?.unwrap_or_default();
        let template = input.template().unwrap_or(DEFAULT_TEMPLATE);

        let _guard = self.lock_writes();

        if self.store.find(&route)?.is_some_and(|n| n.is_page()) {
            return Err(SiteError::Conflict(format!(
                "Page {} already exists",
                route::to_url(&route)
            )));
        }

        let created = self.store.allocate(&route)?;
        let mut rollback = RollbackGuard::new(self.store.as_ref(), &route, created);

        let document = Document {
            header,
            content: input.content().unwrap_or_default().to_owned(),
        };
        let text = encode(&route, &document)?;
        self.store
            .write(&route, &file_name_for_template(template, None), &text)?;
        rollback.wrote_file = true;

        let record = self.render(&self.require_node(&route)?)?;
        rollback.disarm();

        tracing::info!(route = %route, template, "Created page");
        Ok(record)
    }

    /// Update the page at `raw_route`.
    ///
    /// Non-empty content replaces the body, a non-empty header is merged into
    /// the existing one, and a non-empty template renames the content file.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] unless the route is an existing page,
    /// and [`SiteError::Validation`] for a missing route field.
    pub fn update(&self, raw_route: &str, input: &PageInput) -> Result<Record, SiteError> {
        let route = route::normalize(raw_route)?;

        let _guard = self.lock_writes();

        let node = self.require_page(&route)?;
        input.route()?;
        let patch = input.header()?;

        let mut document = self.load(&node)?;
        if let Some(content) = input.content() {
            content.clone_into(&mut document.content);
        }
        if let Some(patch) = patch {
            deep_merge(&mut document.header, patch);
        }

        let mut file_name = node.file_name.clone().unwrap_or_default();
        if let Some(template) = input.template() {
            let renamed = file_name_for_template(template, node.file_order());
            if renamed != file_name {
                self.store.rename(&route, &renamed)?;
                tracing::info!(route = %route, from = %file_name, to = %renamed, "Changed page template");
                file_name = renamed;
            }
        }

        self.store.write(&route, &file_name, &encode(&route, &document)?)?;

        tracing::info!(route = %route, "Updated page");
        self.render(&self.require_node(&route)?)
    }

    /// Delete the page at `raw_route`.
    ///
    /// A page with regular children loses only its content file. Otherwise its
    /// directory is removed, followed by every ancestor left empty.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] unless the route is an existing page.
    pub fn delete(&self, raw_route: &str) -> Result<(), SiteError> {
        let route = route::normalize(raw_route)?;

        let _guard = self.lock_writes();

        let node = self.require_page(&route)?;
        if !node.children().regular.is_empty() {
            self.store.remove_file(&route)?;
            tracing::info!(route = %route, "Deleted page content, kept children");
            return Ok(());
        }

        self.store.remove_dir(&route)?;
        tracing::info!(route = %route, "Deleted page");
        self.prune_ancestors(&route)
    }

    /// Remove ancestors of a deleted node that are left as empty directories.
    ///
    /// Stops at the root, at an ancestor that cannot be found, or at one that
    /// is a page or still has children.
    fn prune_ancestors(&self, deleted: &str) -> Result<(), SiteError> {
        let mut child = deleted.to_owned();
        while let Some(parent) = route::parent(&child).filter(|p| !p.is_empty()) {
            let Some(node) = self.store.find(parent)? else {
                break;
            };
            let has_children = node.children.iter().any(|c| c.route != child);
            if node.is_page() || has_children {
                break;
            }

            self.store.remove_dir(parent)?;
            tracing::debug!(route = %parent, "Pruned empty directory");
            child = parent.to_owned();
        }
        Ok(())
    }

    /// The lock guards no data, so a poisoned lock is still usable.
    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn require_node(&self, route: &str) -> Result<PageNode, SiteError> {
        self.store
            .find(route)?
            .ok_or_else(|| not_found(route))
    }

    fn require_page(&self, route: &str) -> Result<PageNode, SiteError> {
        self.store
            .find(route)?
            .filter(PageNode::is_page)
            .ok_or_else(|| not_found(route))
    }

    /// Decode a node's content file. Directory-only nodes have an empty document.
    fn load(&self, node: &PageNode) -> Result<Document, SiteError> {
        let Some(file_name) = &node.file_name else {
            return Ok(Document::default());
        };
        let text = self.store.read(&node.route)?;
        format::decode(&text)
            .map_err(|e| SiteError::malformed(node.dir.join(file_name).to_string_lossy(), e))
    }

    fn render(&self, node: &PageNode) -> Result<Record, SiteError> {
        let document = self.load(node)?;
        let mtime = self.store.mtime(&node.route)?;
        Ok(self.filter.apply(page_record(node, &document, mtime)?))
    }
}

fn not_found(route: &str) -> SiteError {
    SiteError::NotFound(format!("Page {} not found", route::to_url(route)))
}

fn encode(route: &str, document: &Document) -> Result<String, SiteError> {
    format::encode(document).map_err(|e| SiteError::malformed(route::to_url(route), e))
}

/// Undoes a partially completed create when dropped without [`disarm`].
///
/// Removes the top-most directory created for the page. If every directory
/// already existed, removes the content file instead once it was written.
///
/// [`disarm`]: RollbackGuard::disarm
struct RollbackGuard<'a> {
    store: &'a dyn PageStore,
    route: &'a str,
    created: Option<String>,
    wrote_file: bool,
    armed: bool,
}

impl<'a> RollbackGuard<'a> {
    fn new(store: &'a dyn PageStore, route: &'a str, created: Option<String>) -> Self {
        Self {
            store,
            route,
            created,
            wrote_file: false,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for RollbackGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let result = match (&self.created, self.wrote_file) {
            (Some(created), _) => self.store.remove_dir(created),
            (None, true) => self.store.remove_file(self.route),
            (None, false) => return,
        };
        match result {
            Ok(()) => tracing::warn!(route = %self.route, "Rolled back page creation"),
            Err(e) => tracing::warn!(route = %self.route, error = %e, "Rollback failed"),
        }
    }
}

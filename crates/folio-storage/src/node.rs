//! Page tree nodes.
//!
//! A [`PageNode`] is a snapshot of one directory in the page tree. Children are
//! stored by value as [`ChildRef`]s, so nodes never hold references into each
//! other and can be passed around freely.

use std::path::PathBuf;

use crate::route;

/// Content file extension.
pub(crate) const CONTENT_EXTENSION: &str = "md";

/// Immediate child of a [`PageNode`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChildRef {
    /// Child route (e.g., "blog/post1").
    pub route: String,
    /// True if the child directory holds a content file.
    pub has_content: bool,
    /// True if the child is a modular (component) page.
    pub modular: bool,
}

/// Children of a node, partitioned by kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Children {
    /// Non-modular children, with or without a content file.
    pub regular: Vec<ChildRef>,
    /// Modular component children.
    pub modular: Vec<ChildRef>,
}

/// A resolved node of the page tree.
///
/// A node is either a **page** (its directory holds a content file) or a
/// **directory-only** grouping node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageNode {
    /// Route (e.g., "", "blog", "blog/post1").
    pub route: String,
    /// Directory relative to the store root (e.g., "01.blog/post1").
    pub dir: PathBuf,
    /// Content file name inside `dir` (e.g., "item.md"), if any.
    pub file_name: Option<String>,
    /// True for modular (component) pages.
    pub modular: bool,
    /// True if the directory carries a numeric ordering prefix.
    pub visible: bool,
    /// Immediate children in directory-name order.
    pub children: Vec<ChildRef>,
}

impl PageNode {
    /// Whether the node has a content file.
    #[must_use]
    pub fn is_page(&self) -> bool {
        self.file_name.is_some()
    }

    /// Last route segment.
    #[must_use]
    pub fn slug(&self) -> &str {
        route::slug(&self.route)
    }

    /// Template encoded in the content file name (`02.item.md` → `item`).
    #[must_use]
    pub fn template(&self) -> Option<&str> {
        self.file_name.as_deref().map(template_from_file_name)
    }

    /// Ordering prefix of the content file name (`02.item.md` → `02`).
    #[must_use]
    pub fn file_order(&self) -> Option<&str> {
        self.file_name
            .as_deref()
            .and_then(|name| route::split_order_prefix(file_stem(name)).0)
    }

    /// Partition children into regular and modular.
    #[must_use]
    pub fn children(&self) -> Children {
        let (modular, regular): (Vec<ChildRef>, Vec<ChildRef>) =
            self.children.iter().cloned().partition(|c| c.modular);
        Children { regular, modular }
    }
}

/// Template name encoded in a content file name.
///
/// Strips the extension and any numeric ordering prefix:
/// `item.md` → `item`, `02.item.md` → `item`.
#[must_use]
pub fn template_from_file_name(file_name: &str) -> &str {
    route::split_order_prefix(file_stem(file_name)).1
}

fn file_stem(file_name: &str) -> &str {
    file_name
        .strip_suffix(CONTENT_EXTENSION)
        .and_then(|s| s.strip_suffix('.'))
        .unwrap_or(file_name)
}

/// Content file name for a template, keeping an optional ordering prefix.
#[must_use]
pub fn file_name_for_template(template: &str, order: Option<&str>) -> String {
    match order {
        Some(order) => format!("{order}.{template}.{CONTENT_EXTENSION}"),
        None => format!("{template}.{CONTENT_EXTENSION}"),
    }
}

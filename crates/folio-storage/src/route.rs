//! Route helpers.
//!
//! A route is a slash-separated logical path identifying a page. Internally
//! routes carry no leading or trailing slash:
//! - `""` - root
//! - `"blog"` - top-level node
//! - `"blog/post1"` - nested node
//!
//! Each segment maps to one directory level. Directory names may carry a
//! numeric ordering prefix (`01.blog`) which is not part of the segment.

use crate::storage::{StorageError, StorageErrorKind};

/// Normalize a user-supplied route.
///
/// Strips leading/trailing slashes and collapses empty segments, so
/// `"/blog//post1/"` becomes `"blog/post1"`.
///
/// # Errors
///
/// Returns [`StorageErrorKind::InvalidPath`] for segments starting with `.`
/// (including `.` and `..`) or containing a backslash. Hidden directories are
/// never part of the page tree, so no route can name one.
pub fn normalize(route: &str) -> Result<String, StorageError> {
    let mut segments = Vec::new();
    for segment in route.split('/').filter(|s| !s.is_empty()) {
        if segment.starts_with('.') || segment.contains('\\') {
            return Err(StorageError::new(StorageErrorKind::InvalidPath).with_path(route));
        }
        segments.push(segment);
    }
    Ok(segments.join("/"))
}

/// Parent route, or `None` for the root.
#[must_use]
pub fn parent(route: &str) -> Option<&str> {
    if route.is_empty() {
        return None;
    }
    Some(route.rsplit_once('/').map_or("", |(parent, _)| parent))
}

/// Last segment of a route (`""` for the root).
#[must_use]
pub fn slug(route: &str) -> &str {
    route.rsplit_once('/').map_or(route, |(_, last)| last)
}

/// Append a segment to a route.
#[must_use]
pub fn join(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_owned()
    } else {
        format!("{parent}/{segment}")
    }
}

/// Render a route for API output (`"blog/post1"` → `"/blog/post1"`, root stays `""`).
#[must_use]
pub fn to_url(route: &str) -> String {
    if route.is_empty() {
        String::new()
    } else {
        format!("/{route}")
    }
}

/// Split a numeric ordering prefix off a directory or file name.
///
/// `"01.blog"` → `(Some("01"), "blog")`; `"blog"` → `(None, "blog")`.
#[must_use]
pub fn split_order_prefix(name: &str) -> (Option<&str>, &str) {
    match name.split_once('.') {
        Some((order, rest))
            if !order.is_empty() && !rest.is_empty() && order.bytes().all(|b| b.is_ascii_digit()) =>
        {
            (Some(order), rest)
        }
        _ => (None, name),
    }
}

/// Whether a segment names a modular (component) page.
#[must_use]
pub fn is_modular(segment: &str) -> bool {
    segment.starts_with('_')
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_normalize_strips_slashes() {
        assert_eq!(normalize("/blog/post1").unwrap(), "blog/post1");
        assert_eq!(normalize("blog/post1/").unwrap(), "blog/post1");
        assert_eq!(normalize("//blog///post1").unwrap(), "blog/post1");
        assert_eq!(normalize("/").unwrap(), "");
        assert_eq!(normalize("").unwrap(), "");
    }

    #[test]
    fn test_normalize_rejects_traversal() {
        let err = normalize("/blog/../etc").unwrap_err();
        assert_eq!(err.kind, StorageErrorKind::InvalidPath);
        assert!(normalize("./blog").is_err());
        assert!(normalize("blog\\post").is_err());
    }

    #[test]
    fn test_normalize_rejects_hidden_segments() {
        let err = normalize("/.draft").unwrap_err();
        assert_eq!(err.kind, StorageErrorKind::InvalidPath);
        assert!(normalize("blog/.git/config").is_err());
        assert_eq!(normalize("blog/post.v2").unwrap(), "blog/post.v2");
    }

    #[test]
    fn test_parent() {
        assert_eq!(parent(""), None);
        assert_eq!(parent("blog"), Some(""));
        assert_eq!(parent("blog/post1"), Some("blog"));
        assert_eq!(parent("a/b/c"), Some("a/b"));
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug(""), "");
        assert_eq!(slug("blog"), "blog");
        assert_eq!(slug("blog/post1"), "post1");
    }

    #[test]
    fn test_to_url() {
        assert_eq!(to_url(""), "");
        assert_eq!(to_url("blog/post1"), "/blog/post1");
    }

    #[test]
    fn test_split_order_prefix() {
        assert_eq!(split_order_prefix("01.blog"), (Some("01"), "blog"));
        assert_eq!(split_order_prefix("2.item.md"), (Some("2"), "item.md"));
        assert_eq!(split_order_prefix("blog"), (None, "blog"));
        assert_eq!(split_order_prefix("item.md"), (None, "item.md"));
        assert_eq!(split_order_prefix("01."), (None, "01."));
        assert_eq!(split_order_prefix(".hidden"), (None, ".hidden"));
    }

    #[test]
    fn test_is_modular() {
        assert!(is_modular("_hero"));
        assert!(!is_modular("hero"));
    }
}

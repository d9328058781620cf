//! Page tree discovery by filesystem walking.
//!
//! Maps directories to [`PageNode`]s. Each directory below the root is one
//! node; its route segment is the directory name without the numeric ordering
//! prefix. Sibling directories with the same segment (`01.blog`, `02.blog`)
//! would share a route, so only the first by name is part of the tree. The
//! alphabetically first `.md` file inside a directory is the node's content
//! file.

use std::fs;
use std::path::{Path, PathBuf};

use folio_storage::{ChildRef, PageNode, StorageError, route};

use crate::BACKEND;

/// Directory entry with cached file type.
#[derive(Debug)]
pub(crate) struct Entry {
    pub name: String,
    pub is_dir: bool,
}

impl Entry {
    /// Route segment for a directory entry (`01.blog` → `blog`).
    fn segment(&self) -> &str {
        route::split_order_prefix(&self.name).1
    }

    fn is_content_file(&self) -> bool {
        !self.is_dir
            && Path::new(&self.name)
                .extension()
                .is_some_and(|e| e == "md")
    }
}

/// Discovers page nodes by walking the filesystem.
pub(crate) struct Scanner {
    source_dir: PathBuf,
}

impl Scanner {
    /// Create a new Scanner rooted at `source_dir`.
    pub fn new(source_dir: PathBuf) -> Self {
        Self { source_dir }
    }

    /// Scan the whole tree, excluding the root node.
    ///
    /// Returns an empty Vec if the source directory doesn't exist.
    pub fn scan(&self) -> Result<Vec<PageNode>, StorageError> {
        let mut nodes = Vec::new();
        if self.source_dir.is_dir() {
            let entries = self.read_entries(Path::new(""))?;
            self.scan_children("", Path::new(""), &entries, &mut nodes)?;
        }
        Ok(nodes)
    }

    fn scan_children(
        &self,
        parent_route: &str,
        parent_dir: &Path,
        entries: &[Entry],
        nodes: &mut Vec<PageNode>,
    ) -> Result<(), StorageError> {
        for entry in unique_dirs(entries, parent_dir) {
            let child_route = route::join(parent_route, entry.segment());
            let child_dir = parent_dir.join(&entry.name);
            let child_entries = self.read_entries(&child_dir)?;

            nodes.push(self.build_node(&child_route, child_dir.clone(), &child_entries)?);
            self.scan_children(&child_route, &child_dir, &child_entries, nodes)?;
        }
        Ok(())
    }

    /// Resolve a normalized route to its directory relative to the root.
    ///
    /// Returns `None` if any segment has no matching directory.
    pub fn resolve(&self, route: &str) -> Result<Option<PathBuf>, StorageError> {
        if !self.source_dir.is_dir() {
            return Ok(None);
        }

        let mut rel_dir = PathBuf::new();
        for segment in route.split('/').filter(|s| !s.is_empty()) {
            let entries = self.read_entries(&rel_dir)?;
            match match_segment(&entries, &rel_dir, segment) {
                Some(name) => rel_dir.push(name),
                None => return Ok(None),
            }
        }
        Ok(Some(rel_dir))
    }

    /// Resolve a route and build its node.
    pub fn node(&self, route: &str) -> Result<Option<PageNode>, StorageError> {
        let Some(rel_dir) = self.resolve(route)? else {
            return Ok(None);
        };
        let entries = self.read_entries(&rel_dir)?;
        self.build_node(route, rel_dir, &entries).map(Some)
    }

    /// Build a node from its directory listing.
    ///
    /// Child directories are listed too, to tell pages from directory-only children.
    fn build_node(
        &self,
        node_route: &str,
        rel_dir: PathBuf,
        entries: &[Entry],
    ) -> Result<PageNode, StorageError> {
        let dir_name = rel_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut content_files = entries.iter().filter(|e| e.is_content_file());
        let file_name = content_files.next().map(|e| e.name.clone());
        if content_files.next().is_some() {
            tracing::warn!(
                route = %node_route,
                dir = %rel_dir.display(),
                "Multiple content files, using the first"
            );
        }

        let mut children = Vec::new();
        for entry in unique_dirs(entries, &rel_dir) {
            let child_entries = self.read_entries(&rel_dir.join(&entry.name))?;
            children.push(ChildRef {
                route: route::join(node_route, entry.segment()),
                has_content: child_entries.iter().any(Entry::is_content_file),
                modular: route::is_modular(entry.segment()),
            });
        }

        Ok(PageNode {
            route: node_route.to_owned(),
            modular: route::is_modular(route::slug(node_route)),
            visible: route::split_order_prefix(&dir_name).0.is_some(),
            dir: rel_dir,
            file_name,
            children,
        })
    }

    /// List a directory: hidden entries skipped, sorted by name.
    pub fn read_entries(&self, rel_dir: &Path) -> Result<Vec<Entry>, StorageError> {
        let dir = self.source_dir.join(rel_dir);
        let read_dir = fs::read_dir(&dir)
            .map_err(|e| StorageError::io(e, Some(dir.clone())).with_backend(BACKEND))?;

        let mut entries: Vec<Entry> = read_dir
            .filter_map(Result::ok)
            .filter_map(|e| {
                let is_dir = e.file_type().is_ok_and(|t| t.is_dir());
                let Ok(name) = e.file_name().into_string() else {
                    tracing::warn!(path = %e.path().display(), "Skipping non UTF-8 file name");
                    return None;
                };
                (!name.starts_with('.')).then_some(Entry { name, is_dir })
            })
            .collect();

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

/// Find the directory name matching a route segment inside `rel_dir`.
pub(crate) fn match_segment<'a>(
    entries: &'a [Entry],
    rel_dir: &Path,
    segment: &str,
) -> Option<&'a str> {
    unique_dirs(entries, rel_dir)
        .into_iter()
        .find(|e| e.segment() == segment)
        .map(|e| e.name.as_str())
}

/// Subdirectories with distinct route segments, in name order.
///
/// A directory whose segment repeats an earlier sibling's is skipped with a
/// warning.
fn unique_dirs<'a>(entries: &'a [Entry], rel_dir: &Path) -> Vec<&'a Entry> {
    let mut dirs: Vec<&Entry> = Vec::new();
    for entry in entries.iter().filter(|e| e.is_dir) {
        if let Some(kept) = dirs.iter().find(|d| d.segment() == entry.segment()) {
            tracing::warn!(
                dir = %rel_dir.display(),
                kept = %kept.name,
                skipped = %entry.name,
                "Duplicate route segment, skipping directory"
            );
            continue;
        }
        dirs.push(entry);
    }
    dirs
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn create_test_dir() -> tempfile::TempDir {
        tempfile::tempdir().unwrap()
    }

    fn routes(nodes: &[PageNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.route.as_str()).collect()
    }

    #[test]
    fn test_scan_missing_dir() {
        let scanner = Scanner::new(PathBuf::from("/nonexistent"));
        assert!(scanner.scan().unwrap().is_empty());
    }

    #[test]
    fn test_scan_is_depth_first_in_name_order() {
        let temp_dir = create_test_dir();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("02.blog/post2")).unwrap();
        fs::create_dir_all(root.join("02.blog/post1")).unwrap();
        fs::create_dir_all(root.join("01.home")).unwrap();
        fs::write(root.join("01.home/default.md"), "home").unwrap();

        let nodes = Scanner::new(root.to_path_buf()).scan().unwrap();

        assert_eq!(
            routes(&nodes),
            vec!["home", "blog", "blog/post1", "blog/post2"]
        );
    }

    #[test]
    fn test_scan_skips_hidden_dirs() {
        let temp_dir = create_test_dir();
        fs::create_dir_all(temp_dir.path().join(".git/objects")).unwrap();
        fs::create_dir_all(temp_dir.path().join("about")).unwrap();

        let nodes = Scanner::new(temp_dir.path().to_path_buf()).scan().unwrap();

        assert_eq!(routes(&nodes), vec!["about"]);
    }

    #[test]
    fn test_build_node_flags() {
        let temp_dir = create_test_dir();
        fs::create_dir_all(temp_dir.path().join("01.blog/_hero")).unwrap();
        fs::write(temp_dir.path().join("01.blog/blog.md"), "").unwrap();
        fs::write(temp_dir.path().join("01.blog/_hero/hero.md"), "").unwrap();

        let scanner = Scanner::new(temp_dir.path().to_path_buf());
        let blog = scanner.node("blog").unwrap().unwrap();
        let hero = scanner.node("blog/_hero").unwrap().unwrap();

        assert_eq!(blog.dir, PathBuf::from("01.blog"));
        assert_eq!(blog.file_name.as_deref(), Some("blog.md"));
        assert!(blog.visible);
        assert!(!blog.modular);
        assert!(hero.modular);
        assert!(!hero.visible);
        assert_eq!(blog.children.len(), 1);
        assert!(blog.children[0].modular);
    }

    #[test]
    fn test_build_node_ignores_non_markdown_files() {
        let temp_dir = create_test_dir();
        fs::create_dir_all(temp_dir.path().join("gallery")).unwrap();
        fs::write(temp_dir.path().join("gallery/photo.jpg"), "").unwrap();

        let node = Scanner::new(temp_dir.path().to_path_buf())
            .node("gallery")
            .unwrap()
            .unwrap();

        assert!(!node.is_page());
    }

    #[test]
    fn test_duplicate_segments_use_first_dir() {
        let temp_dir = create_test_dir();
        fs::create_dir_all(temp_dir.path().join("01.blog")).unwrap();
        fs::create_dir_all(temp_dir.path().join("02.blog/post1")).unwrap();
        fs::create_dir_all(temp_dir.path().join("blog")).unwrap();

        let scanner = Scanner::new(temp_dir.path().to_path_buf());

        assert_eq!(routes(&scanner.scan().unwrap()), vec!["blog"]);
        assert_eq!(
            scanner.resolve("blog").unwrap(),
            Some(PathBuf::from("01.blog"))
        );
        assert_eq!(scanner.node("").unwrap().unwrap().children.len(), 1);
        assert_eq!(scanner.resolve("blog/post1").unwrap(), None);
    }

    #[test]
    fn test_resolve_matches_segment_not_dir_name() {
        let temp_dir = create_test_dir();
        fs::create_dir_all(temp_dir.path().join("01.blog")).unwrap();

        let scanner = Scanner::new(temp_dir.path().to_path_buf());

        assert_eq!(scanner.resolve("01.blog").unwrap(), None);
        assert_eq!(
            scanner.resolve("blog").unwrap(),
            Some(PathBuf::from("01.blog"))
        );
    }

    #[test]
    fn test_resolve_root_and_missing() {
        let temp_dir = create_test_dir();
        let scanner = Scanner::new(temp_dir.path().to_path_buf());

        assert_eq!(scanner.resolve("").unwrap(), Some(PathBuf::new()));
        assert_eq!(scanner.resolve("missing").unwrap(), None);
    }

    #[test]
    fn test_children_report_content() {
        let temp_dir = create_test_dir();
        fs::create_dir_all(temp_dir.path().join("blog/archive")).unwrap();
        fs::create_dir_all(temp_dir.path().join("blog/post1")).unwrap();
        fs::write(temp_dir.path().join("blog/post1/item.md"), "").unwrap();

        let node = Scanner::new(temp_dir.path().to_path_buf())
            .node("blog")
            .unwrap()
            .unwrap();

        assert_eq!(node.children[0].route, "blog/archive");
        assert!(!node.children[0].has_content);
        assert_eq!(node.children[1].route, "blog/post1");
        assert!(node.children[1].has_content);
    }
}

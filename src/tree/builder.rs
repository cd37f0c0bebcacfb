//! TreeBuilder - turns a flat path set into a deduplicated hierarchy

use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use crate::error::TreeError;

use super::node::{Node, NodeKind, Tree};

/// Incrementally inserts paths into a tree.
///
/// Intermediate segments become `Directory` nodes and the final segment of
/// each path becomes a `File` node. Shared prefixes are fetched rather than
/// recreated, so every distinct relative path maps to exactly one node.
pub struct TreeBuilder {
    tree: Tree,
    inserted: usize,
}

impl TreeBuilder {
    pub fn new(root_id: impl Into<String>, base_path: impl Into<PathBuf>) -> Self {
        Self {
            tree: Tree::new(root_id, base_path),
            inserted: 0,
        }
    }

    /// Insert one path. On error the tree is left untouched.
    pub fn insert(&mut self, path: &Path) -> Result<(), TreeError> {
        let segments = self.segments(path)?;
        self.check(path, &segments)?;

        let last = segments.len() - 1;
        let mut full_path = self.tree.base_path().to_path_buf();
        let mut relative = String::new();
        let mut node = &mut self.tree.root;

        for (i, segment) in segments.iter().enumerate() {
            if i > 0 {
                relative.push('/');
            }
            relative.push_str(segment);
            full_path.push(segment);

            let kind = if i == last {
                NodeKind::File
            } else {
                NodeKind::Directory
            };
            node = node
                .children
                .entry((*segment).to_string())
                .or_insert_with(|| Node::new(*segment, full_path.clone(), relative.clone(), kind));
        }

        self.inserted += 1;
        Ok(())
    }

    /// Number of successful inserts so far, repeats included.
    pub fn inserted(&self) -> usize {
        self.inserted
    }

    pub fn finish(self) -> Tree {
        self.tree
    }

    /// Split a path into segments relative to the base path.
    ///
    /// Only an absolute base is stripped. With a relative base every path is
    /// already taken as relative to it, so `src/x.py` under base `src` stays
    /// `src/x.py`.
    fn segments<'p>(&self, path: &'p Path) -> Result<Vec<&'p str>, TreeError> {
        let base = self.tree.base_path();
        let relative = if base.is_absolute() {
            path.strip_prefix(base).unwrap_or(path)
        } else {
            path
        };
        if relative.is_absolute() {
            return Err(TreeError::malformed(path, "not under the base path"));
        }

        let mut segments = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(segment) => {
                    let segment = segment
                        .to_str()
                        .ok_or_else(|| TreeError::malformed(path, "not valid UTF-8"))?;
                    segments.push(segment);
                }
                Component::CurDir => {}
                Component::ParentDir => {
                    return Err(TreeError::malformed(
                        path,
                        "parent components are not allowed",
                    ));
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(TreeError::malformed(path, "not under the base path"));
                }
            }
        }

        if segments.is_empty() {
            return Err(TreeError::malformed(path, "no path segments"));
        }
        Ok(segments)
    }

    /// Walk the existing nodes along `segments` and reject structural conflicts.
    fn check(&self, path: &Path, segments: &[&str]) -> Result<(), TreeError> {
        let last = segments.len() - 1;
        let root_id = self.tree.root_id();
        let mut node = Some(&self.tree.root);
        let mut relative = String::new();

        for (i, segment) in segments.iter().enumerate() {
            if i > 0 {
                relative.push('/');
            }
            relative.push_str(segment);

            if !root_id.is_empty() && relative == root_id {
                return Err(TreeError::conflict(
                    path,
                    relative,
                    "collides with the root identity",
                ));
            }

            let Some(child) = node.and_then(|n| n.children.get(*segment)) else {
                node = None;
                continue;
            };
            match (child.kind, i == last) {
                (NodeKind::File, false) => {
                    return Err(TreeError::conflict(path, relative, "descends through a file"));
                }
                (NodeKind::Directory, true) => {
                    return Err(TreeError::conflict(
                        path,
                        relative,
                        "names an existing directory as a file",
                    ));
                }
                _ => {}
            }
            node = Some(child);
        }
        Ok(())
    }
}

/// Build a tree from a path set.
///
/// Malformed paths are logged and skipped. The first structural conflict
/// aborts the build, since it means the path set itself is inconsistent.
pub fn build<I, P>(root_id: &str, base_path: &Path, paths: I) -> Result<Tree, TreeError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut builder = TreeBuilder::new(root_id, base_path);
    let mut skipped = 0usize;

    for path in paths {
        match builder.insert(path.as_ref()) {
            Ok(()) => {}
            Err(err @ TreeError::MalformedPath { .. }) => {
                warn!("skipping path: {}", err);
                skipped += 1;
            }
            Err(err) => return Err(err),
        }
    }

    debug!(
        inserted = builder.inserted(),
        skipped, "built tree for '{}'", root_id
    );
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(node: &Node) -> Vec<&str> {
        node.children().map(Node::name).collect()
    }

    #[test]
    fn test_shared_prefix_collapses() {
        let tree = build("repo", Path::new(""), ["a/b.py", "a/c/d.py", "a/c/e.py"]).unwrap();
        assert_eq!(names(tree.root()), vec!["a"]);
        let a = tree.find("a").unwrap();
        assert_eq!(names(a), vec!["b.py", "c"]);
        assert_eq!(names(tree.find("a/c").unwrap()), vec!["d.py", "e.py"]);
        assert_eq!(tree.root().node_count(), 6);
    }

    #[test]
    fn test_node_paths() {
        let tree = build("repo", Path::new("/base"), ["a/c/d.py"]).unwrap();
        let c = tree.find("a/c").unwrap();
        assert_eq!(c.relative_path(), "a/c");
        assert_eq!(c.full_path(), Path::new("/base/a/c"));
        assert_eq!(c.kind(), NodeKind::Directory);
        let d = tree.find("a/c/d.py").unwrap();
        assert_eq!(d.full_path(), Path::new("/base/a/c/d.py"));
        assert_eq!(d.kind(), NodeKind::File);
    }

    #[test]
    fn test_absolute_paths_are_stripped() {
        let tree = build("repo", Path::new("/base"), ["/base/a/b.py", "a/c.py"]).unwrap();
        assert!(tree.find("a/b.py").is_some());
        assert!(tree.find("a/c.py").is_some());
        assert_eq!(tree.root().child_count(), 1);
    }

    #[test]
    fn test_relative_base_is_not_stripped() {
        let tree = build("repo", Path::new("src"), ["src/x.py"]).unwrap();
        let x = tree.find("src/x.py").unwrap();
        assert_eq!(x.full_path(), Path::new("src/src/x.py"));
        assert!(tree.find("x.py").is_none());
    }

    #[test]
    fn test_repeated_path_is_idempotent() {
        let mut builder = TreeBuilder::new("repo", "");
        builder.insert(Path::new("a/b.py")).unwrap();
        builder.insert(Path::new("./a/b.py")).unwrap();
        assert_eq!(builder.inserted(), 2);
        assert_eq!(builder.finish().root().node_count(), 3);
    }

    #[test]
    fn test_malformed_paths() {
        let mut builder = TreeBuilder::new("repo", "/base");
        for bad in ["", ".", "../x.py", "a/../b.py", "/elsewhere/x.py"] {
            let err = builder.insert(Path::new(bad)).unwrap_err();
            assert!(
                matches!(err, TreeError::MalformedPath { .. }),
                "{bad:?} should be malformed, got {err}"
            );
        }
        assert_eq!(builder.inserted(), 0);
    }

    #[test]
    fn test_build_skips_malformed() {
        let tree = build("repo", Path::new(""), ["", "a.py", "../b.py"]).unwrap();
        assert_eq!(names(tree.root()), vec!["a.py"]);
    }

    #[test]
    fn test_descending_through_file_conflicts() {
        let mut builder = TreeBuilder::new("repo", "");
        builder.insert(Path::new("a/b.py")).unwrap();
        let err = builder.insert(Path::new("a/b.py/c.py")).unwrap_err();
        match err {
            TreeError::TreeConflict { at, .. } => assert_eq!(at, "a/b.py"),
            other => panic!("expected conflict, got {other}"),
        }
        // Failed insert leaves no trace
        let tree = builder.finish();
        assert_eq!(tree.find("a/b.py").unwrap().child_count(), 0);
    }

    #[test]
    fn test_file_over_directory_conflicts() {
        let err = build("repo", Path::new(""), ["a/b/c.py", "a/b"]).unwrap_err();
        assert!(matches!(err, TreeError::TreeConflict { .. }));
    }

    #[test]
    fn test_root_identity_collision_conflicts() {
        let err = build("src", Path::new(""), ["src/lib.rs"]).unwrap_err();
        assert!(matches!(err, TreeError::TreeConflict { ref at, .. } if at == "src"));
        // An empty root identity never collides
        assert!(build("", Path::new(""), ["src/lib.rs"]).is_ok());
    }

    #[test]
    fn test_empty_path_set() {
        let tree = build("repo", Path::new("/base"), Vec::<PathBuf>::new()).unwrap();
        assert_eq!(tree.root().child_count(), 0);
        assert_eq!(tree.root_id(), "repo");
        assert_eq!(tree.base_path(), Path::new("/base"));
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let tree = build("repo", Path::new(""), ["A/x.py", "a/x.py"]).unwrap();
        assert_eq!(names(tree.root()), vec!["A", "a"]);
    }
}

//! Node and tree types

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::metric::Metrics;

/// Whether a node was created for an intermediate segment or a final one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Directory,
    File,
}

/// What aggregation learned about a node's backing content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Content {
    /// Not aggregated yet
    #[default]
    Unmeasured,
    /// Metrics are the sum of the children
    Directory,
    /// Decoded as UTF-8, lines counted
    Text,
    /// Could not be decoded as text; bytes only
    Binary,
    /// Path no longer exists
    Missing,
    /// Stat or read failed
    Unreadable,
}

/// One entry of the hierarchy.
///
/// Children are keyed by name and iterate in byte-wise name order, so the
/// traversal order never depends on the order paths were inserted.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) name: String,
    pub(crate) full_path: PathBuf,
    pub(crate) relative_path: String,
    pub(crate) kind: NodeKind,
    pub(crate) children: BTreeMap<String, Node>,
    pub(crate) metrics: Metrics,
    pub(crate) content: Content,
}

impl Node {
    pub(crate) fn new(
        name: impl Into<String>,
        full_path: impl Into<PathBuf>,
        relative_path: impl Into<String>,
        kind: NodeKind,
    ) -> Self {
        Self {
            name: name.into(),
            full_path: full_path.into(),
            relative_path: relative_path.into(),
            kind,
            children: BTreeMap::new(),
            metrics: Metrics::ZERO,
            content: Content::Unmeasured,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_path(&self) -> &Path {
        &self.full_path
    }

    /// Path relative to the scan root, `/`-separated. Unique within a tree.
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.children.values()
    }

    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    pub fn lines(&self) -> u64 {
        self.metrics.lines
    }

    pub fn bytes(&self) -> u64 {
        self.metrics.bytes
    }

    pub fn content(&self) -> Content {
        self.content
    }

    /// Look up a descendant by its relative path.
    pub fn find(&self, relative_path: &str) -> Option<&Node> {
        if relative_path.is_empty() {
            return Some(self);
        }
        relative_path
            .split('/')
            .try_fold(self, |node, segment| node.children.get(segment))
    }

    /// Number of nodes in this subtree, this one included.
    pub fn node_count(&self) -> usize {
        1 + self.children.values().map(Node::node_count).sum::<usize>()
    }

    /// Visit every `File` node in this subtree in traversal order.
    pub fn files(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        collect_files(self, &mut out);
        out
    }
}

fn collect_files<'a>(node: &'a Node, out: &mut Vec<&'a Node>) {
    if node.kind == NodeKind::File {
        out.push(node);
    }
    for child in node.children.values() {
        collect_files(child, out);
    }
}

/// A built hierarchy: the root node plus the identity renderers use for it.
#[derive(Debug, Clone)]
pub struct Tree {
    pub(crate) root_id: String,
    pub(crate) root: Node,
}

impl Tree {
    pub(crate) fn new(root_id: impl Into<String>, base_path: impl Into<PathBuf>) -> Self {
        Self {
            root_id: root_id.into(),
            root: Node::new("", base_path, "", NodeKind::Directory),
        }
    }

    /// Identity of the root, used as the parent of top-level records.
    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    /// Base path every node's `full_path` is resolved against.
    pub fn base_path(&self) -> &Path {
        &self.root.full_path
    }

    pub fn find(&self, relative_path: &str) -> Option<&Node> {
        self.root.find(relative_path)
    }

    pub fn totals(&self) -> Metrics {
        self.root.metrics
    }

    /// Directory and file counts below the root.
    pub fn counts(&self) -> (usize, usize) {
        let files = self.root.files().len();
        let nodes = self.root.node_count() - 1;
        (nodes - files, files)
    }
}

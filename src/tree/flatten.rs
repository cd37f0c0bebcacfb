//! Pre-order flattening into parent-referencing records

use super::metric::{Metric, Metrics};
use super::node::{Content, Node, NodeKind, Tree};

/// One node of the flattened tree, borrowed from the tree it came from.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    parent_id: &'a str,
    node: &'a Node,
    depth: usize,
}

impl<'a> Record<'a> {
    pub fn node(&self) -> &'a Node {
        self.node
    }

    pub fn name(&self) -> &'a str {
        self.node.name()
    }

    /// Stable identity: the node's relative path.
    pub fn id(&self) -> &'a str {
        self.node.relative_path()
    }

    /// Identity of the parent record, or the tree's root identity.
    pub fn parent_id(&self) -> &'a str {
        self.parent_id
    }

    /// Nesting depth, 1 for children of the root.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn kind(&self) -> NodeKind {
        self.node.kind()
    }

    pub fn content(&self) -> Content {
        self.node.content()
    }

    pub fn metrics(&self) -> Metrics {
        self.node.metrics()
    }

    pub fn lines(&self) -> u64 {
        self.node.lines()
    }

    pub fn bytes(&self) -> u64 {
        self.node.bytes()
    }

    pub fn value(&self, metric: Metric) -> u64 {
        self.node.metrics().get(metric)
    }
}

/// Flatten a tree in pre-order, skipping the root.
///
/// Every record appears after the record of its parent; top-level records
/// reference the tree's root identity instead.
pub fn flatten(tree: &Tree) -> Vec<Record<'_>> {
    let mut records = Vec::with_capacity(tree.root().node_count().saturating_sub(1));
    for child in tree.root().children() {
        push_subtree(tree.root_id(), child, 1, &mut records);
    }
    records
}

fn push_subtree<'a>(parent_id: &'a str, node: &'a Node, depth: usize, out: &mut Vec<Record<'a>>) {
    out.push(Record {
        parent_id,
        node,
        depth,
    });
    for child in node.children() {
        push_subtree(node.relative_path(), child, depth + 1, out);
    }
}

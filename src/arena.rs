use generational_arena::{Arena, Index};
use itertools::Itertools;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, instrument};

/// Separator between the segments of a dotted path.
pub const SEPARATOR: char = '.';

/// Panic message raised by [`Root::branch`] on an empty path.
pub const EMPTY_BRANCH_PATH: &str = "cannot have an empty branch path";

/// Handle to a node stored in a [`Root`].
///
/// Only meaningful for the root that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Index);

/// A single namespace entry.
#[derive(Debug)]
struct Node {
    /// Last segment of the path, unique among siblings
    name: String,
    /// Absolute dotted path from the tree root
    path: String,
    /// Number of segments in `path`
    depth: usize,
    /// Direct children keyed by name
    children: HashMap<String, NodeId>,
}

/// Top level namespace of the tree and sole owner of every node.
///
/// Nodes live by value in a generational arena. The top level map, each
/// node's children and the flat path index all hold [`NodeId`] handles
/// into that arena. Nodes are created lazily by [`Root::branch`] and
/// [`Root::child`] and are never removed, so the tree only grows.
#[derive(Debug)]
pub struct Root {
    /// Arena storage for all nodes
    arena: Arena<Node>,
    /// Depth-1 nodes keyed by name
    top_level: HashMap<String, NodeId>,
    /// Every node keyed by absolute path
    index: HashMap<String, NodeId>,
}

impl Default for Root {
    fn default() -> Self {
        Self::new()
    }
}

impl Root {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            top_level: HashMap::new(),
            index: HashMap::new(),
        }
    }

    /// Resolves a dotted path, creating every missing node along the way.
    ///
    /// `"client.as.organization.name"` resolves the top level node `client`
    /// and then walks `as`, `organization` and `name` through [`Root::child`].
    /// Resolving the same path again returns the same handle.
    ///
    /// Empty segments after the first are taken literally as empty child
    /// names; callers wanting stricter input validate before calling.
    ///
    /// # Panics
    ///
    /// Panics with [`EMPTY_BRANCH_PATH`] if `path` is empty or starts with
    /// the separator. Nothing is created in that case.
    #[instrument(level = "trace", skip(self))]
    pub fn branch(&mut self, path: &str) -> NodeId {
        assert!(!path.is_empty(), "{}", EMPTY_BRANCH_PATH);

        match path.split_once(SEPARATOR) {
            None => self.top_level_node(path),
            Some((head, rest)) => {
                let mut node = self.branch(head);
                for segment in rest.split(SEPARATOR) {
                    node = self.child(node, segment);
                }
                node
            }
        }
    }

    /// Like [`Root::branch`], returning a mutable view for further descent.
    pub fn branch_mut(&mut self, path: &str) -> NodeMut<'_> {
        let id = self.branch(path);
        NodeMut { root: self, id }
    }

    /// Returns the child `name` of `parent`, creating and indexing it if absent.
    ///
    /// `name` is a single segment; splitting dotted paths is the caller's job.
    #[instrument(level = "trace", skip(self))]
    pub fn child(&mut self, parent: NodeId, name: &str) -> NodeId {
        if let Some(&existing) = self.arena[parent.0].children.get(name) {
            return existing;
        }

        let (path, depth) = {
            let parent_node = &self.arena[parent.0];
            (
                format!("{}{}{}", parent_node.path, SEPARATOR, name),
                parent_node.depth + 1,
            )
        };
        let id = self.insert_node(name, path, depth);
        self.arena[parent.0].children.insert(name.to_string(), id);
        id
    }

    fn top_level_node(&mut self, name: &str) -> NodeId {
        if let Some(&existing) = self.top_level.get(name) {
            return existing;
        }

        let id = self.insert_node(name, name.to_string(), 1);
        self.top_level.insert(name.to_string(), id);
        id
    }

    fn insert_node(&mut self, name: &str, path: String, depth: usize) -> NodeId {
        debug!(path = %path, "creating node");
        let node = Node {
            name: name.to_string(),
            path: path.clone(),
            depth,
            children: HashMap::new(),
        };
        let id = NodeId(self.arena.insert(node));
        self.index.insert(path, id);
        id
    }

    /// Top level nodes in ascending name order, as of this call.
    #[instrument(level = "trace", skip(self))]
    pub fn list_children(&self) -> Children<'_> {
        Children::new(self, sorted_ids(&self.top_level))
    }

    /// Pre-order traversal of the whole tree, siblings in name order.
    pub fn walk(&self) -> Walk<'_> {
        Walk::new(self, sorted_ids(&self.top_level))
    }

    /// # Panics
    ///
    /// Panics if `id` was not produced by this root.
    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef {
            root: self,
            id,
            node: &self.arena[id.0],
        }
    }

    pub fn node_mut(&mut self, id: NodeId) -> NodeMut<'_> {
        NodeMut { root: self, id }
    }

    /// Looks up a node by absolute path without creating anything.
    pub fn get(&self, path: &str) -> Option<NodeRef<'_>> {
        self.index.get(path).map(|&id| self.node(id))
    }

    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    /// Number of nodes in the tree, i.e. the size of the path index.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn top_level_len(&self) -> usize {
        self.top_level.len()
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.walk().map(|node| node.depth()).max().unwrap_or(0)
    }

    /// Paths of all nodes without children, in walk order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_paths(&self) -> Vec<&str> {
        self.walk()
            .filter(|node| node.is_leaf())
            .map(|node| node.path())
            .collect()
    }
}

fn sorted_ids(entries: &HashMap<String, NodeId>) -> Vec<NodeId> {
    entries
        .iter()
        .sorted_unstable_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, &id)| id)
        .collect()
}

/// Read-only view of a node together with the root that owns it.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    root: &'a Root,
    id: NodeId,
    node: &'a Node,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &'a str {
        &self.node.name
    }

    pub fn path(&self) -> &'a str {
        &self.node.path
    }

    pub fn depth(&self) -> usize {
        self.node.depth
    }

    pub fn child_count(&self) -> usize {
        self.node.children.len()
    }

    pub fn is_leaf(&self) -> bool {
        self.node.children.is_empty()
    }

    pub fn get_child(&self, name: &str) -> Option<NodeRef<'a>> {
        self.node.children.get(name).map(|&id| self.root.node(id))
    }

    /// Direct children in ascending name order, as of this call.
    pub fn list_children(&self) -> Children<'a> {
        Children::new(self.root, sorted_ids(&self.node.children))
    }

    /// Pre-order traversal of this subtree, starting with this node.
    pub fn walk(&self) -> Walk<'a> {
        Walk::new(self.root, vec![self.id])
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("path", &self.node.path)
            .finish()
    }
}

impl fmt::Display for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.node.path)
    }
}

/// Mutable view of a node; the handle back to the root is what lets a
/// node register new children in the global index.
pub struct NodeMut<'a> {
    root: &'a mut Root,
    id: NodeId,
}

impl<'a> NodeMut<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.root.arena[self.id.0].name
    }

    pub fn path(&self) -> &str {
        &self.root.arena[self.id.0].path
    }

    /// Resolves or creates the direct child `name` and moves the view onto it.
    pub fn child(self, name: &str) -> NodeMut<'a> {
        let id = self.root.child(self.id, name);
        NodeMut {
            root: self.root,
            id,
        }
    }

    pub fn view(&self) -> NodeRef<'_> {
        self.root.node(self.id)
    }
}

/// Ordered snapshot of sibling nodes.
///
/// The order is fixed when the iterator is created; it yields each
/// sibling once and cannot be restarted.
pub struct Children<'a> {
    root: &'a Root,
    ids: std::vec::IntoIter<NodeId>,
}

impl<'a> Children<'a> {
    fn new(root: &'a Root, ids: Vec<NodeId>) -> Self {
        Self {
            root,
            ids: ids.into_iter(),
        }
    }
}

impl<'a> Iterator for Children<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.ids.next().map(|id| self.root.node(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl ExactSizeIterator for Children<'_> {}

pub struct Walk<'a> {
    root: &'a Root,
    stack: Vec<NodeId>,
}

impl<'a> Walk<'a> {
    fn new(root: &'a Root, mut start: Vec<NodeId>) -> Self {
        start.reverse();
        Self { root, stack: start }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = NodeRef<'a>;

    #[instrument(level = "trace", skip(self))]
    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        let node = self.root.node(current);
        // Push children in reverse order for left-to-right traversal
        let children = sorted_ids(&node.node.children);
        self.stack.extend(children.into_iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names<'a>(children: impl Iterator<Item = NodeRef<'a>>) -> Vec<&'a str> {
        children.map(|node| node.name()).collect()
    }

    #[test]
    fn branch_creates_every_ancestor() {
        let mut root = Root::new();
        let leaf = root.branch("a.b.c");

        assert_eq!(root.len(), 3);
        assert_eq!(root.top_level_len(), 1);
        for path in ["a", "a.b", "a.b.c"] {
            assert!(root.contains(path), "missing {path}");
        }
        let leaf = root.node(leaf);
        assert_eq!(leaf.name(), "c");
        assert_eq!(leaf.path(), "a.b.c");
        assert_eq!(leaf.depth(), 3);
    }

    #[test]
    fn branch_shares_ancestors() {
        let mut root = Root::new();
        root.branch("a.b.c");
        root.branch("a.b.d");

        assert_eq!(root.len(), 4);
        let ab = root.get("a.b").unwrap();
        assert_eq!(names(ab.list_children()), vec!["c", "d"]);
    }

    #[test]
    fn top_level_listing_is_sorted() {
        let mut root = Root::new();
        root.branch("z");
        root.branch("a");

        assert_eq!(names(root.list_children()), vec!["a", "z"]);
    }

    #[test]
    fn child_is_idempotent_and_indexed() {
        let mut root = Root::new();
        let a = root.branch("a");
        let first = root.child(a, "b");
        let second = root.child(a, "b");

        assert_eq!(first, second);
        assert_eq!(root.get("a.b").map(|n| n.id()), Some(first));
        assert_eq!(root.branch("a.b"), first);
    }

    #[test]
    fn node_mut_chains_through_children() {
        let mut root = Root::new();
        let leaf = root.branch_mut("client").child("as").child("organization");
        assert_eq!(leaf.path(), "client.as.organization");
        assert_eq!(leaf.name(), "organization");
        assert_eq!(leaf.view().depth(), 3);
        let id = leaf.id();

        assert_eq!(root.branch("client.as.organization"), id);
        assert_eq!(root.len(), 3);
    }

    #[test]
    fn empty_inner_segment_is_a_literal_child() {
        let mut root = Root::new();
        let id = root.branch("a..b");
        let node = root.node(id);

        assert_eq!(node.path(), "a..b");
        assert_eq!(node.name(), "b");
        assert!(root.contains("a."));
        assert_eq!(root.len(), 3);
    }

    #[test]
    #[should_panic(expected = "cannot have an empty branch path")]
    fn empty_path_panics() {
        let mut root = Root::new();
        root.branch("");
    }

    #[test]
    #[should_panic(expected = "cannot have an empty branch path")]
    fn leading_separator_panics() {
        let mut root = Root::new();
        root.branch(".a");
    }

    #[test]
    fn walk_is_preorder_sorted() {
        let mut root = Root::new();
        root.branch("b.y");
        root.branch("a.z");
        root.branch("a.b.c");

        let paths: Vec<&str> = root.walk().map(|n| n.path()).collect();
        assert_eq!(paths, vec!["a", "a.b", "a.b.c", "a.z", "b", "b.y"]);
        assert_eq!(root.depth(), 3);
        assert_eq!(root.leaf_paths(), vec!["a.b.c", "a.z", "b.y"]);
    }

    #[test]
    fn empty_root() {
        let root = Root::default();
        assert!(root.is_empty());
        assert_eq!(root.list_children().len(), 0);
        assert_eq!(root.walk().count(), 0);
        assert_eq!(root.depth(), 0);
    }
}

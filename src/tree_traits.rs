use termtree::Tree;
use tracing::instrument;

use crate::arena::{NodeRef, Root};
use crate::config::DEFAULT_ROOT_LABEL;

pub trait TreeRender {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeRender for NodeRef<'_> {
    fn to_tree_string(&self) -> Tree<String> {
        // Children in list order so the output is stable
        let leaves: Vec<_> = self
            .list_children()
            .map(|child| child.to_tree_string())
            .collect();

        Tree::new(self.name().to_string()).with_leaves(leaves)
    }
}

impl TreeRender for Root {
    fn to_tree_string(&self) -> Tree<String> {
        labeled_tree(self, DEFAULT_ROOT_LABEL)
    }
}

/// Renders all top level nodes under a synthetic root called `label`.
#[instrument(level = "debug", skip(root))]
pub fn labeled_tree(root: &Root, label: &str) -> Tree<String> {
    let leaves: Vec<_> = root
        .list_children()
        .map(|node| node.to_tree_string())
        .collect();

    Tree::new(label.to_string()).with_leaves(leaves)
}

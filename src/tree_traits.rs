/*
Rendering lives in a trait so the same conversion serves live handles and
bare arenas.
 */
use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::domain::{ArenaNode, NodeRef, TreeArena, TreeNode};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

fn label(node: &ArenaNode) -> String {
    match node.data.location {
        Some(location) => format!("{} {}", node.data, location),
        None => node.data.to_string(),
    }
}

impl TreeNodeConvert for NodeRef {
    #[instrument(level = "trace")]
    fn to_tree_string(&self) -> Tree<String> {
        let root = self
            .tree()
            .with_arena(|arena| arena.get_node(self.index()).map(label))
            .unwrap_or_else(|| "<gone>".to_string());

        let leaves: Vec<_> = self.children().iter().map(|c| c.to_tree_string()).collect();

        Tree::new(root).with_leaves(leaves)
    }
}

impl TreeNodeConvert for TreeArena {
    fn to_tree_string(&self) -> Tree<String> {
        fn build_tree(arena: &TreeArena, node_idx: Index, parent_tree: &mut Tree<String>) {
            if let Some(node) = arena.get_node(node_idx) {
                for &child_idx in &node.children {
                    if let Some(child) = arena.get_node(child_idx) {
                        let mut child_tree = Tree::new(label(child));
                        build_tree(arena, child_idx, &mut child_tree);
                        parent_tree.push(child_tree);
                    }
                }
            }
        }

        match self.root().and_then(|idx| Some((idx, self.get_node(idx)?))) {
            Some((root_idx, root)) => {
                let mut tree = Tree::new(label(root));
                build_tree(self, root_idx, &mut tree);
                tree
            }
            None => Tree::new("Empty tree".to_string()),
        }
    }
}

//! Node contract: the read-only view of an externally owned tree node.
//!
//! The host platform owns the tree and may mutate it between calls. A node
//! handle never guarantees that the node still exists; every accessor returns
//! `None` both for "no such relative" and for "this node is gone".

use std::fmt::Debug;

use crate::domain::{Rect, Role, State};

/// Structural navigation over a tree of nodes.
///
/// Identity is handle equality.
pub trait TreeNode: Clone + PartialEq + Debug {
    fn parent(&self) -> Option<Self>;
    fn first_child(&self) -> Option<Self>;
    fn last_child(&self) -> Option<Self>;
    fn next_sibling(&self) -> Option<Self>;
    fn previous_sibling(&self) -> Option<Self>;

    /// Position among the parent's children; `None` for a node without parent.
    fn index_in_parent(&self) -> Option<usize> {
        self.parent()?;
        let mut index = 0;
        let mut sibling = self.previous_sibling();
        while let Some(current) = sibling {
            index += 1;
            sibling = current.previous_sibling();
        }
        Some(index)
    }

    /// Children in document order.
    fn children(&self) -> Vec<Self> {
        let mut children = Vec::new();
        let mut child = self.first_child();
        while let Some(current) = child {
            child = current.next_sibling();
            children.push(current);
        }
        children
    }
}

/// Semantic attributes of a node, consumed by the predicate library and hit testing.
pub trait AutomationNode: TreeNode {
    fn role(&self) -> Role;
    fn name(&self) -> Option<String>;
    fn value(&self) -> Option<String>;
    fn has_state(&self, state: State) -> bool;
    fn location(&self) -> Option<Rect>;
    fn hierarchical_level(&self) -> Option<u32>;
    fn table_cell_row_index(&self) -> Option<usize>;
    fn table_cell_column_index(&self) -> Option<usize>;
}

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::{AutomationNode, DomainError, DomainResult, Rect, Role, State, TreeNode};

/// Attribute payload for accessibility nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeData {
    pub role: Role,
    pub name: Option<String>,
    pub value: Option<String>,
    pub states: Vec<State>,
    pub location: Option<Rect>,
    /// Heading level, tree item depth, etc.
    pub level: Option<u32>,
    pub row: Option<usize>,
    pub col: Option<usize>,
}

impl NodeData {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            ..Self::default()
        }
    }

    pub fn named(role: Role, name: impl Into<String>) -> Self {
        Self {
            role,
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_location(mut self, location: Rect) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_state(mut self, state: State) -> Self {
        if !self.states.contains(&state) {
            self.states.push(state);
        }
        self
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} \"{}\"", self.role, name),
            None => write!(f, "{}", self.role),
        }
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct ArenaNode {
    pub data: NodeData,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in document order
    pub children: Vec<Index>,
}

/// Arena-based accessibility tree.
///
/// Uses a generational arena so that handles to removed nodes resolve to
/// nothing instead of aliasing a recycled slot.
#[derive(Debug)]
pub struct TreeArena {
    arena: Arena<ArenaNode>,
    root: Option<Index>,
}

impl Default for TreeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> Index {
        let node = ArenaNode {
            data,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&ArenaNode> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut ArenaNode> {
        self.arena.get_mut(idx)
    }

    pub fn contains(&self, idx: Index) -> bool {
        self.arena.contains(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Removes `idx` and its whole subtree. Returns the number of freed nodes.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_subtree(&mut self, idx: Index) -> usize {
        let Some(node) = self.arena.get(idx) else {
            return 0;
        };
        if let Some(parent_idx) = node.parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.retain(|&child| child != idx);
            }
        }
        if self.root == Some(idx) {
            self.root = None;
        }

        let mut removed = 0;
        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.arena.remove(current) {
                stack.extend(node.children);
                removed += 1;
            }
        }
        removed
    }

    /// Re-parents `idx` as the last child of `new_parent`.
    #[instrument(level = "debug", skip(self))]
    pub fn move_node(&mut self, idx: Index, new_parent: Index) -> DomainResult<()> {
        if !self.arena.contains(idx) || !self.arena.contains(new_parent) {
            return Err(DomainError::NodeGone);
        }
        // Refuse to create a cycle.
        let mut ancestor = Some(new_parent);
        while let Some(current) = ancestor {
            if current == idx {
                return Err(DomainError::InvalidMove(
                    "new parent lies inside the moved subtree".to_string(),
                ));
            }
            ancestor = self.arena.get(current).and_then(|n| n.parent);
        }

        let old_parent = self.arena.get(idx).and_then(|n| n.parent);
        if let Some(old) = old_parent {
            if let Some(parent) = self.arena.get_mut(old) {
                parent.children.retain(|&child| child != idx);
            }
        } else if self.root == Some(idx) {
            self.root = None;
        }
        if let Some(parent) = self.arena.get_mut(new_parent) {
            parent.children.push(idx);
        }
        if let Some(node) = self.arena.get_mut(idx) {
            node.parent = Some(new_parent);
        }
        Ok(())
    }

    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        if let Some(root) = self.root {
            self.calculate_depth(root)
        } else {
            0
        }
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Indices of all nodes without children, in document order.
    pub fn leaf_nodes(&self) -> Vec<Index> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(idx, _)| idx)
            .collect()
    }
}

/// Pre-order iterator over the arena.
pub struct TreeIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push(root);
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a ArenaNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Reverse push keeps left-to-right order
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push((root, false));
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a ArenaNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}

/// Shared, mutable handle to a live accessibility tree.
///
/// The tree plays the role of the host platform: it can be mutated at any
/// time between navigation calls, and outstanding [`NodeRef`]s observe the
/// change on their next access.
#[derive(Clone, Default)]
pub struct AxTree {
    arena: Rc<RefCell<TreeArena>>,
}

impl fmt::Debug for AxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.arena.try_borrow() {
            Ok(arena) => f.debug_struct("AxTree").field("len", &arena.len()).finish(),
            Err(_) => f.write_str("AxTree(<borrowed>)"),
        }
    }
}

impl AxTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_arena(arena: TreeArena) -> Self {
        Self {
            arena: Rc::new(RefCell::new(arena)),
        }
    }

    /// Read access to the underlying arena.
    pub fn with_arena<R>(&self, f: impl FnOnce(&TreeArena) -> R) -> R {
        f(&self.arena.borrow())
    }

    pub fn node(&self, idx: Index) -> Option<NodeRef> {
        if self.arena.borrow().contains(idx) {
            Some(NodeRef {
                tree: self.clone(),
                idx,
            })
        } else {
            None
        }
    }

    pub fn root_node(&self) -> Option<NodeRef> {
        let root = self.arena.borrow().root()?;
        self.node(root)
    }

    pub fn len(&self) -> usize {
        self.arena.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.borrow().is_empty()
    }

    /// First node in document order carrying `name`.
    pub fn find_by_name(&self, name: &str) -> Option<NodeRef> {
        let idx = self.with_arena(|arena| {
            arena
                .iter()
                .find(|(_, node)| node.data.name.as_deref() == Some(name))
                .map(|(idx, _)| idx)
        })?;
        self.node(idx)
    }

    /// Appends a node as the last child of `parent`, or as the root.
    pub fn insert(&self, data: NodeData, parent: Option<&NodeRef>) -> NodeRef {
        let idx = self
            .arena
            .borrow_mut()
            .insert_node(data, parent.map(|p| p.idx));
        NodeRef {
            tree: self.clone(),
            idx,
        }
    }

    /// Removes the node and its subtree; returns the number of removed nodes.
    pub fn remove(&self, node: &NodeRef) -> usize {
        self.arena.borrow_mut().remove_subtree(node.idx)
    }

    pub fn move_node(&self, node: &NodeRef, new_parent: &NodeRef) -> DomainResult<()> {
        self.arena.borrow_mut().move_node(node.idx, new_parent.idx)
    }

    /// Applies `f` to the node's data; false if the node is gone.
    pub fn update(&self, node: &NodeRef, f: impl FnOnce(&mut NodeData)) -> bool {
        match self.arena.borrow_mut().get_node_mut(node.idx) {
            Some(entry) => {
                f(&mut entry.data);
                true
            }
            None => false,
        }
    }

    fn same_tree(&self, other: &AxTree) -> bool {
        Rc::ptr_eq(&self.arena, &other.arena)
    }
}

/// Handle to one node of an [`AxTree`].
///
/// Every accessor re-resolves the handle, so a removed node simply stops
/// having relatives and attributes.
#[derive(Clone)]
pub struct NodeRef {
    tree: AxTree,
    idx: Index,
}

impl NodeRef {
    pub fn index(&self) -> Index {
        self.idx
    }

    pub fn tree(&self) -> &AxTree {
        &self.tree
    }

    /// False once the node has been removed from its tree.
    pub fn is_alive(&self) -> bool {
        self.tree.arena.borrow().contains(self.idx)
    }

    pub fn data(&self) -> Option<NodeData> {
        self.read(|node| node.data.clone())
    }

    fn read<R>(&self, f: impl FnOnce(&ArenaNode) -> R) -> Option<R> {
        let arena = self.tree.arena.borrow();
        arena.get_node(self.idx).map(f)
    }

    fn wrap(&self, idx: Option<Index>) -> Option<NodeRef> {
        idx.and_then(|idx| self.tree.node(idx))
    }

    fn sibling(&self, offset: isize) -> Option<NodeRef> {
        let idx = {
            let arena = self.tree.arena.borrow();
            let parent = arena.get_node(self.idx)?.parent?;
            let siblings = &arena.get_node(parent)?.children;
            let position = siblings.iter().position(|&c| c == self.idx)?;
            let target = position.checked_add_signed(offset)?;
            siblings.get(target).copied()
        };
        self.wrap(idx)
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        self.idx == other.idx && self.tree.same_tree(&other.tree)
    }
}

impl Eq for NodeRef {}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.idx.into_raw_parts();
        let label = self
            .tree
            .arena
            .try_borrow()
            .ok()
            .and_then(|arena| arena.get_node(self.idx).map(|n| n.data.to_string()));
        match label {
            Some(label) => write!(f, "NodeRef({} #{}v{})", label, slot, generation),
            None => write!(f, "NodeRef(<gone> #{}v{})", slot, generation),
        }
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.data() {
            Some(data) => write!(f, "{}", data),
            None => f.write_str("<gone>"),
        }
    }
}

impl TreeNode for NodeRef {
    fn parent(&self) -> Option<Self> {
        let idx = self.read(|node| node.parent)?;
        self.wrap(idx)
    }

    fn first_child(&self) -> Option<Self> {
        let idx = self.read(|node| node.children.first().copied())?;
        self.wrap(idx)
    }

    fn last_child(&self) -> Option<Self> {
        let idx = self.read(|node| node.children.last().copied())?;
        self.wrap(idx)
    }

    fn next_sibling(&self) -> Option<Self> {
        self.sibling(1)
    }

    fn previous_sibling(&self) -> Option<Self> {
        self.sibling(-1)
    }

    fn index_in_parent(&self) -> Option<usize> {
        let arena = self.tree.arena.borrow();
        let parent = arena.get_node(self.idx)?.parent?;
        arena
            .get_node(parent)?
            .children
            .iter()
            .position(|&c| c == self.idx)
    }
}

impl AutomationNode for NodeRef {
    fn role(&self) -> Role {
        self.read(|node| node.data.role).unwrap_or(Role::Unknown)
    }

    fn name(&self) -> Option<String> {
        self.read(|node| node.data.name.clone()).flatten()
    }

    fn value(&self) -> Option<String> {
        self.read(|node| node.data.value.clone()).flatten()
    }

    fn has_state(&self, state: State) -> bool {
        self.read(|node| node.data.states.contains(&state))
            .unwrap_or(false)
    }

    fn location(&self) -> Option<Rect> {
        self.read(|node| node.data.location).flatten()
    }

    fn hierarchical_level(&self) -> Option<u32> {
        self.read(|node| node.data.level).flatten()
    }

    fn table_cell_row_index(&self) -> Option<usize> {
        self.read(|node| node.data.row).flatten()
    }

    fn table_cell_column_index(&self) -> Option<usize> {
        self.read(|node| node.data.col).flatten()
    }
}

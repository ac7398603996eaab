use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::{AxTree, DomainError, DomainResult, NodeData, Rect, Role, State, TreeArena};

/// Serialized description of one node and its subtree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeSpec {
    pub role: Role,
    pub name: Option<String>,
    pub value: Option<String>,
    pub states: Vec<State>,
    pub location: Option<Rect>,
    pub level: Option<u32>,
    pub row: Option<usize>,
    pub col: Option<usize>,
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
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

    pub fn with_children(mut self, children: Vec<NodeSpec>) -> Self {
        self.children = children;
        self
    }

    pub fn with_location(mut self, location: Rect) -> Self {
        self.location = Some(location);
        self
    }

    fn to_data(&self) -> NodeData {
        NodeData {
            role: self.role,
            name: self.name.clone(),
            value: self.value.clone(),
            states: self.states.clone(),
            location: self.location,
            level: self.level,
            row: self.row,
            col: self.col,
        }
    }
}

pub struct TreeBuilder {
    max_depth: usize,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub const DEFAULT_MAX_DEPTH: usize = 512;

    pub fn new() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Builds a live tree from a snapshot, children kept in document order.
    #[instrument(level = "debug", skip(self, spec))]
    pub fn build(&self, spec: &NodeSpec) -> DomainResult<AxTree> {
        let mut arena = TreeArena::new();
        let mut stack = vec![(spec, None, 1usize)];

        while let Some((current, parent_idx, depth)) = stack.pop() {
            if depth > self.max_depth {
                return Err(DomainError::InvalidSnapshot(format!(
                    "tree deeper than {} levels",
                    self.max_depth
                )));
            }
            Self::validate(current)?;

            let current_idx = arena.insert_node(current.to_data(), parent_idx);

            // Reverse push keeps siblings in document order
            for child in current.children.iter().rev() {
                stack.push((child, Some(current_idx), depth + 1));
            }
        }

        debug!("built tree with {} nodes", arena.len());
        Ok(AxTree::from_arena(arena))
    }

    fn validate(spec: &NodeSpec) -> DomainResult<()> {
        if let Some(location) = spec.location {
            if location.width < 0 || location.height < 0 {
                return Err(DomainError::InvalidSnapshot(format!(
                    "negative size {} on {} node",
                    location, spec.role
                )));
            }
            if !location.fits() {
                return Err(DomainError::InvalidSnapshot(format!(
                    "location {} on {} node overflows screen coordinates",
                    location, spec.role
                )));
            }
        }
        Ok(())
    }
}

//! Domain layer: the accessibility tree model
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod error;
pub mod geometry;
pub mod node;
pub mod role;

pub use arena::{ArenaNode, AxTree, NodeData, NodeRef, TreeArena};
pub use builder::{NodeSpec, TreeBuilder};
pub use error::{DomainError, DomainResult};
pub use geometry::{Point, Rect};
pub use node::{AutomationNode, TreeNode};
pub use role::{Role, State};

//! Tree walking: the directed walker, its predicate library and the
//! traversal algorithms built on top of it.

pub mod predicate;
pub mod tree_walker;
pub mod util;

pub use tree_walker::{Dir, Phase, Restrictions, TreeWalker, Unary, Walk};
pub use util::{
    find_all_nodes, find_last_node, find_next_node, find_node_post, find_node_pre,
    find_node_until, get_ancestors, get_direction, get_divergence, get_least_common_ancestor,
    get_top_level_root, get_unique_ancestors, hit_test, is_descendant_of,
};

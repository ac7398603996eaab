//! Directed tree walking and navigation over live accessibility trees.
//!
//! The core is [`walker::TreeWalker`], a restartable single-step walker in
//! document order, plus the traversal algorithms in [`walker::util`] built on
//! top of it. Everything else loads snapshots and exposes the queries on the
//! command line.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;
pub mod walker;

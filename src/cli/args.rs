//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

use crate::walker::Dir;

/// Walk, search and hit-test accessibility tree snapshots
#[derive(Parser, Debug)]
#[command(name = "axnav")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Extra config file layered over the global one
    #[arg(long = "config", global = true, value_hint = ValueHint::FilePath)]
    pub config_file: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Snapshot file plus the node to start from
#[derive(Args, Debug, Clone)]
pub struct SnapshotArgs {
    /// Snapshot file (.toml or .json); bare names are looked up in snapshot_dir
    #[arg(value_hint = ValueHint::FilePath)]
    pub snapshot: PathBuf,
}

/// Traversal direction flag
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct DirArgs {
    /// Walk backward (reverse document order)
    #[arg(short, long)]
    pub backward: bool,
}

impl DirArgs {
    pub fn dir(&self) -> Dir {
        if self.backward {
            Dir::Backward
        } else {
            Dir::Forward
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the tree (or a subtree)
    Tree {
        #[command(flatten)]
        snapshot: SnapshotArgs,
        /// Subtree root selector (`0/1`, `@name`, empty = root)
        #[arg(short, long, default_value = "")]
        from: String,
    },

    /// Drive a raw tree walker and print every step with its phase
    Walk {
        #[command(flatten)]
        snapshot: SnapshotArgs,
        /// Start node selector
        #[arg(short, long, default_value = "")]
        from: String,
        #[command(flatten)]
        dir: DirArgs,
        /// Never descend below nodes matching this filter
        #[arg(long)]
        leaf: Option<String>,
        /// Boundary filter
        #[arg(long)]
        root: Option<String>,
        /// Only report nodes matching this filter
        #[arg(long)]
        visit: Option<String>,
        /// Skip the start node's subtree
        #[arg(long)]
        skip_subtree: bool,
        /// Skip the start node's ancestors (backward)
        #[arg(long)]
        skip_ancestry: bool,
    },

    /// Find the next node matching a filter
    Next {
        #[command(flatten)]
        snapshot: SnapshotArgs,
        /// Start node selector
        #[arg(short, long, default_value = "")]
        from: String,
        /// Filter: leaf, object, button, link, heading[:N], landmark, form-field, table, same-row, same-col, any, or a role
        #[arg(short = 'F', long, default_value = "object")]
        filter: String,
        #[command(flatten)]
        dir: DirArgs,
    },

    /// List every node matching a filter
    All {
        #[command(flatten)]
        snapshot: SnapshotArgs,
        /// Start node selector
        #[arg(short, long, default_value = "")]
        from: String,
        /// Node filter
        #[arg(short = 'F', long, default_value = "any")]
        filter: String,
        #[command(flatten)]
        dir: DirArgs,
    },

    /// Find the last node matching a filter in forward order
    Last {
        #[command(flatten)]
        snapshot: SnapshotArgs,
        /// Node filter
        #[arg(short = 'F', long, default_value = "object")]
        filter: String,
    },

    /// Find the deepest node containing a screen point
    Hit {
        #[command(flatten)]
        snapshot: SnapshotArgs,
        #[arg(allow_negative_numbers = true)]
        x: i32,
        #[arg(allow_negative_numbers = true)]
        y: i32,
    },

    /// Document-order direction from one node to another
    Direction {
        #[command(flatten)]
        snapshot: SnapshotArgs,
        /// From node selector
        from: String,
        /// To node selector
        to: String,
    },

    /// Print the ancestor chain of a node, root first
    Ancestors {
        #[command(flatten)]
        snapshot: SnapshotArgs,
        /// Node selector
        node: String,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Show config file locations
    Path,
    /// Print a commented config template
    Template,
}

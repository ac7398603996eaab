//! Navigation service
//!
//! Runs walker queries against a loaded tree. Selectors and filters arrive
//! as text and are resolved here; the traversal itself never fails.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::query::{NodeFilter, Selector};
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{AxTree, NodeRef, Point, TreeNode};
use crate::walker::{self, Dir, Phase, Restrictions, TreeWalker};

/// Options for a raw walker run.
#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
    pub leaf: Option<NodeFilter>,
    pub root: Option<NodeFilter>,
    pub visit: Option<NodeFilter>,
    pub skip_initial_subtree: bool,
    pub skip_initial_ancestry: bool,
}

impl WalkOptions {
    /// Options seeded from the configured walk defaults.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            skip_initial_subtree: settings.walk.skip_initial_subtree,
            skip_initial_ancestry: settings.walk.skip_initial_ancestry,
            ..Self::default()
        }
    }
}

/// One node reported by a walk, with the phase it was reached in.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkStep {
    pub node: NodeRef,
    pub phase: Phase,
}

pub struct NavigationService {
    tree: AxTree,
    settings: Arc<Settings>,
}

impl NavigationService {
    pub fn new(tree: AxTree, settings: Arc<Settings>) -> Self {
        Self { tree, settings }
    }

    pub fn tree(&self) -> &AxTree {
        &self.tree
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn root(&self) -> ApplicationResult<NodeRef> {
        self.tree.root_node().ok_or(ApplicationError::EmptyTree)
    }

    /// Resolves a textual selector to a node.
    #[instrument(level = "debug", skip(self))]
    pub fn resolve(&self, selector: &str) -> ApplicationResult<NodeRef> {
        let parsed: Selector = selector.parse()?;
        let root = self.root()?;
        let found = match &parsed {
            Selector::Root => Some(root),
            Selector::Name(name) => self.tree.find_by_name(name),
            Selector::Path(path) => path.iter().try_fold(root, |node, index| {
                node.children().into_iter().nth(*index)
            }),
        };
        found.ok_or_else(|| ApplicationError::NodeNotFound(parsed.to_string()))
    }

    /// Index path of `node` from the root, the inverse of [`Self::resolve`].
    pub fn path_of(&self, node: &NodeRef) -> String {
        let indices: Vec<usize> = walker::get_ancestors(node)
            .iter()
            .skip(1)
            .filter_map(|n| n.index_in_parent())
            .collect();
        if indices.is_empty() {
            Selector::Root.to_string()
        } else {
            Selector::Path(indices).to_string()
        }
    }

    /// Drives a bare [`TreeWalker`] and records each step's phase.
    ///
    /// Output is capped at `max_results`.
    #[instrument(level = "debug", skip(self, options))]
    pub fn walk(
        &self,
        from: &NodeRef,
        dir: Dir,
        options: &WalkOptions,
    ) -> ApplicationResult<Vec<WalkStep>> {
        let mut restrictions = Restrictions::new()
            .skip_initial_subtree(options.skip_initial_subtree)
            .skip_initial_ancestry(options.skip_initial_ancestry);
        if let Some(filter) = &options.leaf {
            restrictions.leaf = Some(filter.predicate(from)?);
        }
        if let Some(filter) = &options.root {
            restrictions.root = Some(filter.predicate(from)?);
        }
        if let Some(filter) = &options.visit {
            restrictions.visit = Some(filter.predicate(from)?);
        }

        let mut walker = TreeWalker::new(from.clone(), dir, restrictions);
        let mut steps = Vec::new();
        while steps.len() < self.settings.max_results {
            let Some(node) = walker.next().node().cloned() else {
                break;
            };
            steps.push(WalkStep {
                node,
                phase: walker.phase(),
            });
        }
        debug!("walk: {} steps", steps.len());
        Ok(steps)
    }

    /// Next node matching `filter`, with the default navigation restrictions.
    pub fn next(
        &self,
        from: &NodeRef,
        dir: Dir,
        filter: &NodeFilter,
    ) -> ApplicationResult<Option<NodeRef>> {
        let pred = filter.predicate(from)?;
        Ok(walker::find_next_node(from, dir, pred.as_ref(), None))
    }

    /// Every node matching `filter` from `from` on, capped at `max_results`.
    pub fn all(
        &self,
        from: &NodeRef,
        dir: Dir,
        filter: &NodeFilter,
    ) -> ApplicationResult<Vec<NodeRef>> {
        let pred = filter.predicate(from)?;
        let mut nodes = walker::find_all_nodes(from, dir, pred.as_ref(), None);
        nodes.truncate(self.settings.max_results);
        Ok(nodes)
    }

    /// Last match in the whole tree, in forward navigation order.
    pub fn last(&self, filter: &NodeFilter) -> ApplicationResult<Option<NodeRef>> {
        let root = self.root()?;
        let pred = filter.predicate(&root)?;
        Ok(walker::find_last_node(&root, pred.as_ref()))
    }

    pub fn hit(&self, point: Point) -> ApplicationResult<Option<NodeRef>> {
        Ok(walker::hit_test(&self.root()?, point))
    }

    pub fn direction(&self, from: &NodeRef, to: &NodeRef) -> Dir {
        walker::get_direction(from, to)
    }

    pub fn ancestors(&self, node: &NodeRef) -> Vec<NodeRef> {
        walker::get_ancestors(node)
    }
}

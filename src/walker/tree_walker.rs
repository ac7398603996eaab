//! Directed, restartable single-step walker over a live tree.
//!
//! A [`TreeWalker`] starts at a node and moves one qualifying node at a time
//! in pre-order ([`Dir::Forward`]) or reverse pre-order ([`Dir::Backward`]).
//! Three caller-supplied predicates shape the walk:
//!
//! - `leaf`: never descend below a matching node;
//! - `root`: a boundary that forward walks do not climb past and backward
//!   walks end on;
//! - `visit`: which structurally reached nodes are reported.
//!
//! While walking, the walker classifies its position relative to the start
//! node as a [`Phase`], which lets callers skip the start node's ancestry or
//! subtree without re-deriving tree shape.
//!
//! Structural absence (missing relatives, nodes removed from the tree between
//! steps) ends the walk; the walker never panics.

use std::fmt;

use tracing::trace;

use crate::domain::TreeNode;

/// A boxed unary node predicate.
pub type Unary<'a, N> = Box<dyn Fn(&N) -> bool + 'a>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dir {
    Forward,
    Backward,
}

impl Dir {
    pub fn reverse(self) -> Self {
        match self {
            Dir::Forward => Dir::Backward,
            Dir::Backward => Dir::Forward,
        }
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dir::Forward => f.write_str("forward"),
            Dir::Backward => f.write_str("backward"),
        }
    }
}

/// Position of the current node relative to the start node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// At the start node.
    Initial,
    /// At a strict ancestor of the start node (backward only).
    Ancestor,
    /// Inside the start node's subtree (forward only).
    Descendant,
    /// Anywhere else.
    Other,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Initial => "initial",
            Phase::Ancestor => "ancestor",
            Phase::Descendant => "descendant",
            Phase::Other => "other",
        };
        f.write_str(name)
    }
}

/// Predicates and flags constraining a walk.
///
/// Missing `leaf` and `root` never stop the walk; a missing `visit` reports
/// every node not hidden by the skip flags.
pub struct Restrictions<'a, N> {
    pub leaf: Option<Unary<'a, N>>,
    pub root: Option<Unary<'a, N>>,
    pub visit: Option<Unary<'a, N>>,
    /// Do not report strict ancestors of the start node.
    pub skip_initial_ancestry: bool,
    /// Do not descend into, or report anything from, the start node's subtree.
    pub skip_initial_subtree: bool,
}

impl<N> Default for Restrictions<'_, N> {
    fn default() -> Self {
        Self {
            leaf: None,
            root: None,
            visit: None,
            skip_initial_ancestry: false,
            skip_initial_subtree: false,
        }
    }
}

impl<N> fmt::Debug for Restrictions<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Restrictions")
            .field("leaf", &self.leaf.is_some())
            .field("root", &self.root.is_some())
            .field("visit", &self.visit.is_some())
            .field("skip_initial_ancestry", &self.skip_initial_ancestry)
            .field("skip_initial_subtree", &self.skip_initial_subtree)
            .finish()
    }
}

impl<'a, N> Restrictions<'a, N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn leaf(mut self, pred: impl Fn(&N) -> bool + 'a) -> Self {
        self.leaf = Some(Box::new(pred));
        self
    }

    pub fn root(mut self, pred: impl Fn(&N) -> bool + 'a) -> Self {
        self.root = Some(Box::new(pred));
        self
    }

    pub fn visit(mut self, pred: impl Fn(&N) -> bool + 'a) -> Self {
        self.visit = Some(Box::new(pred));
        self
    }

    pub fn skip_initial_ancestry(mut self, skip: bool) -> Self {
        self.skip_initial_ancestry = skip;
        self
    }

    pub fn skip_initial_subtree(mut self, skip: bool) -> Self {
        self.skip_initial_subtree = skip;
        self
    }
}

pub struct TreeWalker<'a, N: TreeNode> {
    node: Option<N>,
    dir: Dir,
    initial_node: N,
    phase: Phase,
    /// Next ancestor of the start node a backward walk will climb onto.
    backward_ancestor: Option<N>,
    leaf_pred: Option<Unary<'a, N>>,
    root_pred: Option<Unary<'a, N>>,
    visit_pred: Option<Unary<'a, N>>,
    skip_initial_ancestry: bool,
    skip_initial_subtree: bool,
}

impl<N: TreeNode> fmt::Debug for TreeWalker<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeWalker")
            .field("node", &self.node)
            .field("dir", &self.dir)
            .field("phase", &self.phase)
            .field("initial_node", &self.initial_node)
            .finish_non_exhaustive()
    }
}

impl<'a, N: TreeNode> TreeWalker<'a, N> {
    pub fn new(start: N, dir: Dir, restrictions: Restrictions<'a, N>) -> Self {
        Self {
            backward_ancestor: start.parent(),
            node: Some(start.clone()),
            dir,
            initial_node: start,
            phase: Phase::Initial,
            leaf_pred: restrictions.leaf,
            root_pred: restrictions.root,
            visit_pred: restrictions.visit,
            skip_initial_ancestry: restrictions.skip_initial_ancestry,
            skip_initial_subtree: restrictions.skip_initial_subtree,
        }
    }

    /// Current node; `None` once the walk is exhausted.
    pub fn node(&self) -> Option<&N> {
        self.node.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn dir(&self) -> Dir {
        self.dir
    }

    pub fn initial_node(&self) -> &N {
        &self.initial_node
    }

    /// Moves to the next node accepted by the visit predicate.
    ///
    /// Does nothing once exhausted.
    pub fn next(&mut self) -> &mut Self {
        let Some(mut current) = self.node.take() else {
            return self;
        };
        loop {
            if self.dir == Dir::Backward && self.is_root(&current) {
                break;
            }
            let stepped = match self.dir {
                Dir::Forward => self.forward(&current),
                Dir::Backward => self.backward(&current),
            };
            match stepped {
                Some(node) if !self.should_visit(&node) => current = node,
                other => {
                    self.node = other;
                    break;
                }
            }
        }
        trace!(
            dir = %self.dir,
            phase = %self.phase,
            exhausted = self.node.is_none(),
            "walker step"
        );
        self
    }

    /// Consumes the walker, yielding every remaining node.
    pub fn walk(self) -> Walk<'a, N> {
        Walk { walker: self }
    }

    fn is_leaf(&self, node: &N) -> bool {
        self.leaf_pred.as_ref().is_some_and(|pred| pred(node))
    }

    fn is_root(&self, node: &N) -> bool {
        self.root_pred.as_ref().is_some_and(|pred| pred(node))
    }

    fn should_visit(&self, node: &N) -> bool {
        if self.skip_initial_ancestry && self.phase == Phase::Ancestor {
            return false;
        }
        if self.skip_initial_subtree && !matches!(self.phase, Phase::Ancestor | Phase::Other) {
            return false;
        }
        self.visit_pred.as_ref().map_or(true, |pred| pred(node))
    }

    fn enter(&mut self, next: Phase) {
        self.phase = match (self.phase, next) {
            // Only the first step below the start node marks the descent.
            (Phase::Initial, Phase::Descendant) => Phase::Descendant,
            (current, Phase::Descendant) => current,
            (_, Phase::Ancestor) => Phase::Ancestor,
            (_, Phase::Other) => Phase::Other,
            (current, Phase::Initial) => current,
        };
    }

    fn forward(&mut self, node: &N) -> Option<N> {
        if !self.is_leaf(node) {
            if let Some(first) = node.first_child() {
                self.enter(Phase::Descendant);
                if !(self.skip_initial_subtree && self.phase == Phase::Descendant) {
                    return Some(first);
                }
            }
        }

        let mut search = Some(node.clone());
        while let Some(current) = search {
            if current == self.initial_node {
                self.enter(Phase::Other);
            }
            if let Some(sibling) = current.next_sibling() {
                return Some(sibling);
            }
            let parent = current.parent();
            if parent.as_ref() == Some(&self.initial_node) {
                self.enter(Phase::Other);
            }
            if let Some(parent) = &parent {
                // Outside the start subtree a root is a ceiling.
                if self.is_root(parent) && self.phase != Phase::Descendant {
                    break;
                }
            }
            search = parent;
        }
        None
    }

    fn backward(&mut self, node: &N) -> Option<N> {
        if let Some(mut sibling) = node.previous_sibling() {
            self.enter(Phase::Other);
            while !self.is_leaf(&sibling) {
                match sibling.last_child() {
                    Some(child) => sibling = child,
                    None => break,
                }
            }
            return Some(sibling);
        }

        let parent = node.parent();
        if let Some(parent) = &parent {
            if self.backward_ancestor.as_ref() == Some(parent) {
                self.enter(Phase::Ancestor);
                self.backward_ancestor = parent.parent();
            }
        }
        parent
    }
}

/// Iterator adapter over [`TreeWalker::next`].
pub struct Walk<'a, N: TreeNode> {
    walker: TreeWalker<'a, N>,
}

impl<'a, N: TreeNode> Walk<'a, N> {
    pub fn phase(&self) -> Phase {
        self.walker.phase()
    }
}

impl<N: TreeNode> Iterator for Walk<'_, N> {
    type Item = N;

    fn next(&mut self) -> Option<N> {
        self.walker.next().node().cloned()
    }
}

//! Traversal algorithms built on [`TreeWalker`] and plain recursion.
//!
//! None of these fail: "nothing found" is `None` or an empty `Vec`.

use tracing::{debug, instrument};

use crate::domain::{AutomationNode, Point, Role, TreeNode};
use crate::walker::predicate;
use crate::walker::{Dir, Restrictions, TreeWalker, Unary};

fn first_child_in<N: TreeNode>(node: &N, dir: Dir) -> Option<N> {
    match dir {
        Dir::Forward => node.first_child(),
        Dir::Backward => node.last_child(),
    }
}

fn sibling_in<N: TreeNode>(node: &N, dir: Dir) -> Option<N> {
    match dir {
        Dir::Forward => node.next_sibling(),
        Dir::Backward => node.previous_sibling(),
    }
}

/// Pre-order search starting with `cur` itself.
///
/// Children are scanned last-to-first when walking backward.
pub fn find_node_pre<N, P>(cur: &N, dir: Dir, pred: &P) -> Option<N>
where
    N: AutomationNode,
    P: Fn(&N) -> bool + ?Sized,
{
    if pred(cur) && !predicate::should_ignore_node(cur) {
        return Some(cur.clone());
    }
    let mut child = first_child_in(cur, dir);
    while let Some(current) = child {
        if let Some(found) = find_node_pre(&current, dir, pred) {
            return Some(found);
        }
        child = sibling_in(&current, dir);
    }
    None
}

/// Post-order search: children are tried before `cur`.
pub fn find_node_post<N, P>(cur: &N, dir: Dir, pred: &P) -> Option<N>
where
    N: AutomationNode,
    P: Fn(&N) -> bool + ?Sized,
{
    let mut child = first_child_in(cur, dir);
    while let Some(current) = child {
        if let Some(found) = find_node_post(&current, dir, pred) {
            return Some(found);
        }
        child = sibling_in(&current, dir);
    }
    if pred(cur) && !predicate::should_ignore_node(cur) {
        return Some(cur.clone());
    }
    None
}

/// Next node after `cur` in `dir` matching `pred`.
///
/// Defaults when `restrictions` is `None` or leaves them unset:
/// - `root` is [`predicate::root`];
/// - `leaf` treats every non-container match as a unit;
/// - `skip_initial_subtree` (only without restrictions) is set when `cur`
///   neither matches nor is a container.
///
/// Ignored nodes are never returned; a caller-supplied `visit` narrows the
/// result further.
#[instrument(level = "trace", skip(pred, restrictions))]
pub fn find_next_node<'a, N, P>(
    cur: &N,
    dir: Dir,
    pred: &'a P,
    restrictions: Option<Restrictions<'a, N>>,
) -> Option<N>
where
    N: AutomationNode + 'a,
    P: Fn(&N) -> bool + ?Sized + 'a,
{
    let restrictions = match restrictions {
        Some(restrictions) => restrictions,
        None => Restrictions::new()
            .skip_initial_subtree(!pred(cur) && !predicate::container(cur)),
    };

    let root: Unary<'a, N> = restrictions
        .root
        .unwrap_or_else(|| Box::new(predicate::root::<N>));
    let leaf: Unary<'a, N> = restrictions
        .leaf
        .unwrap_or_else(|| Box::new(move |node: &N| !predicate::container(node) && pred(node)));
    let extra_visit = restrictions.visit;
    let visit: Unary<'a, N> = Box::new(move |node: &N| {
        pred(node)
            && !predicate::should_ignore_node(node)
            && extra_visit.as_ref().map_or(true, |visit| visit(node))
    });

    let mut walker = TreeWalker::new(
        cur.clone(),
        dir,
        Restrictions {
            leaf: Some(leaf),
            root: Some(root),
            visit: Some(visit),
            skip_initial_ancestry: restrictions.skip_initial_ancestry,
            skip_initial_subtree: restrictions.skip_initial_subtree,
        },
    );
    walker.next().node().cloned()
}

/// Every node matching `pred` reachable from `cur` in `dir`, in walk order.
///
/// `cur` comes first when it matches `pred` and the caller's `visit`, unless
/// `skip_initial_subtree` is set. Without restrictions the walk is unbounded
/// by leaf or root predicates, so starting at the tree root in forward
/// direction lists every matching node of the tree exactly once.
pub fn find_all_nodes<'a, N, P>(
    cur: &N,
    dir: Dir,
    pred: &'a P,
    restrictions: Option<Restrictions<'a, N>>,
) -> Vec<N>
where
    N: TreeNode + 'a,
    P: Fn(&N) -> bool + ?Sized + 'a,
{
    let mut restrictions = restrictions.unwrap_or_default();
    let extra_visit = restrictions.visit.take();
    // cur sits in its own subtree but is never its own ancestor
    let include_start = !restrictions.skip_initial_subtree
        && pred(cur)
        && extra_visit.as_ref().map_or(true, |visit| visit(cur));
    restrictions.visit = Some(Box::new(move |node: &N| {
        pred(node) && extra_visit.as_ref().map_or(true, |visit| visit(node))
    }));

    let mut found = Vec::new();
    if include_start {
        found.push(cur.clone());
    }
    found.extend(TreeWalker::new(cur.clone(), dir, restrictions).walk());
    debug!("find_all_nodes: {} matches", found.len());
    found
}

/// Walks consecutive leaves from `cur` until `pred(before, after)` holds.
///
/// Returns the earlier node of the matching pair when `before` is set, the
/// later one otherwise. Running out of leaves yields the last leaf (`before`)
/// or `None`.
pub fn find_node_until<N, B>(cur: &N, dir: Dir, pred: &B, before: bool) -> Option<N>
where
    N: AutomationNode,
    B: Fn(&N, &N) -> bool + ?Sized,
{
    let leaf = predicate::leaf::<N>;
    let mut before_node = cur.clone();
    let mut after_node = find_next_node(&before_node, dir, &leaf, None);
    while let Some(after) = after_node.clone() {
        if pred(&before_node, &after) {
            break;
        }
        before_node = after;
        after_node = find_next_node(&before_node, dir, &leaf, None);
    }
    if before {
        Some(before_node)
    } else {
        after_node
    }
}

/// Ancestor chain from the topmost node down to and including `node`.
pub fn get_ancestors<N: TreeNode>(node: &N) -> Vec<N> {
    let mut ancestors = Vec::new();
    let mut candidate = Some(node.clone());
    while let Some(current) = candidate {
        candidate = current.parent();
        ancestors.push(current);
    }
    ancestors.reverse();
    ancestors
}

/// First index where two root-first chains differ.
///
/// `None` for identical chains. When one chain is a strict prefix of the
/// other, the shorter chain's length.
pub fn get_divergence<N: PartialEq>(ancestors_a: &[N], ancestors_b: &[N]) -> Option<usize> {
    for (index, node) in ancestors_a.iter().enumerate() {
        if ancestors_b.get(index) != Some(node) {
            return Some(index);
        }
    }
    if ancestors_a.len() == ancestors_b.len() {
        None
    } else {
        Some(ancestors_a.len())
    }
}

/// Whether `node_b` lies forward or backward of `node_a` in document order.
///
/// Identical nodes compare forward. An ancestor precedes its descendants.
/// Nodes of unrelated trees compare forward.
pub fn get_direction<N: TreeNode>(node_a: &N, node_b: &N) -> Dir {
    let ancestors_a = get_ancestors(node_a);
    let ancestors_b = get_ancestors(node_b);
    let Some(divergence) = get_divergence(&ancestors_a, &ancestors_b) else {
        return Dir::Forward;
    };

    match (ancestors_a.get(divergence), ancestors_b.get(divergence)) {
        // a's chain ended first: a is an ancestor of b
        (None, _) => Dir::Forward,
        (_, None) => Dir::Backward,
        (Some(div_a), Some(div_b)) => {
            match (div_a.index_in_parent(), div_b.index_in_parent()) {
                (Some(index_a), Some(index_b)) if index_a > index_b => Dir::Backward,
                _ => Dir::Forward,
            }
        }
    }
}

/// Ancestors of `node` (inclusive) that `prev` does not share.
pub fn get_unique_ancestors<N: TreeNode>(prev: &N, node: &N) -> Vec<N> {
    let prev_ancestors = get_ancestors(prev);
    let ancestors = get_ancestors(node);
    match get_divergence(&prev_ancestors, &ancestors) {
        Some(divergence) => ancestors.into_iter().skip(divergence).collect(),
        None => Vec::new(),
    }
}

/// Deepest node that is an ancestor (inclusive) of both nodes.
pub fn get_least_common_ancestor<N: TreeNode>(node_a: &N, node_b: &N) -> Option<N> {
    if node_a == node_b {
        return Some(node_a.clone());
    }
    let ancestors_a = get_ancestors(node_a);
    let ancestors_b = get_ancestors(node_b);
    match get_divergence(&ancestors_a, &ancestors_b) {
        None => Some(node_a.clone()),
        Some(0) => None,
        Some(divergence) => ancestors_a.get(divergence - 1).cloned(),
    }
}

/// True when `ancestor` is `node` or one of its ancestors.
pub fn is_descendant_of<N: TreeNode>(node: &N, ancestor: &N) -> bool {
    let mut candidate = Some(node.clone());
    while let Some(current) = candidate {
        if current == *ancestor {
            return true;
        }
        candidate = current.parent();
    }
    false
}

/// Outermost ancestor (inclusive) matching [`predicate::root`], desktops excluded.
pub fn get_top_level_root<N: AutomationNode>(node: &N) -> Option<N> {
    let mut top = None;
    let mut candidate = Some(node.clone());
    while let Some(current) = candidate {
        if predicate::root(&current) && current.role() != Role::Desktop {
            top = Some(current.clone());
        }
        candidate = current.parent();
    }
    top
}

/// Deepest node under `node` whose bounds contain `point`.
///
/// Children are tested before their parent because child bounds need not nest
/// inside the parent's. Nodes with a negative origin are off-screen and never
/// hit.
pub fn hit_test<N: AutomationNode>(node: &N, point: Point) -> Option<N> {
    let mut child = node.first_child();
    while let Some(current) = child {
        if let Some(hit) = hit_test(&current, point) {
            return Some(hit);
        }
        child = current.next_sibling();
    }

    let location = node.location()?;
    if location.is_offscreen() {
        return None;
    }
    location.contains(point).then(|| node.clone())
}

/// The node [`find_next_node`] would return last when iterating forward
/// through `root`'s subtree with `pred`.
///
/// Walks backward from the deepest last descendant. A candidate inside a
/// matching non-container resolves to the shallowest such ancestor, since a
/// forward walk treats that ancestor as a unit; otherwise the candidate itself
/// is taken when it matches.
#[instrument(level = "debug", skip(pred))]
pub fn find_last_node<N, P>(root: &N, pred: &P) -> Option<N>
where
    N: AutomationNode,
    P: Fn(&N) -> bool + ?Sized,
{
    let mut deepest = root.clone();
    while let Some(last) = deepest.last_child() {
        deepest = last;
    }
    if deepest == *root {
        return None;
    }

    let boundary = root.clone();
    let mut walker = TreeWalker::new(
        deepest.clone(),
        Dir::Backward,
        Restrictions::new().root(move |node: &N| *node == boundary),
    );

    let mut candidate = Some(deepest);
    while let Some(node) = candidate {
        if node == *root {
            break;
        }
        match shallowest_unit_match(root, &node, pred) {
            Some(unit) => {
                if !predicate::should_ignore_node(&unit) {
                    return Some(unit);
                }
            }
            None => {
                if pred(&node) && !predicate::should_ignore_node(&node) {
                    return Some(node);
                }
            }
        }
        candidate = walker.next().node().cloned();
    }
    None
}

/// Shallowest ancestor (inclusive, below `root`) that matches `pred` and is
/// not a container.
fn shallowest_unit_match<N, P>(root: &N, node: &N, pred: &P) -> Option<N>
where
    N: AutomationNode,
    P: Fn(&N) -> bool + ?Sized,
{
    let mut shallowest = None;
    let mut candidate = Some(node.clone());
    while let Some(current) = candidate {
        if current == *root {
            break;
        }
        if pred(&current) && !predicate::container(&current) {
            shallowest = Some(current.clone());
        }
        candidate = current.parent();
    }
    shallowest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AxTree, NodeData, NodeRef, Rect};
    use crate::walker::Phase;
    use rstest::{fixture, rstest};

    fn names(nodes: &[NodeRef]) -> Vec<String> {
        nodes.iter().filter_map(|n| n.name()).collect()
    }

    fn named(tree: &AxTree, name: &str) -> NodeRef {
        tree.find_by_name(name).unwrap()
    }

    // win
    // ├── doc (paragraph)
    // │   ├── t1 (static-text)
    // │   ├── b1 (button)
    // │   │   └── b1-label (static-text)
    // │   └── t2 (static-text)
    // └── list
    //     ├── item1 (list-item)
    //     │   └── l1 (link)
    //     └── item2 (list-item)
    //         └── t3 (static-text)
    #[fixture]
    fn page() -> AxTree {
        let tree = AxTree::new();
        let win = tree.insert(NodeData::named(Role::Window, "win"), None);
        let doc = tree.insert(NodeData::named(Role::Paragraph, "doc"), Some(&win));
        tree.insert(NodeData::named(Role::StaticText, "t1"), Some(&doc));
        let b1 = tree.insert(NodeData::named(Role::Button, "b1"), Some(&doc));
        tree.insert(NodeData::named(Role::StaticText, "b1-label"), Some(&b1));
        tree.insert(NodeData::named(Role::StaticText, "t2"), Some(&doc));
        let list = tree.insert(NodeData::named(Role::List, "list"), Some(&win));
        let item1 = tree.insert(NodeData::named(Role::ListItem, "item1"), Some(&list));
        tree.insert(NodeData::named(Role::Link, "l1"), Some(&item1));
        let item2 = tree.insert(NodeData::named(Role::ListItem, "item2"), Some(&list));
        tree.insert(NodeData::named(Role::StaticText, "t3"), Some(&item2));
        tree
    }

    #[rstest]
    fn given_forward_dir_when_finding_pre_then_returns_first_in_document_order(page: AxTree) {
        let win = named(&page, "win");
        let found = find_node_pre(&win, Dir::Forward, &predicate::leaf::<NodeRef>);
        assert_eq!(found.and_then(|n| n.name()), Some("t1".into()));
        let found = find_node_pre(&win, Dir::Backward, &predicate::leaf::<NodeRef>);
        assert_eq!(found.and_then(|n| n.name()), Some("t3".into()));
    }

    #[rstest]
    fn given_matching_start_when_finding_pre_then_returns_start(page: AxTree) {
        let b1 = named(&page, "b1");
        assert_eq!(find_node_pre(&b1, Dir::Forward, &predicate::button::<NodeRef>), Some(b1));
    }

    #[rstest]
    fn given_matching_parent_and_child_when_finding_post_then_child_wins(page: AxTree) {
        let list = named(&page, "list");
        let is_named = |n: &NodeRef| n.name().is_some();
        let found = find_node_post(&list, Dir::Forward, &is_named);
        assert_eq!(found.and_then(|n| n.name()), Some("l1".into()));
        let found = find_node_pre(&list, Dir::Forward, &is_named);
        assert_eq!(found.and_then(|n| n.name()), Some("list".into()));
    }

    #[rstest]
    fn given_ignored_nodes_when_finding_pre_then_skips_them(page: AxTree) {
        let win = named(&page, "win");
        // win is a structural container and therefore ignored
        let found = find_node_pre(&win, Dir::Forward, &|_: &NodeRef| true);
        assert_eq!(found.and_then(|n| n.name()), Some("doc".into()));
    }

    #[rstest]
    fn given_object_predicate_when_finding_next_then_treats_button_as_unit(page: AxTree) {
        let t1 = named(&page, "t1");
        let pred = predicate::object::<NodeRef>;
        let next = find_next_node(&t1, Dir::Forward, &pred, None).unwrap();
        assert_eq!(next.name(), Some("b1".into()));
        let next = find_next_node(&next, Dir::Forward, &pred, None).unwrap();
        assert_eq!(next.name(), Some("t2".into()));
        let prev = find_next_node(&next, Dir::Backward, &pred, None).unwrap();
        assert_eq!(prev.name(), Some("b1".into()));
    }

    #[rstest]
    fn given_links_when_finding_next_across_containers_then_descends(page: AxTree) {
        let t2 = named(&page, "t2");
        let found = find_next_node(&t2, Dir::Forward, &predicate::link::<NodeRef>, None);
        assert_eq!(found.and_then(|n| n.name()), Some("l1".into()));
    }

    #[rstest]
    fn given_last_match_when_finding_next_then_returns_none(page: AxTree) {
        let l1 = named(&page, "l1");
        assert_eq!(
            find_next_node(&l1, Dir::Forward, &predicate::link::<NodeRef>, None),
            None
        );
    }

    #[rstest]
    fn given_extra_visit_when_finding_next_then_narrows_matches(page: AxTree) {
        let t1 = named(&page, "t1");
        let pred = predicate::leaf::<NodeRef>;
        let restrictions = Restrictions::new().visit(|n: &NodeRef| n.name().as_deref() == Some("t3"));
        let found = find_next_node(&t1, Dir::Forward, &pred, Some(restrictions));
        assert_eq!(found.and_then(|n| n.name()), Some("t3".into()));
    }

    #[rstest]
    fn given_always_true_when_finding_all_then_lists_every_node_once(page: AxTree) {
        let win = named(&page, "win");
        let all = find_all_nodes(&win, Dir::Forward, &|_: &NodeRef| true, None);
        assert_eq!(all.len(), page.len());
        assert_eq!(
            names(&all),
            vec![
                "win", "doc", "t1", "b1", "b1-label", "t2", "list", "item1", "l1", "item2", "t3"
            ]
        );
    }

    #[rstest]
    fn given_forward_collection_when_walking_back_from_last_then_reversed(page: AxTree) {
        let win = named(&page, "win");
        let pred = |n: &NodeRef| n.first_child().is_none();
        let forward = find_all_nodes(&win, Dir::Forward, &pred, None);
        let last = forward.last().unwrap().clone();
        let mut backward = find_all_nodes(&last, Dir::Backward, &pred, None);
        backward.reverse();
        assert_eq!(forward, backward);
    }

    #[rstest]
    fn given_leaf_restriction_when_finding_all_then_honours_it(page: AxTree) {
        let win = named(&page, "win");
        let restrictions = Restrictions::new().leaf(predicate::button::<NodeRef>);
        let all = find_all_nodes(&win, Dir::Forward, &predicate::leaf::<NodeRef>, Some(restrictions));
        assert_eq!(names(&all), vec!["t1", "b1", "t2", "l1", "t3"]);
    }

    #[rstest]
    fn given_visit_restriction_when_finding_all_then_start_must_pass_it(page: AxTree) {
        let win = named(&page, "win");
        let text_only = Restrictions::new().visit(|n: &NodeRef| n.role() == Role::StaticText);
        let all = find_all_nodes(&win, Dir::Forward, &|_: &NodeRef| true, Some(text_only));
        assert_eq!(names(&all), vec!["t1", "b1-label", "t2", "t3"]);

        let b1 = named(&page, "b1");
        let self_only = Restrictions::new().visit(|n: &NodeRef| n.name().as_deref() == Some("b1"));
        let all = find_all_nodes(&b1, Dir::Forward, &|_: &NodeRef| true, Some(self_only));
        assert_eq!(names(&all), vec!["b1"]);
    }

    #[rstest]
    fn given_skip_flags_when_finding_all_backward_then_start_excluded(page: AxTree) {
        let b1 = named(&page, "b1");
        let any = |_: &NodeRef| true;

        let both = Restrictions::new()
            .skip_initial_subtree(true)
            .skip_initial_ancestry(true);
        assert_eq!(names(&find_all_nodes(&b1, Dir::Backward, &any, Some(both))), vec!["t1"]);

        let subtree = Restrictions::new().skip_initial_subtree(true);
        assert_eq!(
            names(&find_all_nodes(&b1, Dir::Backward, &any, Some(subtree))),
            vec!["t1", "doc", "win"]
        );

        let ancestry = Restrictions::new().skip_initial_ancestry(true);
        assert_eq!(
            names(&find_all_nodes(&b1, Dir::Backward, &any, Some(ancestry))),
            vec!["b1", "t1"]
        );
    }

    #[test]
    fn given_link_wrapping_text_when_finding_next_leaf_then_skips_its_children() {
        let tree = AxTree::new();
        let win = tree.insert(NodeData::named(Role::Window, "win"), None);
        let para = tree.insert(NodeData::named(Role::Paragraph, "para"), Some(&win));
        let link = tree.insert(NodeData::named(Role::Link, "go"), Some(&para));
        tree.insert(NodeData::named(Role::StaticText, "go-label"), Some(&link));
        tree.insert(NodeData::named(Role::StaticText, "after"), Some(&para));
        let pred = predicate::leaf::<NodeRef>;

        let found = find_next_node(&link, Dir::Forward, &pred, None);
        assert_eq!(found.and_then(|n| n.name()), Some("after".into()));

        // explicit restrictions keep their own flags
        let found = find_next_node(&link, Dir::Forward, &pred, Some(Restrictions::new()));
        assert_eq!(found.and_then(|n| n.name()), Some("go-label".into()));
    }

    #[rstest]
    fn given_binary_predicate_when_finding_until_then_returns_boundary_pair(page: AxTree) {
        let t1 = named(&page, "t1");
        let parent_changes = |a: &NodeRef, b: &NodeRef| a.parent() != b.parent();
        let after = find_node_until(&t1, Dir::Forward, &parent_changes, false);
        assert_eq!(after.and_then(|n| n.name()), Some("l1".into()));
        let before = find_node_until(&t1, Dir::Forward, &parent_changes, true);
        assert_eq!(before.and_then(|n| n.name()), Some("t2".into()));
    }

    #[rstest]
    fn given_predicate_never_holds_when_finding_until_then_runs_out(page: AxTree) {
        let t1 = named(&page, "t1");
        let never = |_: &NodeRef, _: &NodeRef| false;
        assert_eq!(find_node_until(&t1, Dir::Forward, &never, false), None);
        let last = find_node_until(&t1, Dir::Forward, &never, true);
        assert_eq!(last.and_then(|n| n.name()), Some("t3".into()));
    }

    #[rstest]
    fn given_node_when_getting_ancestors_then_root_first_inclusive(page: AxTree) {
        let l1 = named(&page, "l1");
        assert_eq!(names(&get_ancestors(&l1)), vec!["win", "list", "item1", "l1"]);
    }

    #[rstest]
    fn given_chains_when_getting_divergence_then_follows_prefix_rules(page: AxTree) {
        let l1 = get_ancestors(&named(&page, "l1"));
        let t3 = get_ancestors(&named(&page, "t3"));
        let list = get_ancestors(&named(&page, "list"));
        assert_eq!(get_divergence(&l1, &l1), None);
        assert_eq!(get_divergence(&l1, &t3), Some(2));
        assert_eq!(get_divergence(&list, &l1), Some(2));
        assert_eq!(get_divergence(&l1, &list), Some(2));
    }

    #[rstest]
    fn given_node_pairs_when_getting_direction_then_matches_document_order(page: AxTree) {
        let t1 = named(&page, "t1");
        let t3 = named(&page, "t3");
        let doc = named(&page, "doc");
        let b1_label = named(&page, "b1-label");
        assert_eq!(get_direction(&t1, &t1), Dir::Forward);
        assert_eq!(get_direction(&t1, &t3), Dir::Forward);
        assert_eq!(get_direction(&t3, &t1), Dir::Backward);
        assert_eq!(get_direction(&doc, &b1_label), Dir::Forward);
        assert_eq!(get_direction(&b1_label, &doc), Dir::Backward);
    }

    #[rstest]
    fn given_every_unrelated_pair_when_getting_direction_then_opposite(page: AxTree) {
        let nodes = find_all_nodes(&named(&page, "win"), Dir::Forward, &|_: &NodeRef| true, None);
        for a in &nodes {
            for b in &nodes {
                if a == b || is_descendant_of(a, b) || is_descendant_of(b, a) {
                    continue;
                }
                assert_ne!(get_direction(a, b), get_direction(b, a), "{:?} vs {:?}", a, b);
            }
        }
    }

    #[rstest]
    fn given_cousins_when_getting_common_and_unique_ancestors_then_split_at_divergence(
        page: AxTree,
    ) {
        let l1 = named(&page, "l1");
        let t3 = named(&page, "t3");
        assert_eq!(
            get_least_common_ancestor(&l1, &t3).and_then(|n| n.name()),
            Some("list".into())
        );
        assert_eq!(names(&get_unique_ancestors(&l1, &t3)), vec!["item2", "t3"]);
        assert!(get_unique_ancestors(&t3, &t3).is_empty());
        assert!(is_descendant_of(&t3, &named(&page, "list")));
        assert!(!is_descendant_of(&named(&page, "list"), &t3));
    }

    #[rstest]
    fn given_nested_roots_when_getting_top_level_root_then_outermost(page: AxTree) {
        let doc = named(&page, "doc");
        let dialog = page.insert(NodeData::named(Role::Dialog, "dlg"), Some(&doc));
        let inner = page.insert(NodeData::named(Role::Button, "inner"), Some(&dialog));
        assert_eq!(
            get_top_level_root(&inner).and_then(|n| n.name()),
            Some("win".into())
        );
    }

    #[test]
    fn given_laid_out_tree_when_hit_testing_leaf_centres_then_hits_each_leaf() {
        let tree = AxTree::new();
        let win = tree.insert(
            NodeData::named(Role::Window, "win").with_location(Rect::new(0, 0, 300, 100)),
            None,
        );
        let row = tree.insert(
            NodeData::named(Role::Group, "row").with_location(Rect::new(0, 0, 300, 50)),
            Some(&win),
        );
        let mut leaves = Vec::new();
        for i in 0..3 {
            leaves.push(tree.insert(
                NodeData::named(Role::Button, format!("b{}", i))
                    .with_location(Rect::new(i * 100 + 10, 10, 80, 30)),
                Some(&row),
            ));
        }
        for leaf in &leaves {
            let centre = leaf.location().unwrap().center();
            assert_eq!(hit_test(&win, centre).as_ref(), Some(leaf));
        }
        assert_eq!(hit_test(&win, Point::new(150, 80)), Some(win.clone()));
        assert_eq!(hit_test(&win, Point::new(500, 500)), None);
    }

    #[test]
    fn given_child_outside_parent_bounds_when_hit_testing_then_still_found() {
        let tree = AxTree::new();
        let win = tree.insert(
            NodeData::named(Role::Window, "win").with_location(Rect::new(0, 0, 100, 100)),
            None,
        );
        let popup = tree.insert(
            NodeData::named(Role::Group, "popup").with_location(Rect::new(10, 10, 20, 20)),
            Some(&win),
        );
        let escaped = tree.insert(
            NodeData::named(Role::Button, "escaped").with_location(Rect::new(200, 200, 20, 20)),
            Some(&popup),
        );
        assert_eq!(hit_test(&win, Point::new(210, 210)), Some(escaped));
    }

    #[test]
    fn given_offscreen_node_when_hit_testing_then_skipped() {
        let tree = AxTree::new();
        let win = tree.insert(
            NodeData::named(Role::Window, "win").with_location(Rect::new(0, 0, 100, 100)),
            None,
        );
        tree.insert(
            NodeData::named(Role::Button, "ghost").with_location(Rect::new(-10, 0, 50, 50)),
            Some(&win),
        );
        assert_eq!(hit_test(&win, Point::new(5, 5)), Some(win.clone()));
    }

    #[test]
    fn given_rect_at_i32_edge_when_hit_testing_then_no_overflow() {
        let tree = AxTree::new();
        let win = tree.insert(
            NodeData::named(Role::Window, "win").with_location(Rect::new(0, 0, 100, 100)),
            None,
        );
        let far = tree.insert(
            NodeData::named(Role::Button, "far").with_location(Rect::new(2_147_483_000, 0, 1000, 10)),
            Some(&win),
        );
        assert_eq!(hit_test(&win, Point::new(2_147_483_500, 5)), Some(far));
        assert_eq!(hit_test(&win, Point::new(i32::MAX, i32::MAX)), None);
    }

    #[test]
    fn given_button_around_heading_when_finding_last_button_then_outer() {
        let tree = AxTree::new();
        let para = tree.insert(NodeData::named(Role::Paragraph, "para"), None);
        let outer = tree.insert(NodeData::named(Role::Button, "outer"), Some(&para));
        tree.insert(NodeData::named(Role::Heading, "inner"), Some(&outer));
        let found = find_last_node(&para, &predicate::button::<NodeRef>);
        assert_eq!(found, Some(outer));
    }

    #[rstest]
    fn given_page_when_finding_last_node_then_matches_forward_iteration(page: AxTree) {
        let win = named(&page, "win");
        let preds: Vec<Box<dyn Fn(&NodeRef) -> bool>> = vec![
            Box::new(predicate::leaf::<NodeRef>),
            Box::new(predicate::button::<NodeRef>),
            Box::new(predicate::link::<NodeRef>),
            Box::new(predicate::object::<NodeRef>),
            Box::new(|n: &NodeRef| n.role() == Role::ListItem),
            Box::new(|n: &NodeRef| n.role() == Role::StaticText),
        ];
        for pred in &preds {
            let mut forward_last = None;
            let mut current = win.clone();
            while let Some(next) = find_next_node(&current, Dir::Forward, pred.as_ref(), None) {
                forward_last = Some(next.clone());
                current = next;
            }
            assert_eq!(find_last_node(&win, pred.as_ref()), forward_last);
        }
    }

    #[rstest]
    fn given_leafless_root_when_finding_last_node_then_none(page: AxTree) {
        let t1 = named(&page, "t1");
        assert_eq!(find_last_node(&t1, &predicate::leaf::<NodeRef>), None);
    }

    #[rstest]
    fn given_walker_phases_when_walking_forward_then_descendant_iff_inside_start(page: AxTree) {
        let start = named(&page, "doc");
        let mut walker = TreeWalker::new(start.clone(), Dir::Forward, Restrictions::new());
        while let Some(node) = walker.next().node().cloned() {
            let inside = node != start && is_descendant_of(&node, &start);
            assert_eq!(walker.phase() == Phase::Descendant, inside, "{:?}", node);
            assert_eq!(walker.phase() == Phase::Other, !inside, "{:?}", node);
        }
    }

    #[rstest]
    fn given_walker_phases_when_walking_backward_then_ancestor_iff_strict_ancestor(page: AxTree) {
        let start = named(&page, "t3");
        let mut walker = TreeWalker::new(start.clone(), Dir::Backward, Restrictions::new());
        while let Some(node) = walker.next().node().cloned() {
            let ancestor = node != start && is_descendant_of(&start, &node);
            assert_eq!(walker.phase() == Phase::Ancestor, ancestor, "{:?}", node);
            assert_eq!(walker.phase() == Phase::Other, !ancestor, "{:?}", node);
        }
    }
}

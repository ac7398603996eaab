//! Role and state classifiers used as walker restrictions.
//!
//! Every predicate is a plain function (or a closure returned by a factory) of
//! type `Fn(&N) -> bool`, so they plug directly into [`Restrictions`] and the
//! traversal algorithms.
//!
//! [`Restrictions`]: crate::walker::Restrictions

use crate::domain::{AutomationNode, DomainError, DomainResult, Role, State};

const STRUCTURAL_CONTAINER_ROLES: &[Role] = &[
    Role::AlertDialog,
    Role::Client,
    Role::Desktop,
    Role::Dialog,
    Role::EmbeddedObject,
    Role::Iframe,
    Role::IframePresentational,
    Role::RootWebArea,
    Role::Unknown,
    Role::Window,
];

const CONTAINER_ROLES: &[Role] = &[
    Role::Document,
    Role::GenericContainer,
    Role::Group,
    Role::List,
    Role::ListItem,
    Role::Tab,
    Role::TabPanel,
    Role::Toolbar,
    Role::Window,
];

const LANDMARK_ROLES: &[Role] = &[
    Role::Application,
    Role::Banner,
    Role::Complementary,
    Role::ContentInfo,
    Role::Form,
    Role::Main,
    Role::Navigation,
    Role::Region,
    Role::Search,
];

const IGNORABLE_LEAF_ROLES: &[Role] = &[
    Role::Client,
    Role::GenericContainer,
    Role::Group,
    Role::Image,
    Role::Paragraph,
    Role::ScrollView,
    Role::StaticText,
    Role::Unknown,
];

const FORM_FIELD_ROLES: &[Role] = &[
    Role::Button,
    Role::CheckBox,
    Role::ComboBox,
    Role::ListBox,
    Role::PopUpButton,
    Role::RadioButton,
    Role::Slider,
    Role::Switch,
    Role::TextField,
];

/// Matches any node whose role is in `roles`.
pub fn roles<N: AutomationNode>(roles: &'static [Role]) -> impl Fn(&N) -> bool {
    move |node: &N| roles.contains(&node.role())
}

/// Matches when any of the given predicates matches.
pub fn any_of<'a, N: AutomationNode + 'a>(
    predicates: Vec<Box<dyn Fn(&N) -> bool + 'a>>,
) -> impl Fn(&N) -> bool + 'a {
    move |node: &N| predicates.iter().any(|pred| pred(node))
}

fn has_text(text: Option<String>) -> bool {
    text.is_some_and(|t| !t.is_empty())
}

pub fn math<N: AutomationNode>(node: &N) -> bool {
    node.role() == Role::Math
}

/// Nodes whose children are not worth navigating into.
pub fn leaf<N: AutomationNode>(node: &N) -> bool {
    let Some(first) = node.first_child() else {
        return true;
    };
    match node.role() {
        Role::Button | Role::PopUpButton | Role::Slider => return true,
        Role::TextField if !node.has_state(State::RichlyEditable) => return true,
        _ => {}
    }
    if node.has_state(State::Invisible) || math(node) {
        return true;
    }
    let mut child = Some(first);
    while let Some(current) = child {
        if !current.has_state(State::Invisible) {
            return false;
        }
        child = current.next_sibling();
    }
    true
}

pub fn leaf_with_text<N: AutomationNode>(node: &N) -> bool {
    leaf(node) && (has_text(node.name()) || has_text(node.value()))
}

/// Nodes that bound navigation: windows, dialogs and top-level documents.
pub fn root<N: AutomationNode>(node: &N) -> bool {
    match node.role() {
        Role::Window | Role::Desktop | Role::Dialog | Role::AlertDialog => true,
        Role::RootWebArea => match node.parent() {
            None => true,
            Some(parent) => !matches!(
                parent.role(),
                Role::Iframe | Role::IframePresentational
            ),
        },
        _ => false,
    }
}

pub fn structural_container<N: AutomationNode>(node: &N) -> bool {
    STRUCTURAL_CONTAINER_ROLES.contains(&node.role())
}

pub fn landmark<N: AutomationNode>(node: &N) -> bool {
    LANDMARK_ROLES.contains(&node.role())
}

/// Nodes whose subtree is always scanned instead of being treated as a unit.
pub fn container<N: AutomationNode>(node: &N) -> bool {
    if math(node) {
        return false;
    }
    CONTAINER_ROLES.contains(&node.role())
        || landmark(node)
        || structural_container(node)
        || node.has_state(State::RichlyEditable)
}

/// Nodes that carry nothing a user would want to land on.
pub fn should_ignore_node<N: AutomationNode>(node: &N) -> bool {
    if node.has_state(State::Invisible) {
        return true;
    }
    if node.location().is_some_and(|location| location.is_empty()) {
        return true;
    }
    if structural_container(node) {
        return true;
    }
    if has_text(node.name()) || has_text(node.value()) {
        return false;
    }
    leaf(node) && IGNORABLE_LEAF_ROLES.contains(&node.role())
}

/// Anything a linear "next object" command should stop on.
pub fn object<N: AutomationNode>(node: &N) -> bool {
    if node.has_state(State::Editable) || node.has_state(State::Focusable) {
        return !should_ignore_node(node);
    }
    leaf(node) && !should_ignore_node(node)
}

pub fn button<N: AutomationNode>(node: &N) -> bool {
    matches!(node.role(), Role::Button | Role::PopUpButton)
}

pub fn link<N: AutomationNode>(node: &N) -> bool {
    node.role() == Role::Link
}

pub fn visited_link<N: AutomationNode>(node: &N) -> bool {
    link(node) && node.has_state(State::Visited)
}

pub fn heading<N: AutomationNode>(node: &N) -> bool {
    node.role() == Role::Heading
}

pub fn image<N: AutomationNode>(node: &N) -> bool {
    node.role() == Role::Image
}

pub fn table<N: AutomationNode>(node: &N) -> bool {
    matches!(node.role(), Role::Table | Role::Grid)
}

pub fn row<N: AutomationNode>(node: &N) -> bool {
    node.role() == Role::Row
}

pub fn cell_like<N: AutomationNode>(node: &N) -> bool {
    matches!(
        node.role(),
        Role::Cell | Role::ColumnHeader | Role::RowHeader
    )
}

pub fn edit_text<N: AutomationNode>(node: &N) -> bool {
    if node.role() == Role::TextField {
        return true;
    }
    node.has_state(State::Editable)
        && !node
            .parent()
            .is_some_and(|parent| parent.has_state(State::Editable))
}

pub fn form_field<N: AutomationNode>(node: &N) -> bool {
    FORM_FIELD_ROLES.contains(&node.role()) || edit_text(node)
}

/// Headings of exactly `level`.
pub fn make_heading_predicate<N: AutomationNode>(level: u32) -> impl Fn(&N) -> bool {
    move |node: &N| heading(node) && node.hierarchical_level() == Some(level)
}

/// Which table axes a cell must share with the start cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCellOptions {
    pub row: bool,
    pub col: bool,
}

/// Cells on the same row and/or column as `start`.
///
/// Errors when neither axis is requested.
pub fn make_table_cell_predicate<N: AutomationNode>(
    start: &N,
    opts: TableCellOptions,
) -> DomainResult<impl Fn(&N) -> bool> {
    if !opts.row && !opts.col {
        return Err(DomainError::InvalidPredicate(
            "table cell predicate needs row or col".to_string(),
        ));
    }
    let start_row = start.table_cell_row_index();
    let start_col = start.table_cell_column_index();
    Ok(move |node: &N| {
        if !cell_like(node) {
            return false;
        }
        if opts.row && node.table_cell_row_index() != start_row {
            return false;
        }
        if opts.col && node.table_cell_column_index() != start_col {
            return false;
        }
        true
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AxTree, NodeData, NodeRef, Rect};

    fn tree() -> (AxTree, NodeRef) {
        let tree = AxTree::new();
        let root = tree.insert(NodeData::named(Role::Window, "win"), None);
        (tree, root)
    }

    #[test]
    fn given_node_without_children_when_checking_leaf_then_true() {
        let (tree, root) = tree();
        let text = tree.insert(NodeData::named(Role::StaticText, "hi"), Some(&root));
        assert!(leaf(&text));
        assert!(!leaf(&root));
    }

    #[test]
    fn given_button_with_children_when_checking_leaf_then_true() {
        let (tree, root) = tree();
        let button = tree.insert(NodeData::named(Role::Button, "ok"), Some(&root));
        tree.insert(NodeData::named(Role::StaticText, "ok"), Some(&button));
        assert!(leaf(&button));
    }

    #[test]
    fn given_only_invisible_children_when_checking_leaf_then_true() {
        let (tree, root) = tree();
        let group = tree.insert(NodeData::new(Role::Group), Some(&root));
        tree.insert(
            NodeData::named(Role::StaticText, "x").with_state(State::Invisible),
            Some(&group),
        );
        assert!(leaf(&group));
    }

    #[test]
    fn given_roles_when_checking_root_then_windows_and_top_documents_match() {
        let (tree, win) = tree();
        let doc = tree.insert(NodeData::new(Role::RootWebArea), Some(&win));
        let iframe = tree.insert(NodeData::new(Role::Iframe), Some(&doc));
        let inner_doc = tree.insert(NodeData::new(Role::RootWebArea), Some(&iframe));
        assert!(root(&win));
        assert!(root(&doc));
        assert!(!root(&inner_doc));
        assert!(!root(&iframe));
    }

    #[test]
    fn given_unnamed_static_text_when_checking_ignore_then_ignored() {
        let (tree, root) = tree();
        let unnamed = tree.insert(NodeData::new(Role::StaticText), Some(&root));
        let named = tree.insert(NodeData::named(Role::StaticText, "t"), Some(&root));
        let empty = tree.insert(
            NodeData::named(Role::Button, "b").with_location(Rect::new(0, 0, 0, 0)),
            Some(&root),
        );
        assert!(should_ignore_node(&unnamed));
        assert!(!should_ignore_node(&named));
        assert!(should_ignore_node(&empty));
        assert!(should_ignore_node(&root));
    }

    #[test]
    fn given_math_when_checking_container_then_false() {
        let (tree, root) = tree();
        let math_node = tree.insert(NodeData::new(Role::Math), Some(&root));
        let list = tree.insert(NodeData::new(Role::List), Some(&root));
        let main = tree.insert(NodeData::new(Role::Main), Some(&root));
        assert!(!container(&math_node));
        assert!(container(&list));
        assert!(container(&main));
    }

    #[test]
    fn given_heading_level_when_matching_then_only_that_level() {
        let (tree, root) = tree();
        let mut data = NodeData::named(Role::Heading, "h2");
        data.level = Some(2);
        let h2 = tree.insert(data, Some(&root));
        let pred = make_heading_predicate::<NodeRef>(2);
        assert!(pred(&h2));
        assert!(!make_heading_predicate::<NodeRef>(1)(&h2));
    }

    #[test]
    fn given_no_axis_when_making_table_cell_predicate_then_errors() {
        let (_tree, root) = tree();
        let result = make_table_cell_predicate(&root, TableCellOptions::default());
        assert!(matches!(result, Err(DomainError::InvalidPredicate(_))));
    }

    #[test]
    fn given_row_axis_when_matching_cells_then_same_row_only() {
        let (tree, root) = tree();
        let cell = |row, col| {
            let mut data = NodeData::new(Role::Cell);
            data.row = Some(row);
            data.col = Some(col);
            tree.insert(data, Some(&root))
        };
        let start = cell(1, 0);
        let same_row = cell(1, 3);
        let other_row = cell(2, 0);
        let pred = make_table_cell_predicate(
            &start,
            TableCellOptions {
                row: true,
                col: false,
            },
        )
        .unwrap();
        assert!(pred(&same_row));
        assert!(!pred(&other_row));
        assert!(!pred(&root));
    }

    #[test]
    fn given_any_of_when_one_matches_then_true() {
        let (tree, root) = tree();
        let link_node = tree.insert(NodeData::named(Role::Link, "l"), Some(&root));
        let pred = any_of::<NodeRef>(vec![Box::new(button::<NodeRef>), Box::new(link::<NodeRef>)]);
        assert!(pred(&link_node));
        assert!(!pred(&root));
        assert!(roles::<NodeRef>(&[Role::Link])(&link_node));
    }

    #[test]
    fn given_text_and_visited_state_when_checking_then_text_leaves_and_visited_links() {
        let (tree, root) = tree();
        let named = tree.insert(NodeData::named(Role::StaticText, "hello"), Some(&root));
        let blank = tree.insert(NodeData::new(Role::StaticText), Some(&root));
        let visited = tree.insert(
            NodeData::named(Role::Link, "seen").with_state(State::Visited),
            Some(&root),
        );
        assert!(leaf_with_text(&named));
        assert!(!leaf_with_text(&blank));
        assert!(visited_link(&visited));
        assert!(!visited_link(&named));
    }
}

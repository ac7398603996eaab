//! Textual node selectors and filters used by the navigation service.
//!
//! Selectors address a single node:
//! - `""` or `/`: the root
//! - `0/2/1`: child indices from the root
//! - `@name`: first node (pre-order) with that name
//!
//! Filters name a predicate: `leaf`, `object`, `button`, `link`,
//! `heading`, `heading:<level>`, `landmark`, `form-field`, `table`,
//! `same-row`, `same-col`, `any`, or any role (`static-text`).

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{AutomationNode, NodeRef, Role};
use crate::walker::predicate::{self, TableCellOptions};
use crate::walker::Unary;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Root,
    Path(Vec<usize>),
    Name(String),
}

impl FromStr for Selector {
    type Err = ApplicationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == "/" {
            return Ok(Self::Root);
        }
        if let Some(name) = s.strip_prefix('@') {
            if name.is_empty() {
                return Err(ApplicationError::InvalidSelector {
                    selector: s.to_string(),
                    reason: "empty name".to_string(),
                });
            }
            return Ok(Self::Name(name.to_string()));
        }
        s.trim_matches('/')
            .split('/')
            .map(|part| {
                part.parse::<usize>()
                    .map_err(|e| ApplicationError::InvalidSelector {
                        selector: s.to_string(),
                        reason: format!("'{}': {}", part, e),
                    })
            })
            .collect::<ApplicationResult<Vec<_>>>()
            .map(Self::Path)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.write_str("/"),
            Self::Path(path) => f.write_str(&path.iter().join("/")),
            Self::Name(name) => write!(f, "@{}", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeFilter {
    Any,
    Leaf,
    Object,
    Button,
    Link,
    Heading(Option<u32>),
    Landmark,
    FormField,
    Table,
    SameRow,
    SameColumn,
    Role(Role),
}

impl FromStr for NodeFilter {
    type Err = ApplicationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let filter = match s {
            "any" => Self::Any,
            "leaf" => Self::Leaf,
            "object" => Self::Object,
            "button" => Self::Button,
            "link" => Self::Link,
            "heading" => Self::Heading(None),
            "landmark" => Self::Landmark,
            "form-field" => Self::FormField,
            "table" => Self::Table,
            "same-row" => Self::SameRow,
            "same-col" => Self::SameColumn,
            other => {
                if let Some(level) = other.strip_prefix("heading:") {
                    let level = level
                        .parse()
                        .map_err(|_| ApplicationError::UnknownFilter(other.to_string()))?;
                    Self::Heading(Some(level))
                } else {
                    let role = other
                        .parse::<Role>()
                        .map_err(|_| ApplicationError::UnknownFilter(other.to_string()))?;
                    Self::Role(role)
                }
            }
        };
        Ok(filter)
    }
}

impl NodeFilter {
    /// Builds the predicate; table filters are relative to `start`.
    pub fn predicate(&self, start: &NodeRef) -> ApplicationResult<Unary<'static, NodeRef>> {
        let pred: Unary<'static, NodeRef> = match self {
            Self::Any => Box::new(|_: &NodeRef| true),
            Self::Leaf => Box::new(predicate::leaf::<NodeRef>),
            Self::Object => Box::new(predicate::object::<NodeRef>),
            Self::Button => Box::new(predicate::button::<NodeRef>),
            Self::Link => Box::new(predicate::link::<NodeRef>),
            Self::Heading(None) => Box::new(predicate::heading::<NodeRef>),
            Self::Heading(Some(level)) => Box::new(predicate::make_heading_predicate::<NodeRef>(*level)),
            Self::Landmark => Box::new(predicate::landmark::<NodeRef>),
            Self::FormField => Box::new(predicate::form_field::<NodeRef>),
            Self::Table => Box::new(predicate::table::<NodeRef>),
            Self::SameRow => Box::new(predicate::make_table_cell_predicate(
                start,
                TableCellOptions {
                    row: true,
                    col: false,
                },
            )?),
            Self::SameColumn => Box::new(predicate::make_table_cell_predicate(
                start,
                TableCellOptions {
                    row: false,
                    col: true,
                },
            )?),
            Self::Role(role) => {
                let role = *role;
                Box::new(move |node: &NodeRef| node.role() == role)
            }
        };
        Ok(pred)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", Selector::Root)]
    #[case("/", Selector::Root)]
    #[case("0/2/1", Selector::Path(vec![0, 2, 1]))]
    #[case("/3/", Selector::Path(vec![3]))]
    #[case("@ok", Selector::Name("ok".to_string()))]
    fn given_selector_text_when_parsing_then_selector(#[case] input: &str, #[case] expected: Selector) {
        assert_eq!(input.parse::<Selector>().unwrap(), expected);
    }

    #[rstest]
    #[case("0/x")]
    #[case("@")]
    #[case("-1")]
    fn given_malformed_selector_when_parsing_then_invalid(#[case] input: &str) {
        assert!(matches!(
            input.parse::<Selector>(),
            Err(ApplicationError::InvalidSelector { .. })
        ));
    }

    #[rstest]
    #[case("leaf", NodeFilter::Leaf)]
    #[case("heading:3", NodeFilter::Heading(Some(3)))]
    #[case("static-text", NodeFilter::Role(Role::StaticText))]
    #[case("same-col", NodeFilter::SameColumn)]
    fn given_filter_text_when_parsing_then_filter(#[case] input: &str, #[case] expected: NodeFilter) {
        assert_eq!(input.parse::<NodeFilter>().unwrap(), expected);
    }

    #[test]
    fn given_unknown_filter_when_parsing_then_error() {
        assert!(matches!(
            "spaceship".parse::<NodeFilter>(),
            Err(ApplicationError::UnknownFilter(_))
        ));
        assert!(matches!(
            "heading:x".parse::<NodeFilter>(),
            Err(ApplicationError::UnknownFilter(_))
        ));
    }

    #[test]
    fn given_path_selector_when_displaying_then_slash_separated() {
        assert_eq!(Selector::Path(vec![0, 2]).to_string(), "0/2");
        assert_eq!(Selector::Name("x".into()).to_string(), "@x");
    }
}

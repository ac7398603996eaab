//! Accessibility roles and states exposed by the host platform.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

macro_rules! roles {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// Role of a node in the accessibility tree.
        ///
        /// Serialized and parsed in kebab-case, e.g. `static-text`.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum Role {
            $(
                #[serde(rename = $name)]
                $variant,
            )*
        }

        impl Role {
            /// Every known role, in declaration order.
            pub const ALL: &'static [Role] = &[$(Role::$variant),*];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Role::$variant => $name,)*
                }
            }
        }

        impl FromStr for Role {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Role::$variant),)*
                    other => Err(DomainError::UnknownRole(other.to_string())),
                }
            }
        }
    };
}

roles! {
    Alert => "alert",
    AlertDialog => "alert-dialog",
    Application => "application",
    Article => "article",
    Banner => "banner",
    Button => "button",
    Caption => "caption",
    Cell => "cell",
    CheckBox => "check-box",
    Client => "client",
    ColumnHeader => "column-header",
    ComboBox => "combo-box",
    Complementary => "complementary",
    ContentInfo => "content-info",
    Desktop => "desktop",
    Dialog => "dialog",
    Document => "document",
    EmbeddedObject => "embedded-object",
    Figure => "figure",
    Form => "form",
    GenericContainer => "generic-container",
    Grid => "grid",
    Group => "group",
    Heading => "heading",
    Iframe => "iframe",
    IframePresentational => "iframe-presentational",
    Image => "image",
    InlineTextBox => "inline-text-box",
    LineBreak => "line-break",
    Link => "link",
    List => "list",
    ListBox => "list-box",
    ListBoxOption => "list-box-option",
    ListItem => "list-item",
    ListMarker => "list-marker",
    Main => "main",
    Math => "math",
    MenuItem => "menu-item",
    Navigation => "navigation",
    Paragraph => "paragraph",
    PopUpButton => "pop-up-button",
    RadioButton => "radio-button",
    Region => "region",
    RootWebArea => "root-web-area",
    Row => "row",
    RowHeader => "row-header",
    ScrollView => "scroll-view",
    Search => "search",
    Slider => "slider",
    StaticText => "static-text",
    Switch => "switch",
    Tab => "tab",
    TabList => "tab-list",
    TabPanel => "tab-panel",
    Table => "table",
    TextField => "text-field",
    Toolbar => "toolbar",
    Tree => "tree",
    TreeItem => "tree-item",
    Window => "window",
    Unknown => "unknown",
}

impl Default for Role {
    fn default() -> Self {
        Role::GenericContainer
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean states a node may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum State {
    Focusable,
    Invisible,
    Editable,
    RichlyEditable,
    Offscreen,
    Visited,
    Multiline,
    Collapsed,
}

//! Renderable menu structure handed to the host

use serde::Serialize;

/// Class name of an item's dropdown panel
pub fn dropdown_id(item: &str) -> String {
    format!("{item}DropDown")
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubItemView {
    pub name: String,
    pub title: String,
    pub icon: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MenuEntryView {
    Dropdown {
        name: String,
        title: String,
        #[serde(rename = "subItems")]
        sub_items: Vec<SubItemView>,
    },
    /// Widget with its produced markup
    Widget { name: String, content: String },
}

impl MenuEntryView {
    pub fn name(&self) -> &str {
        match self {
            MenuEntryView::Dropdown { name, .. } | MenuEntryView::Widget { name, .. } => name,
        }
    }
}

/// Fully materialized menu bar, in entry order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MenuBarView {
    pub entries: Vec<MenuEntryView>,
}

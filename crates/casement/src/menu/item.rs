//! Dropdown items

use std::fmt;
use std::rc::Rc;

use crate::error::MenuError;
use crate::window::WindowId;
use super::validate_name;
use super::view::{MenuEntryView, SubItemView};

/// Identifies which sub-item fired
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuActivation {
    pub window: WindowId,
    pub item: String,
    pub sub: String,
}

/// Activation handler for a sub-item
pub type MenuAction = Rc<dyn Fn(&MenuActivation)>;

/// Entry inside a dropdown
#[derive(Clone)]
pub struct MenuSubItem {
    name: String,
    title: String,
    icon: Option<String>,
    action: MenuAction,
}

impl MenuSubItem {
    pub fn new<F>(name: &str, title: &str, icon: Option<&str>, action: F) -> Result<Self, MenuError>
    where
        F: Fn(&MenuActivation) + 'static,
    {
        validate_name(name)?;
        Ok(Self {
            name: name.to_string(),
            title: title.to_string(),
            icon: icon.map(str::to_string),
            action: Rc::new(action),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// Shared handle to the handler, so it can run after the engine borrow ends
    pub fn action(&self) -> MenuAction {
        Rc::clone(&self.action)
    }

    pub(crate) fn view(&self) -> SubItemView {
        SubItemView {
            name: self.name.clone(),
            title: self.title.clone(),
            icon: self.icon.clone(),
        }
    }
}

impl fmt::Debug for MenuSubItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuSubItem")
            .field("name", &self.name)
            .field("title", &self.title)
            .field("icon", &self.icon)
            .finish_non_exhaustive()
    }
}

/// Top-level menu item; its trigger opens a dropdown of sub-items
#[derive(Clone, Debug)]
pub struct MenuItem {
    name: String,
    title: String,
    sub_items: Vec<MenuSubItem>,
}

impl MenuItem {
    pub fn new(name: &str, title: &str) -> Result<Self, MenuError> {
        validate_name(name)?;
        Ok(Self {
            name: name.to_string(),
            title: title.to_string(),
            sub_items: Vec::new(),
        })
    }

    /// Append a sub-item. Names are unique within the item.
    pub fn add_sub_item(&mut self, sub: MenuSubItem) -> Result<(), MenuError> {
        if self.sub_item(&sub.name).is_some() {
            return Err(MenuError::DuplicateName(sub.name));
        }
        self.sub_items.push(sub);
        Ok(())
    }

    /// Builder form of [`add_sub_item`](Self::add_sub_item)
    pub fn with_sub_item(mut self, sub: MenuSubItem) -> Result<Self, MenuError> {
        self.add_sub_item(sub)?;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn sub_items(&self) -> &[MenuSubItem] {
        &self.sub_items
    }

    pub fn sub_item(&self, name: &str) -> Option<&MenuSubItem> {
        self.sub_items.iter().find(|s| s.name == name)
    }

    pub(crate) fn view(&self) -> MenuEntryView {
        MenuEntryView::Dropdown {
            name: self.name.clone(),
            title: self.title.clone(),
            sub_items: self.sub_items.iter().map(MenuSubItem::view).collect(),
        }
    }
}

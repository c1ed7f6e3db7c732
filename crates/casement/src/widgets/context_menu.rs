//! Context menu decoration

use std::fmt;
use std::rc::Rc;

use serde::Serialize;

use crate::math::Vec2;
use crate::window::WindowId;

/// Entry handler; receives the context menu's window id
pub type ContextAction = Rc<dyn Fn(WindowId)>;

#[derive(Clone)]
pub struct ContextEntry {
    pub name: String,
    pub icon: Option<String>,
    action: ContextAction,
}

impl ContextEntry {
    pub fn new<F>(name: &str, icon: Option<&str>, action: F) -> Self
    where
        F: Fn(WindowId) + 'static,
    {
        Self {
            name: name.to_string(),
            icon: icon.map(str::to_string),
            action: Rc::new(action),
        }
    }

    fn view(&self) -> ContextEntryView {
        ContextEntryView {
            name: self.name.clone(),
            icon: self.icon.clone(),
        }
    }
}

impl fmt::Debug for ContextEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextEntry")
            .field("name", &self.name)
            .field("icon", &self.icon)
            .finish_non_exhaustive()
    }
}

/// What to show and where
#[derive(Clone, Debug)]
pub struct ContextMenuSpec {
    pub title: String,
    pub entries: Vec<ContextEntry>,
    /// Page position of the panel's top-left corner
    pub position: Vec2,
}

impl ContextMenuSpec {
    pub fn new(title: &str, x: f32, y: f32) -> Self {
        Self {
            title: title.to_string(),
            entries: Vec::new(),
            position: Vec2::new(x, y),
        }
    }

    pub fn entry<F>(mut self, name: &str, icon: Option<&str>, action: F) -> Self
    where
        F: Fn(WindowId) + 'static,
    {
        self.entries.push(ContextEntry::new(name, icon, action));
        self
    }
}

/// Renderable entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContextEntryView {
    pub name: String,
    pub icon: Option<String>,
}

#[derive(Debug)]
pub struct ContextMenu {
    entries: Vec<ContextEntry>,
}

impl ContextMenu {
    pub fn new(entries: Vec<ContextEntry>) -> Self {
        Self { entries }
    }

    pub fn views(&self) -> Vec<ContextEntryView> {
        self.entries.iter().map(ContextEntry::view).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Handler of the entry at `index`
    pub fn action(&self, index: usize) -> Option<ContextAction> {
        self.entries.get(index).map(|e| Rc::clone(&e.action))
    }
}

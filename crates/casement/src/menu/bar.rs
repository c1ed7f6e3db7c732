//! Menu bar

use futures::future::{self, FutureExt, LocalBoxFuture};

use crate::error::MenuError;
use super::item::{MenuItem, MenuSubItem};
use super::view::{MenuBarView, MenuEntryView};
use super::widget::MenuWidget;

/// Top-level menu bar entry
#[derive(Clone, Debug)]
pub enum MenuEntry {
    Item(MenuItem),
    Widget(MenuWidget),
}

impl MenuEntry {
    pub fn name(&self) -> &str {
        match self {
            MenuEntry::Item(item) => item.name(),
            MenuEntry::Widget(widget) => widget.name(),
        }
    }
}

impl From<MenuItem> for MenuEntry {
    fn from(item: MenuItem) -> Self {
        MenuEntry::Item(item)
    }
}

impl From<MenuWidget> for MenuEntry {
    fn from(widget: MenuWidget) -> Self {
        MenuEntry::Widget(widget)
    }
}

/// Ordered menu items and widgets attached to one window
#[derive(Clone, Debug, Default)]
pub struct MenuBar {
    entries: Vec<MenuEntry>,
}

impl MenuBar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Names are unique across items and widgets.
    pub fn add(&mut self, entry: MenuEntry) -> Result<(), MenuError> {
        if self.entries.iter().any(|e| e.name() == entry.name()) {
            return Err(MenuError::DuplicateName(entry.name().to_string()));
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn add_menu_item(&mut self, item: MenuItem) -> Result<(), MenuError> {
        self.add(MenuEntry::Item(item))
    }

    pub fn add_menu_widget(&mut self, widget: MenuWidget) -> Result<(), MenuError> {
        self.add(MenuEntry::Widget(widget))
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn items(&self) -> impl Iterator<Item = &MenuItem> {
        self.entries.iter().filter_map(|e| match e {
            MenuEntry::Item(item) => Some(item),
            MenuEntry::Widget(_) => None,
        })
    }

    pub fn widgets(&self) -> impl Iterator<Item = &MenuWidget> {
        self.entries.iter().filter_map(|e| match e {
            MenuEntry::Widget(widget) => Some(widget),
            MenuEntry::Item(_) => None,
        })
    }

    pub fn item(&self, name: &str) -> Option<&MenuItem> {
        self.items().find(|item| item.name() == name)
    }

    pub fn sub_item(&self, item: &str, sub: &str) -> Result<&MenuSubItem, MenuError> {
        let parent = self
            .item(item)
            .ok_or_else(|| MenuError::UnknownItem(item.to_string()))?;
        parent.sub_item(sub).ok_or_else(|| MenuError::UnknownSubItem {
            item: item.to_string(),
            sub: sub.to_string(),
        })
    }

    /// Materialize the renderable structure.
    ///
    /// Widget producers are started immediately and awaited together; the
    /// resulting view keeps entry order. The first failing widget fails the
    /// whole view.
    pub fn menu_bar_view(&self) -> LocalBoxFuture<'static, Result<MenuBarView, MenuError>> {
        let pending: Vec<LocalBoxFuture<'static, Result<MenuEntryView, MenuError>>> = self
            .entries
            .iter()
            .map(|entry| match entry {
                MenuEntry::Item(item) => future::ready(Ok(item.view())).boxed_local(),
                MenuEntry::Widget(widget) => {
                    let name = widget.name().to_string();
                    let content = widget.produce();
                    async move {
                        match content.await {
                            Ok(content) => Ok(MenuEntryView::Widget { name, content }),
                            Err(source) => Err(MenuError::Widget { name, source }),
                        }
                    }
                    .boxed_local()
                }
            })
            .collect();

        async move {
            let entries = future::try_join_all(pending).await?;
            Ok(MenuBarView { entries })
        }
        .boxed_local()
    }
}

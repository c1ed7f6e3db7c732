//! Recording page host

use std::collections::{BTreeMap, HashMap};

use crate::content::TemplateKind;
use crate::error::HostError;
use crate::host::{check_regions, Cursor, Host, NodeId, PageListener, WindowParts};
use crate::math::Vec2;
use crate::menu::MenuBarView;
use crate::widgets::{ContextEntryView, DialogView};
use crate::window::WindowId;

/// The page body every window root is appended to
pub const BODY: NodeId = NodeId(0);

#[derive(Clone, Debug, Default)]
struct MockNode {
    parent: Option<NodeId>,
    text: Option<String>,
    image: Option<String>,
    markup: Vec<String>,
    displayed: bool,
    z_index: Option<u32>,
    position: Vec2,
    cursor: Option<Cursor>,
    interactive: bool,
    resizable: bool,
    detached: bool,
}

/// Simulated dropdown panel
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct MockDropdown {
    open: bool,
    z_index: u32,
}

/// Host that keeps a node tree in memory and records every side effect.
///
/// Inspection methods mirror the [`Host`] mutators so tests can assert on
/// what the engine did to the page.
#[derive(Debug)]
pub struct MockHost {
    nodes: BTreeMap<NodeId, MockNode>,
    next_node: u64,
    windows: HashMap<WindowId, WindowParts>,
    listeners: BTreeMap<PageListener, bool>,
    installs: BTreeMap<PageListener, usize>,
    dropdowns: HashMap<(WindowId, String), MockDropdown>,
    menus: HashMap<WindowId, MenuBarView>,
    context_entries: HashMap<WindowId, Vec<ContextEntryView>>,
    dialogs: HashMap<WindowId, DialogView>,
    focused: Option<(WindowId, usize, Option<(usize, usize)>)>,
    fail_next_mount: Option<HostError>,
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHost {
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(
            BODY,
            MockNode {
                displayed: true,
                interactive: true,
                ..MockNode::default()
            },
        );
        Self {
            nodes,
            next_node: 1,
            windows: HashMap::new(),
            listeners: BTreeMap::new(),
            installs: BTreeMap::new(),
            dropdowns: HashMap::new(),
            menus: HashMap::new(),
            context_entries: HashMap::new(),
            dialogs: HashMap::new(),
            focused: None,
            fail_next_mount: None,
        }
    }

    fn add_node(&mut self, parent: NodeId) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        self.nodes.insert(
            id,
            MockNode {
                parent: Some(parent),
                displayed: true,
                interactive: true,
                resizable: true,
                ..MockNode::default()
            },
        );
        id
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut MockNode> {
        self.nodes.get_mut(&id)
    }

    /// Create a child node, e.g. a button inside a window's content
    pub fn child_of(&mut self, parent: NodeId) -> NodeId {
        self.add_node(parent)
    }

    /// A node on the page outside every window
    pub fn outside_node(&mut self) -> NodeId {
        self.add_node(BODY)
    }

    /// Make the next `mount_window` fail with `error`
    pub fn fail_mount(&mut self, error: HostError) {
        self.fail_next_mount = Some(error);
    }

    /// Place a panel, as a stylesheet or a previous drag would
    pub fn set_panel_position(&mut self, node: NodeId, position: Vec2) {
        if let Some(n) = self.node_mut(node) {
            n.position = position;
        }
    }

    pub fn parts(&self, window: WindowId) -> Option<WindowParts> {
        self.windows.get(&window).copied()
    }

    pub fn z_index(&self, node: NodeId) -> Option<u32> {
        self.nodes.get(&node).and_then(|n| n.z_index)
    }

    pub fn is_displayed(&self, node: NodeId) -> bool {
        self.nodes.get(&node).is_some_and(|n| n.displayed)
    }

    pub fn is_interactive(&self, node: NodeId) -> bool {
        self.nodes.get(&node).is_some_and(|n| n.interactive)
    }

    pub fn is_resizable(&self, node: NodeId) -> bool {
        self.nodes.get(&node).is_some_and(|n| n.resizable)
    }

    pub fn is_detached(&self, node: NodeId) -> bool {
        self.nodes.get(&node).is_some_and(|n| n.detached)
    }

    pub fn node_position(&self, node: NodeId) -> Vec2 {
        self.nodes.get(&node).map(|n| n.position).unwrap_or_default()
    }

    pub fn cursor(&self, node: NodeId) -> Option<Cursor> {
        self.nodes.get(&node).and_then(|n| n.cursor)
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(&node).and_then(|n| n.text.as_deref())
    }

    pub fn image(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(&node).and_then(|n| n.image.as_deref())
    }

    /// Markup blocks appended to a node
    pub fn markup(&self, node: NodeId) -> &[String] {
        self.nodes
            .get(&node)
            .map(|n| n.markup.as_slice())
            .unwrap_or_default()
    }

    /// Number of window roots currently attached to the body
    pub fn attached_roots(&self) -> usize {
        self.windows
            .values()
            .filter(|p| !self.is_detached(p.root))
            .count()
    }

    /// How many times a listener was installed over the host's lifetime
    pub fn listener_installs(&self, listener: PageListener) -> usize {
        self.installs.get(&listener).copied().unwrap_or(0)
    }

    pub fn is_listening(&self, listener: PageListener) -> bool {
        self.listeners.get(&listener).copied().unwrap_or(false)
    }

    pub fn dropdown_open(&self, window: WindowId, item: &str) -> bool {
        self.dropdowns
            .get(&(window, item.to_string()))
            .is_some_and(|d| d.open)
    }

    /// Z-index a dropdown was last opened at
    pub fn dropdown_z(&self, window: WindowId, item: &str) -> Option<u32> {
        self.dropdowns
            .get(&(window, item.to_string()))
            .map(|d| d.z_index)
    }

    pub fn menu_view(&self, window: WindowId) -> Option<&MenuBarView> {
        self.menus.get(&window)
    }

    pub fn context_entries(&self, window: WindowId) -> Option<&[ContextEntryView]> {
        self.context_entries.get(&window).map(Vec::as_slice)
    }

    pub fn dialog_view(&self, window: WindowId) -> Option<&DialogView> {
        self.dialogs.get(&window)
    }

    pub fn focused_field(&self) -> Option<(WindowId, usize, Option<(usize, usize)>)> {
        self.focused
    }
}

impl Host for MockHost {
    fn mount_window(
        &mut self,
        window: WindowId,
        _kind: TemplateKind,
        markup: &str,
    ) -> Result<WindowParts, HostError> {
        if let Some(err) = self.fail_next_mount.take() {
            return Err(err);
        }
        let has_menu = check_regions(markup)?;

        let root = self.add_node(BODY);
        let panel = self.add_node(root);
        if let Some(n) = self.node_mut(panel) {
            n.displayed = false;
        }
        let title_bar = self.add_node(panel);
        let icon = self.add_node(title_bar);
        let title = self.add_node(title_bar);
        let close_button = self.add_node(title_bar);
        let menu_slot = has_menu.then(|| self.add_node(panel));
        let content = self.add_node(panel);

        let parts = WindowParts {
            root,
            panel,
            icon,
            title_bar,
            title,
            close_button,
            menu_slot,
            content,
        };
        self.windows.insert(window, parts);
        Ok(parts)
    }

    fn detach(&mut self, root: NodeId) {
        if let Some(n) = self.node_mut(root) {
            n.detached = true;
        }
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(&id).and_then(|n| n.parent);
        }
        false
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(n) = self.node_mut(node) {
            n.text = Some(text.to_string());
        }
    }

    fn set_image(&mut self, node: NodeId, src: &str) {
        if let Some(n) = self.node_mut(node) {
            n.image = Some(src.to_string());
        }
    }

    fn append_markup(&mut self, node: NodeId, markup: &str) -> Result<(), HostError> {
        match self.node_mut(node) {
            Some(n) if n.detached => Err(HostError::Detached(node)),
            Some(n) => {
                n.markup.push(markup.to_string());
                Ok(())
            }
            None => Err(HostError::Detached(node)),
        }
    }

    fn set_displayed(&mut self, node: NodeId, displayed: bool) {
        if let Some(n) = self.node_mut(node) {
            n.displayed = displayed;
        }
    }

    fn set_z_index(&mut self, node: NodeId, z: u32) {
        if let Some(n) = self.node_mut(node) {
            n.z_index = Some(z);
        }
    }

    fn position(&self, node: NodeId) -> Vec2 {
        self.node_position(node)
    }

    fn set_position(&mut self, node: NodeId, position: Vec2) {
        self.set_panel_position(node, position);
    }

    fn set_cursor(&mut self, node: NodeId, cursor: Cursor) {
        if let Some(n) = self.node_mut(node) {
            n.cursor = Some(cursor);
        }
    }

    fn set_interactive(&mut self, node: NodeId, interactive: bool) {
        if let Some(n) = self.node_mut(node) {
            n.interactive = interactive;
        }
    }

    fn set_resizable(&mut self, node: NodeId, resizable: bool) {
        if let Some(n) = self.node_mut(node) {
            n.resizable = resizable;
        }
    }

    fn install_listener(&mut self, listener: PageListener) {
        self.listeners.insert(listener, true);
        *self.installs.entry(listener).or_insert(0) += 1;
    }

    fn remove_listener(&mut self, listener: PageListener) {
        self.listeners.insert(listener, false);
    }

    fn mount_menu_bar(
        &mut self,
        slot: NodeId,
        window: WindowId,
        view: &MenuBarView,
    ) -> Result<(), HostError> {
        if self.is_detached(slot) || !self.nodes.contains_key(&slot) {
            return Err(HostError::Detached(slot));
        }
        self.menus.insert(window, view.clone());
        Ok(())
    }

    fn set_dropdown_open(&mut self, window: WindowId, item: &str, open: bool, z: u32) {
        let dropdown = self
            .dropdowns
            .entry((window, item.to_string()))
            .or_default();
        dropdown.open = open;
        if open {
            dropdown.z_index = z;
        }
    }

    fn mount_context_entries(
        &mut self,
        content: NodeId,
        window: WindowId,
        entries: &[ContextEntryView],
    ) -> Result<(), HostError> {
        if !self.nodes.contains_key(&content) {
            return Err(HostError::Detached(content));
        }
        self.context_entries.insert(window, entries.to_vec());
        Ok(())
    }

    fn mount_dialog(
        &mut self,
        parts: &WindowParts,
        window: WindowId,
        view: &DialogView,
    ) -> Result<(), HostError> {
        if !self.nodes.contains_key(&parts.content) {
            return Err(HostError::Detached(parts.content));
        }
        self.dialogs.insert(window, view.clone());
        Ok(())
    }

    fn focus_field(&mut self, window: WindowId, field: usize, selection: Option<(usize, usize)>) {
        self.focused = Some((window, field, selection));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::WINDOW_TEMPLATE;

    #[test]
    fn test_mount_builds_contained_tree() {
        let mut host = MockHost::new();
        let parts = host.mount_window(1, TemplateKind::Window, WINDOW_TEMPLATE).unwrap();

        assert!(host.contains(parts.root, parts.close_button));
        assert!(host.contains(parts.root, parts.root));
        assert!(!host.contains(parts.content, parts.title));
        assert!(parts.menu_slot.is_some());
        assert!(!host.is_displayed(parts.panel));

        let outside = host.outside_node();
        assert!(!host.contains(parts.root, outside));
    }

    #[test]
    fn test_fail_mount_is_one_shot() {
        let mut host = MockHost::new();
        host.fail_mount(HostError::Markup("broken".to_string()));

        assert!(host.mount_window(1, TemplateKind::Window, WINDOW_TEMPLATE).is_err());
        assert!(host.mount_window(1, TemplateKind::Window, WINDOW_TEMPLATE).is_ok());
    }

    #[test]
    fn test_listener_install_counts() {
        let mut host = MockHost::new();
        host.install_listener(PageListener::PointerMove);
        host.remove_listener(PageListener::PointerMove);
        host.install_listener(PageListener::PointerMove);

        assert_eq!(host.listener_installs(PageListener::PointerMove), 2);
        assert!(host.is_listening(PageListener::PointerMove));
        assert!(!host.is_listening(PageListener::WindowClick));
    }
}

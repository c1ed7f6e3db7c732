//! Menu bar mounting and the page-wide dropdown

use crate::error::{MenuError, WindowError};
use crate::host::{Host, NodeId, PageListener};
use crate::input::{ClickTarget, InputResult, UiAction};
use crate::menu::{DropdownKey, DropdownTransition, MenuActivation, MenuBar, MenuBarView};
use crate::window::{StackOrder, Window, WindowId};
use super::WindowEngine;

impl<H: Host> WindowEngine<H> {
    /// Render `bar` (awaiting its widgets) and mount it in the window's menu slot
    pub async fn set_menu_bar(&mut self, id: WindowId, bar: MenuBar) -> Result<(), WindowError> {
        self.menu_slot(id)?;
        let view = bar.menu_bar_view().await.map_err(|err| {
            log::warn!("[casement] menu bar for window {} not built: {}", id, err);
            err
        })?;
        self.attach_menu_bar(id, bar, view)
    }

    /// Mount an already-rendered menu bar.
    ///
    /// Installs the dropdown listener on first use, then notifies widgets
    /// that they are on the page.
    pub fn attach_menu_bar(
        &mut self,
        id: WindowId,
        bar: MenuBar,
        view: MenuBarView,
    ) -> Result<(), WindowError> {
        self.ensure_initialized()?;
        let slot = self.menu_slot(id)?;

        if let Some(key) = self.dropdowns.close_for_window(id) {
            self.host.set_dropdown_open(id, &key.item, false, 0);
        }
        self.ensure_listener(PageListener::DropdownClick);
        self.host.mount_menu_bar(slot, id, &view)?;

        let attached: Vec<_> = bar
            .widgets()
            .filter_map(|w| w.on_attached().map(|cb| (cb, w.name().to_string())))
            .collect();
        if let Some(window) = self.windows.get_mut(&id) {
            window.menu = Some(bar);
        }
        log::debug!(
            "[casement] menu bar with {} entries attached to window {}",
            view.entries.len(),
            id
        );

        for (callback, name) in attached {
            callback(id, &name);
        }
        Ok(())
    }

    fn menu_slot(&self, id: WindowId) -> Result<NodeId, WindowError> {
        let window = self
            .windows
            .get(&id)
            .ok_or(WindowError::UnknownWindow(id))?;
        window.parts.menu_slot.ok_or(WindowError::NoMenuSlot(id))
    }

    /// Toggle an item's dropdown, closing any other open dropdown on the page first
    pub fn on_menu_clicked(&mut self, id: WindowId, item: &str) -> Result<DropdownTransition, WindowError> {
        let window = self
            .windows
            .get(&id)
            .ok_or(WindowError::UnknownWindow(id))?;
        if window.menu.as_ref().and_then(|bar| bar.item(item)).is_none() {
            return Err(MenuError::UnknownItem(item.to_string()).into());
        }
        let z = StackOrder::overlay_above(window.z_order.unwrap_or(0));

        let transition = self.dropdowns.toggle(DropdownKey::new(id, item));
        match &transition {
            DropdownTransition::Opened(key) => {
                self.host.set_dropdown_open(key.window, &key.item, true, z);
            }
            DropdownTransition::Closed(key) => {
                self.host.set_dropdown_open(key.window, &key.item, false, 0);
            }
            DropdownTransition::Switched { closed, opened } => {
                self.host.set_dropdown_open(closed.window, &closed.item, false, 0);
                self.host.set_dropdown_open(opened.window, &opened.item, true, z);
            }
        }
        log::debug!("[casement] dropdown {:?}", transition);
        Ok(transition)
    }

    /// Close the open dropdown; returns false if none was open
    pub fn close_dropdowns(&mut self) -> bool {
        match self.dropdowns.close_all() {
            Some(key) => {
                self.host.set_dropdown_open(key.window, &key.item, false, 0);
                true
            }
            None => false,
        }
    }

    pub fn open_dropdown(&self) -> Option<&DropdownKey> {
        self.dropdowns.open()
    }

    /// Close the dropdown and run the sub-item's action
    pub fn activate_sub_item(&mut self, id: WindowId, item: &str, sub: &str) -> Result<(), WindowError> {
        let action = self
            .windows
            .get(&id)
            .ok_or(WindowError::UnknownWindow(id))?
            .menu
            .as_ref()
            .ok_or_else(|| MenuError::UnknownItem(item.to_string()))?
            .sub_item(item, sub)?
            .action();

        self.close_dropdowns();
        log::debug!("[casement] menu {}/{} activated on window {}", item, sub, id);
        action(&MenuActivation {
            window: id,
            item: item.to_string(),
            sub: sub.to_string(),
        });
        Ok(())
    }

    /// Dropdown click listener.
    ///
    /// A trigger click toggles its dropdown; any other click closes the open
    /// dropdown. Inactive until a menu bar has been attached.
    pub fn route_dropdown_click(&mut self, target: &ClickTarget) -> InputResult {
        if !self.is_listening(PageListener::DropdownClick) {
            return InputResult::Unhandled;
        }
        let interactive = |engine: &Self, window: WindowId| {
            engine.windows.get(&window).is_some_and(Window::is_interactive)
        };

        match &target.action {
            Some(UiAction::MenuTrigger { window, item }) if interactive(self, *window) => {
                match self.on_menu_clicked(*window, item) {
                    Ok(_) => InputResult::Handled,
                    Err(err) => {
                        log::warn!("[casement] menu trigger ignored: {}", err);
                        InputResult::Unhandled
                    }
                }
            }
            Some(UiAction::SubItem { window, item, sub }) if interactive(self, *window) => {
                match self.activate_sub_item(*window, item, sub) {
                    Ok(()) => InputResult::Handled,
                    Err(err) => {
                        log::warn!("[casement] menu entry ignored: {}", err);
                        self.close_dropdowns();
                        InputResult::Unhandled
                    }
                }
            }
            _ => {
                if self.close_dropdowns() {
                    InputResult::Handled
                } else {
                    InputResult::Unhandled
                }
            }
        }
    }
}

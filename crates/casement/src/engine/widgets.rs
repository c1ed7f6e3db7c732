//! Dialogs and context menus

use crate::content::{load_window, ContentLoader, ContentSource, LoadedWindow, TemplateKind};
use crate::error::WindowError;
use crate::host::Host;
use crate::input::DialogForm;
use crate::widgets::{
    ButtonSlot, ContextMenu, ContextMenuSpec, Decoration, Dialog, DialogResponse, DialogSpec,
};
use crate::window::{Window, WindowId};
use super::WindowEngine;

impl<H: Host> WindowEngine<H> {
    /// Load the dialog template, build the dialog and show it
    pub async fn open_dialog<L: ContentLoader + ?Sized>(
        &mut self,
        loader: &L,
        spec: DialogSpec,
    ) -> Result<WindowId, WindowError> {
        self.ensure_initialized()?;
        let loaded = load_window(
            loader,
            &self.config,
            &spec.title,
            ContentSource::Empty,
            TemplateKind::Dialog,
            true,
        )
        .await
        .map_err(|err| {
            log::warn!("[casement] dialog '{}' not created: {}", spec.title, err);
            err
        })?;
        self.build_dialog(loaded, spec)
    }

    /// Build and show a modal, fixed-size dialog from a loaded template
    pub fn build_dialog(&mut self, mut loaded: LoadedWindow, spec: DialogSpec) -> Result<WindowId, WindowError> {
        loaded.modal = true;
        let id = self.build_window(loaded)?;
        let (dialog, view) = Dialog::from_spec(spec);
        let parts = self.windows.get(&id).map(|w| w.parts).ok_or(WindowError::UnknownWindow(id))?;

        if let Err(err) = self.host.mount_dialog(&parts, id, &view) {
            self.discard(id);
            return Err(err.into());
        }
        self.set_resizable(id, false)?;
        self.decorations.insert(id, Decoration::Dialog(dialog));
        self.show(id)?;
        Ok(id)
    }

    /// Run a dialog button's action with the form contents, then hide the dialog
    pub fn press_dialog_button(&mut self, id: WindowId, slot: ButtonSlot, form: &DialogForm) -> bool {
        if !self.windows.get(&id).is_some_and(Window::is_interactive) {
            return false;
        }
        let Some(button) = self
            .decorations
            .get(&id)
            .and_then(Decoration::as_dialog)
            .and_then(|dialog| dialog.button(slot))
        else {
            return false;
        };
        let action = button.action();

        if let Some(action) = action {
            action(&DialogResponse {
                window: id,
                values: form.values.clone(),
                option_checked: form.option_checked,
                selected_index: form.selected_index,
            });
        }
        self.hide(id);
        true
    }

    /// Load the context-menu template, build the menu and show it at its position
    pub async fn open_context_menu<L: ContentLoader + ?Sized>(
        &mut self,
        loader: &L,
        spec: ContextMenuSpec,
    ) -> Result<WindowId, WindowError> {
        self.ensure_initialized()?;
        let loaded = load_window(
            loader,
            &self.config,
            &spec.title,
            ContentSource::Empty,
            TemplateKind::ContextMenu,
            false,
        )
        .await
        .map_err(|err| {
            log::warn!("[casement] context menu '{}' not created: {}", spec.title, err);
            err
        })?;
        self.build_context_menu(loaded, spec)
    }

    /// Build a context menu: not draggable, no close button, dismissed by
    /// any click outside it.
    pub fn build_context_menu(&mut self, loaded: LoadedWindow, spec: ContextMenuSpec) -> Result<WindowId, WindowError> {
        let id = self.build_window(loaded)?;
        let menu = ContextMenu::new(spec.entries);
        let parts = self.windows.get(&id).map(|w| w.parts).ok_or(WindowError::UnknownWindow(id))?;

        if let Err(err) = self.host.mount_context_entries(parts.content, id, &menu.views()) {
            self.discard(id);
            return Err(err.into());
        }
        self.enable_draggable(id, false)?;
        self.enable_dismissable(id, false)?;
        self.enable_dismissable_outside(id, true)?;
        self.set_resizable(id, false)?;
        self.decorations.insert(id, Decoration::ContextMenu(menu));
        self.show(id)?;

        self.host.set_position(parts.panel, spec.position);
        if let Some(window) = self.windows.get_mut(&id) {
            window.position = spec.position;
        }
        Ok(id)
    }

    /// Hide the context menu, then run the entry's action
    pub fn activate_context_entry(&mut self, id: WindowId, index: usize) -> bool {
        let Some(action) = self
            .decorations
            .get(&id)
            .and_then(Decoration::as_context_menu)
            .and_then(|menu| menu.action(index))
        else {
            return false;
        };
        self.hide(id);
        action(id);
        true
    }

    pub fn decoration(&self, id: WindowId) -> Option<&Decoration> {
        self.decorations.get(&id)
    }
}

//! Outside-click routing and drag operations

use crate::host::{Host, PageListener};
use crate::input::{ClickTarget, DragStep, InputResult, UiAction};
use crate::math::Vec2;
use crate::window::{Window, WindowId};
use super::WindowEngine;

impl<H: Host> WindowEngine<H> {
    /// Handle a page click: dropdowns first, then windows.
    pub fn handle_page_click(&mut self, target: &ClickTarget) -> InputResult {
        let dropdowns = self.route_dropdown_click(target);
        let windows = self.route_window_click(target);
        dropdowns.or(windows)
    }

    /// Window-level click listener.
    ///
    /// Runs the clicked control's action, then for every visible window:
    /// hides it if the click missed it and it dismisses on outside clicks,
    /// or raises it if the click hit it, it is not on top, and the top
    /// window is not modal. All hides are applied before any raise.
    pub fn route_window_click(&mut self, target: &ClickTarget) -> InputResult {
        if !self.initialized {
            return InputResult::Unhandled;
        }

        let mut result = match &target.action {
            Some(action) => self.run_window_action(action, target),
            None => InputResult::Unhandled,
        };

        let top = self.top_window();
        let top_is_modal = top
            .and_then(|id| self.windows.get(&id))
            .is_some_and(Window::is_modal);

        let mut to_hide = Vec::new();
        let mut to_raise = Vec::new();
        for id in self.registry.ids() {
            let Some(window) = self.windows.get(&id) else {
                continue;
            };
            let inside = self.host.contains(window.parts.root, target.node);
            if !inside && window.dismissable_outside {
                to_hide.push(id);
            } else if inside && top != Some(id) && !top_is_modal && window.is_interactive() {
                to_raise.push(id);
            }
        }

        for id in to_hide {
            log::debug!("[casement] outside click dismissed window {}", id);
            self.hide(id);
            result = InputResult::Handled;
        }
        for id in to_raise {
            if self.raise_window(id).is_ok() {
                result = InputResult::Handled;
            }
        }
        result
    }

    fn run_window_action(&mut self, action: &UiAction, target: &ClickTarget) -> InputResult {
        let window = action.window();
        if !self.windows.get(&window).is_some_and(Window::is_interactive) {
            return InputResult::Unhandled;
        }
        let handled = match action {
            UiAction::Close { .. } => {
                self.windows.get(&window).is_some_and(Window::is_dismissable) && self.hide(window)
            }
            UiAction::DialogButton { slot, .. } => {
                self.press_dialog_button(window, *slot, &target.form)
            }
            UiAction::ContextEntry { index, .. } => self.activate_context_entry(window, *index),
            UiAction::TitleBar { .. } | UiAction::MenuTrigger { .. } | UiAction::SubItem { .. } => {
                false
            }
        };
        if handled {
            InputResult::Handled
        } else {
            InputResult::Unhandled
        }
    }

    /// Pointer-down listener: starts a drag when the title bar was hit
    pub fn route_pointer_down(&mut self, target: &ClickTarget, pointer: Vec2) -> InputResult {
        match &target.action {
            Some(UiAction::TitleBar { window }) => self.pointer_down(*window, pointer),
            _ => InputResult::Unhandled,
        }
    }

    /// Begin dragging `id` from `pointer`.
    ///
    /// The move/up listeners are installed only while the drag lasts.
    pub fn pointer_down(&mut self, id: WindowId, pointer: Vec2) -> InputResult {
        let (panel, draggable) = match self.windows.get(&id) {
            Some(w) if w.is_visible() && w.is_interactive() => (w.parts.panel, w.draggable),
            _ => return InputResult::Unhandled,
        };
        if !draggable {
            return InputResult::Unhandled;
        }
        if self.active_drag.is_some_and(|active| active != id) {
            self.end_drag();
        }

        let origin = self.host.position(panel);
        let Some(window) = self.windows.get_mut(&id) else {
            return InputResult::Unhandled;
        };
        if !window.drag.begin(draggable, pointer, origin) {
            return InputResult::Unhandled;
        }
        window.position = origin;

        self.active_drag = Some(id);
        self.ensure_listener(PageListener::PointerMove);
        self.ensure_listener(PageListener::PointerUp);
        log::debug!("[casement] drag started on window {}", id);
        InputResult::DragStarted { window_id: id }
    }

    /// Pointer-move listener
    pub fn pointer_move(&mut self, pointer: Vec2) -> InputResult {
        let Some(id) = self.active_drag else {
            return InputResult::Unhandled;
        };
        let Some(window) = self.windows.get_mut(&id) else {
            self.end_drag();
            return InputResult::Unhandled;
        };

        match window.drag.update(window.draggable, pointer) {
            DragStep::Ignored => InputResult::Unhandled,
            DragStep::MoveTo(position) => {
                window.position = position;
                self.host.set_position(window.parts.panel, position);
                InputResult::Handled
            }
            DragStep::Halted => {
                log::debug!("[casement] drag on window {} halted", id);
                self.end_drag();
                InputResult::DragEnded { window_id: id }
            }
        }
    }

    /// Pointer-up listener
    pub fn pointer_up(&mut self) -> InputResult {
        match self.end_drag() {
            Some(id) => InputResult::DragEnded { window_id: id },
            None => InputResult::Unhandled,
        }
    }

    /// Finish the active drag and release the move/up listeners
    pub(crate) fn end_drag(&mut self) -> Option<WindowId> {
        let id = self.active_drag.take()?;
        if let Some(window) = self.windows.get_mut(&id) {
            window.drag.finish();
        }
        self.release_listener(PageListener::PointerMove);
        self.release_listener(PageListener::PointerUp);
        log::debug!("[casement] drag ended on window {}", id);
        Some(id)
    }

    pub fn active_drag(&self) -> Option<WindowId> {
        self.active_drag
    }
}

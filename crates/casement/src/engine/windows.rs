//! Window lifecycle, stacking and modality

use crate::content::{load_window, ContentLoader, ContentSource, LoadedWindow, TemplateKind};
use crate::error::WindowError;
use crate::host::{Cursor, Host};
use crate::widgets::{Decoration, Dialog};
use crate::window::{StackOrder, Window, WindowId, WindowPhase};
use super::WindowEngine;

impl<H: Host> WindowEngine<H> {
    /// Load and build a window. Nothing is mounted if a fetch fails.
    pub async fn create_window<L: ContentLoader + ?Sized>(
        &mut self,
        loader: &L,
        title: &str,
        content: ContentSource,
        modal: bool,
    ) -> Result<WindowId, WindowError> {
        self.ensure_initialized()?;
        let loaded = load_window(loader, &self.config, title, content, TemplateKind::Window, modal)
            .await
            .map_err(|err| {
                log::warn!("[casement] window '{}' not created: {}", title, err);
                err
            })?;
        self.build_window(loaded)
    }

    /// Non-modal window whose content is fetched from `locator`
    pub async fn create_window_from_source<L: ContentLoader + ?Sized>(
        &mut self,
        loader: &L,
        title: &str,
        locator: &str,
    ) -> Result<WindowId, WindowError> {
        self.create_window(loader, title, ContentSource::locator(locator), false)
            .await
    }

    pub async fn create_modal<L: ContentLoader + ?Sized>(
        &mut self,
        loader: &L,
        title: &str,
        content: ContentSource,
    ) -> Result<WindowId, WindowError> {
        self.create_window(loader, title, content, true).await
    }

    pub async fn create_modal_from_source<L: ContentLoader + ?Sized>(
        &mut self,
        loader: &L,
        title: &str,
        locator: &str,
    ) -> Result<WindowId, WindowError> {
        self.create_window(loader, title, ContentSource::locator(locator), true)
            .await
    }

    /// Mount a window from already-loaded resources.
    ///
    /// The window starts draggable and dismissable, with the default icon.
    /// It is not registered until [`show`](Self::show).
    pub fn build_window(&mut self, loaded: LoadedWindow) -> Result<WindowId, WindowError> {
        self.ensure_initialized()?;
        let id = self.allocate_id();
        let parts = self.host.mount_window(id, loaded.kind, &loaded.template)?;

        if let Some(content) = loaded.content.as_deref() {
            if let Err(err) = self.host.append_markup(parts.content, content) {
                self.host.detach(parts.root);
                return Err(err.into());
            }
        }

        let mut window = Window::new(id, loaded.kind, parts, loaded.modal);
        self.host.set_text(parts.title, &loaded.title);
        window.title = loaded.title;

        window.icon = self.config.default_icon.clone();
        if let Some(icon) = window.icon.as_deref() {
            self.host.set_image(parts.icon, icon);
        }

        window.draggable = true;
        self.host.set_cursor(parts.title_bar, Cursor::Move);
        window.dismissable = true;
        self.host.set_displayed(parts.close_button, true);
        window.dismissable_outside = false;

        log::debug!(
            "[casement] created {:?} window {} '{}'{}",
            loaded.kind,
            id,
            window.title,
            if window.modal { " (modal)" } else { "" }
        );
        self.windows.insert(id, window);
        Ok(id)
    }

    /// Remove a window that was built but never shown, without callbacks
    pub(crate) fn discard(&mut self, id: WindowId) {
        if let Some(window) = self.windows.remove(&id) {
            self.host.detach(window.parts.root);
            self.decorations.remove(&id);
            log::debug!("[casement] discarded window {}", id);
        }
    }

    /// Register, stack and display a created window.
    ///
    /// A modal window disables every window registered before it until it is
    /// hidden.
    pub fn show(&mut self, id: WindowId) -> Result<(), WindowError> {
        self.ensure_initialized()?;
        let (parts, modal) = match self.windows.get(&id) {
            Some(window) if window.phase == WindowPhase::Created => (window.parts, window.modal),
            Some(_) => return Err(WindowError::AlreadyShown(id)),
            None => return Err(WindowError::UnknownWindow(id)),
        };

        let z = self.stack.advance();
        self.host.set_z_index(parts.panel, z);
        self.host.set_displayed(parts.panel, true);

        if modal {
            for sibling in self.registry.ids() {
                self.block(sibling, id);
            }
        }
        self.registry.insert(id);

        let on_show = match self.windows.get_mut(&id) {
            Some(window) => {
                window.phase = WindowPhase::Visible;
                window.z_order = Some(z);
                window.on_show.take()
            }
            None => None,
        };
        log::info!("[casement] window {} shown at z={}", id, z);

        let focus = self
            .decorations
            .get(&id)
            .and_then(Decoration::as_dialog)
            .and_then(Dialog::focus);
        if let Some((field, selection)) = focus {
            self.host.focus_field(id, field, selection);
        }
        if let Some(callback) = on_show {
            callback(id);
        }
        Ok(())
    }

    /// Unregister and detach a window, firing its close handler once.
    ///
    /// Returns false if the window no longer exists; hiding twice is a no-op.
    /// The stacking counter is not rewound.
    pub fn hide(&mut self, id: WindowId) -> bool {
        let Some(mut window) = self.windows.remove(&id) else {
            log::debug!("[casement] hide of unknown window {} ignored", id);
            return false;
        };

        if window.modal {
            self.unblock(id);
        }
        if self.active_drag == Some(id) {
            window.drag.finish();
            self.end_drag();
        }
        if let Some(key) = self.dropdowns.close_for_window(id) {
            self.host.set_dropdown_open(id, &key.item, false, 0);
        }

        self.host.set_displayed(window.parts.panel, false);
        self.host.detach(window.parts.root);
        let was_visible = self.registry.remove(id);
        self.decorations.remove(&id);
        log::info!(
            "[casement] window {} hidden{}",
            id,
            if was_visible { "" } else { " before show" }
        );

        if let Some(callback) = window.on_close.take() {
            callback(id);
        }
        true
    }

    /// Give a visible window the next stacking value
    pub fn raise_window(&mut self, id: WindowId) -> Result<u32, WindowError> {
        let panel = match self.windows.get(&id) {
            Some(window) if window.is_visible() => window.parts.panel,
            Some(_) => return Err(WindowError::NotVisible(id)),
            None => return Err(WindowError::UnknownWindow(id)),
        };

        let z = self.stack.advance();
        self.host.set_z_index(panel, z);
        if let Some(window) = self.windows.get_mut(&id) {
            window.z_order = Some(z);
        }
        if let Some(key) = self.dropdowns.open().filter(|k| k.window == id) {
            self.host
                .set_dropdown_open(id, &key.item, true, StackOrder::overlay_above(z));
        }
        log::debug!("[casement] window {} raised to z={}", id, z);
        Ok(z)
    }

    /// Visible window with the highest stacking value
    pub fn top_window(&self) -> Option<WindowId> {
        self.registry.topmost(|id| {
            self.windows
                .get(&id)
                .and_then(Window::z_order)
                .unwrap_or(0)
        })
    }

    pub(crate) fn block(&mut self, target: WindowId, blocker: WindowId) {
        let Some(window) = self.windows.get_mut(&target) else {
            return;
        };
        let was_interactive = window.is_interactive();
        window.blocked_by.insert(blocker);
        if was_interactive {
            self.host.set_interactive(window.parts.panel, false);
            log::debug!("[casement] window {} blocked by modal {}", target, blocker);
            if self.active_drag == Some(target) {
                self.end_drag();
            }
        }
    }

    pub(crate) fn unblock(&mut self, blocker: WindowId) {
        for (id, window) in self.windows.iter_mut() {
            if window.blocked_by.remove(&blocker) && window.blocked_by.is_empty() {
                self.host.set_interactive(window.parts.panel, true);
                log::debug!("[casement] window {} restored after modal {}", id, blocker);
            }
        }
    }

    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.windows.get(&id)
    }

    /// Visible windows in registration order
    pub fn visible_windows(&self) -> Vec<WindowId> {
        self.registry.ids()
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    fn window_mut(&mut self, id: WindowId) -> Result<&mut Window, WindowError> {
        self.windows
            .get_mut(&id)
            .ok_or(WindowError::UnknownWindow(id))
    }

    pub fn set_title(&mut self, id: WindowId, title: &str) -> Result<(), WindowError> {
        let window = self.window_mut(id)?;
        window.title = title.to_string();
        let node = window.parts.title;
        self.host.set_text(node, title);
        Ok(())
    }

    /// Append a content block
    pub fn set_content(&mut self, id: WindowId, markup: &str) -> Result<(), WindowError> {
        let node = self.window_mut(id)?.parts.content;
        self.host.append_markup(node, markup)?;
        Ok(())
    }

    pub fn set_icon_path(&mut self, id: WindowId, path: &str) -> Result<(), WindowError> {
        let window = self.window_mut(id)?;
        window.icon = Some(path.to_string());
        let node = window.parts.icon;
        self.host.set_image(node, path);
        Ok(())
    }

    pub fn icon_path(&self, id: WindowId) -> Option<&str> {
        self.windows.get(&id).and_then(Window::icon)
    }

    /// Icon applied to windows built from now on
    pub fn set_default_icon_path(&mut self, path: Option<&str>) {
        self.config.default_icon = path.map(str::to_string);
    }

    pub fn default_icon(&self) -> Option<&str> {
        self.config.default_icon.as_deref()
    }

    /// Toggle dragging; an active drag halts on its next pointer tick
    pub fn enable_draggable(&mut self, id: WindowId, draggable: bool) -> Result<(), WindowError> {
        let window = self.window_mut(id)?;
        window.draggable = draggable;
        let node = window.parts.title_bar;
        self.host
            .set_cursor(node, if draggable { Cursor::Move } else { Cursor::Auto });
        Ok(())
    }

    /// Show or hide the close affordance
    pub fn enable_dismissable(&mut self, id: WindowId, dismissable: bool) -> Result<(), WindowError> {
        let window = self.window_mut(id)?;
        window.dismissable = dismissable;
        let node = window.parts.close_button;
        self.host.set_displayed(node, dismissable);
        Ok(())
    }

    pub fn enable_dismissable_outside(&mut self, id: WindowId, enabled: bool) -> Result<(), WindowError> {
        self.window_mut(id)?.dismissable_outside = enabled;
        Ok(())
    }

    pub fn set_resizable(&mut self, id: WindowId, resizable: bool) -> Result<(), WindowError> {
        let window = self.window_mut(id)?;
        window.resizable = resizable;
        let node = window.parts.panel;
        self.host.set_resizable(node, resizable);
        Ok(())
    }

    /// Handler run after the window is displayed
    pub fn set_on_show<F>(&mut self, id: WindowId, callback: F) -> Result<(), WindowError>
    where
        F: FnOnce(WindowId) + 'static,
    {
        self.window_mut(id)?.on_show = Some(Box::new(callback));
        Ok(())
    }

    /// Handler run after the window is detached
    pub fn set_on_close<F>(&mut self, id: WindowId, callback: F) -> Result<(), WindowError>
    where
        F: FnOnce(WindowId) + 'static,
    {
        self.window_mut(id)?.on_close = Some(Box::new(callback));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use futures::executor::block_on;

    use super::*;
    use crate::error::{HostError, LoadError};
    use crate::testing::{MockHost, MockLoader};

    fn engine() -> WindowEngine<MockHost> {
        let mut engine = WindowEngine::new(MockHost::new());
        engine.initialize();
        engine
    }

    fn open(engine: &mut WindowEngine<MockHost>, title: &str, modal: bool) -> WindowId {
        let loader = MockLoader::with_templates();
        let id = block_on(engine.create_window(&loader, title, ContentSource::Empty, modal)).unwrap();
        engine.show(id).unwrap();
        id
    }

    #[test]
    fn test_create_applies_defaults() {
        let mut engine = engine();
        engine.set_default_icon_path(Some("app.png"));
        let loader = MockLoader::with_templates();

        let id = block_on(engine.create_window(
            &loader,
            "Notes",
            ContentSource::inline("<p>body</p>"),
            false,
        ))
        .unwrap();

        let window = engine.window(id).unwrap();
        let parts = *window.parts();
        assert!(window.is_draggable());
        assert!(window.is_dismissable());
        assert!(!window.is_dismissable_outside());
        assert_eq!(window.phase(), WindowPhase::Created);
        assert!(engine.visible_windows().is_empty());

        let host = engine.host();
        assert_eq!(host.text(parts.title), Some("Notes"));
        assert_eq!(host.image(parts.icon), Some("app.png"));
        assert_eq!(host.cursor(parts.title_bar), Some(Cursor::Move));
        assert_eq!(host.markup(parts.content), ["<p>body</p>".to_string()]);
        assert!(!host.is_displayed(parts.panel));
    }

    #[test]
    fn test_missing_default_icon_leaves_icon_unset() {
        let mut engine = engine();
        let id = open(&mut engine, "Plain", false);
        let parts = *engine.window(id).unwrap().parts();

        assert!(engine.default_icon().is_none());
        assert!(engine.icon_path(id).is_none());
        assert_eq!(engine.host().image(parts.icon), None);
    }

    #[test]
    fn test_not_initialized() {
        let mut engine = WindowEngine::new(MockHost::new());
        let loader = MockLoader::with_templates();
        let result = block_on(engine.create_window(&loader, "x", ContentSource::Empty, false));
        assert_eq!(result, Err(WindowError::NotInitialized));
        assert!(loader.requests().is_empty());
    }

    #[test]
    fn test_show_assigns_increasing_z() {
        let mut engine = engine();
        let a = open(&mut engine, "A", false);
        let b = open(&mut engine, "B", false);

        assert_eq!(engine.window(a).unwrap().z_order(), Some(2));
        assert_eq!(engine.window(b).unwrap().z_order(), Some(4));
        assert_eq!(engine.top_window(), Some(b));

        let panel = engine.window(b).unwrap().parts().panel;
        assert_eq!(engine.host().z_index(panel), Some(4));
        assert!(engine.host().is_displayed(panel));
    }

    #[test]
    fn test_show_twice_fails() {
        let mut engine = engine();
        let id = open(&mut engine, "A", false);
        assert_eq!(engine.show(id), Err(WindowError::AlreadyShown(id)));
        assert_eq!(engine.show(99), Err(WindowError::UnknownWindow(99)));
    }

    #[test]
    fn test_hide_is_idempotent_and_fires_once() {
        let mut engine = engine();
        let id = open(&mut engine, "A", false);
        let closed = Rc::new(RefCell::new(Vec::new()));
        let log = closed.clone();
        engine.set_on_close(id, move |w| log.borrow_mut().push(w)).unwrap();
        let root = engine.window(id).unwrap().parts().root;

        assert!(engine.hide(id));
        assert!(!engine.hide(id));

        assert_eq!(*closed.borrow(), vec![id]);
        assert!(engine.host().is_detached(root));
        assert!(engine.visible_windows().is_empty());
        assert!(engine.top_window().is_none());
    }

    #[test]
    fn test_hide_before_show_detaches_and_fires() {
        let mut engine = engine();
        let loader = MockLoader::with_templates();
        let id = block_on(engine.create_window(&loader, "A", ContentSource::Empty, false)).unwrap();
        let fired = Rc::new(RefCell::new(0));
        let count = fired.clone();
        engine.set_on_close(id, move |_| *count.borrow_mut() += 1).unwrap();
        let root = engine.window(id).unwrap().parts().root;

        assert!(engine.hide(id));
        assert_eq!(*fired.borrow(), 1);
        assert!(engine.host().is_detached(root));
    }

    #[test]
    fn test_counter_is_not_rewound_on_hide() {
        let mut engine = engine();
        let a = open(&mut engine, "A", false);
        engine.hide(a);
        let b = open(&mut engine, "B", false);
        assert_eq!(engine.window(b).unwrap().z_order(), Some(4));
    }

    #[test]
    fn test_on_show_runs_after_display() {
        let mut engine = engine();
        let loader = MockLoader::with_templates();
        let id = block_on(engine.create_window(&loader, "A", ContentSource::Empty, false)).unwrap();
        let shown = Rc::new(RefCell::new(None));
        let out = shown.clone();
        engine.set_on_show(id, move |w| *out.borrow_mut() = Some(w)).unwrap();

        engine.show(id).unwrap();
        assert_eq!(*shown.borrow(), Some(id));
    }

    #[test]
    fn test_modal_blocks_registered_siblings() {
        let mut engine = engine();
        let a = open(&mut engine, "A", false);
        let b = open(&mut engine, "B", false);
        let m = open(&mut engine, "M", true);
        let late = open(&mut engine, "Late", false);

        assert!(!engine.window(a).unwrap().is_interactive());
        assert!(!engine.window(b).unwrap().is_interactive());
        assert!(engine.window(m).unwrap().is_interactive());
        assert!(engine.window(late).unwrap().is_interactive());
        let panel_a = engine.window(a).unwrap().parts().panel;
        assert!(!engine.host().is_interactive(panel_a));

        engine.hide(m);
        assert!(engine.window(a).unwrap().is_interactive());
        assert!(engine.host().is_interactive(panel_a));
    }

    #[test]
    fn test_nested_modals_restore_in_order() {
        let mut engine = engine();
        let a = open(&mut engine, "A", false);
        let m1 = open(&mut engine, "M1", true);
        let m2 = open(&mut engine, "M2", true);

        assert!(!engine.window(m1).unwrap().is_interactive());
        engine.hide(m1);
        assert!(!engine.window(a).unwrap().is_interactive());
        engine.hide(m2);
        assert!(engine.window(a).unwrap().is_interactive());
    }

    #[test]
    fn test_raise_window() {
        let mut engine = engine();
        let a = open(&mut engine, "A", false);
        let _b = open(&mut engine, "B", false);

        assert_eq!(engine.raise_window(a), Ok(6));
        assert_eq!(engine.top_window(), Some(a));
        assert_eq!(engine.raise_window(42), Err(WindowError::UnknownWindow(42)));
    }

    #[test]
    fn test_raise_hidden_window_fails() {
        let mut engine = engine();
        let loader = MockLoader::with_templates();
        let id = block_on(engine.create_window(&loader, "A", ContentSource::Empty, false)).unwrap();
        assert_eq!(engine.raise_window(id), Err(WindowError::NotVisible(id)));
    }

    #[test]
    fn test_mutators_update_host() {
        let mut engine = engine();
        let id = open(&mut engine, "A", false);
        let parts = *engine.window(id).unwrap().parts();

        engine.set_title(id, "Renamed").unwrap();
        engine.set_icon_path(id, "doc.png").unwrap();
        engine.enable_draggable(id, false).unwrap();
        engine.enable_dismissable(id, false).unwrap();
        engine.set_content(id, "<i>more</i>").unwrap();

        let host = engine.host();
        assert_eq!(host.text(parts.title), Some("Renamed"));
        assert_eq!(engine.icon_path(id), Some("doc.png"));
        assert_eq!(host.cursor(parts.title_bar), Some(Cursor::Auto));
        assert!(!host.is_displayed(parts.close_button));
        assert_eq!(host.markup(parts.content).len(), 1);
        assert_eq!(engine.set_title(77, "x"), Err(WindowError::UnknownWindow(77)));
    }

    #[test]
    fn test_load_failure_creates_nothing() {
        let mut engine = engine();
        let loader = MockLoader::with_templates();
        loader.fail(
            "./window.html",
            LoadError::Request {
                url: "./window.html".to_string(),
                reason: "offline".to_string(),
            },
        );

        let result = block_on(engine.create_window(&loader, "A", ContentSource::Empty, false));
        assert!(matches!(result, Err(WindowError::Load(LoadError::Request { .. }))));
        assert_eq!(engine.window_count(), 0);
        assert_eq!(engine.host().attached_roots(), 0);
    }

    #[test]
    fn test_template_without_regions_is_rejected() {
        let mut engine = engine();
        let loader = MockLoader::new();
        loader.insert("./window.html", "<div class=\"window-panel\"></div>");

        let result = block_on(engine.create_window(&loader, "A", ContentSource::Empty, false));
        assert_eq!(
            result,
            Err(WindowError::Host(HostError::MissingRegion("window-icon")))
        );
        assert_eq!(engine.window_count(), 0);
    }

    #[test]
    fn test_shutdown_hides_everything() {
        let mut engine = engine();
        let a = open(&mut engine, "A", false);
        let closed = Rc::new(RefCell::new(0));
        let count = closed.clone();
        engine.set_on_close(a, move |_| *count.borrow_mut() += 1).unwrap();
        let _m = open(&mut engine, "M", true);

        engine.shutdown();
        assert_eq!(*closed.borrow(), 1);
        assert_eq!(engine.window_count(), 0);
        assert_eq!(engine.host().attached_roots(), 0);

        engine.initialize();
        let b = open(&mut engine, "B", false);
        assert_eq!(engine.window(b).unwrap().z_order(), Some(2));
    }
}

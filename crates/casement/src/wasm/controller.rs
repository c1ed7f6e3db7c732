//! JS-facing controller
//!
//! Wraps a [`WindowEngine`] over the [`DomHost`] and binds the page
//! listeners the engine asks for. Fetches run without holding the engine,
//! and JS callbacks are deferred to a microtask so they may call back into
//! the controller.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use js_sys::{Array, Function, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, spawn_local, JsFuture};
use web_sys::MouseEvent;

use crate::config::EngineConfig;
use crate::content::{load_window, ContentSource, LoadedWindow, TemplateKind};
use crate::engine::WindowEngine;
use crate::error::{LoadError, WindowError};
use crate::host::PageListener;
use crate::input::InputResult;
use crate::math::Vec2;
use crate::menu::{MenuBar, MenuEntry, MenuItem, MenuSubItem, MenuWidget};
use crate::widgets::{ContextMenuSpec, DialogButton, DialogSpec, FieldKind};
use crate::window::WindowId;
use super::dom::DomHost;
use super::fetch::FetchLoader;
use super::logger;

type Listener = Closure<dyn FnMut(MouseEvent)>;

struct Shared {
    engine: RefCell<WindowEngine<DomHost>>,
    listeners: RefCell<HashMap<PageListener, Listener>>,
    /// Closures unbound during their own dispatch; dropped on the next event
    retired: RefCell<Vec<Listener>>,
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

fn busy() -> JsValue {
    to_js("window engine is busy")
}

/// Invoke a JS callback on the microtask queue
fn defer(callback: &Function, args: Array) {
    let callback = callback.clone();
    spawn_local(async move {
        if let Err(err) = callback.apply(&JsValue::NULL, &args) {
            log::error!("[casement] callback failed: {:?}", err);
        }
    });
}

fn sync_listeners(shared: &Rc<Shared>) {
    let changes = match shared.engine.try_borrow_mut() {
        Ok(mut engine) => engine.host_mut().take_listener_changes(),
        Err(_) => return,
    };
    if changes.is_empty() {
        return;
    }
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };

    let mut listeners = shared.listeners.borrow_mut();
    for (listener, install) in changes {
        if listener.bound_with().is_some() {
            continue;
        }
        if install {
            if listeners.contains_key(&listener) {
                continue;
            }
            let weak = Rc::downgrade(shared);
            let closure = Listener::new(move |event: MouseEvent| dispatch(&weak, listener, event));
            match document
                .add_event_listener_with_callback(listener.event_name(), closure.as_ref().unchecked_ref())
            {
                Ok(()) => {
                    listeners.insert(listener, closure);
                }
                Err(err) => log::error!("[casement] failed to bind {:?}: {:?}", listener, err),
            }
        } else if let Some(closure) = listeners.remove(&listener) {
            let _ = document.remove_event_listener_with_callback(
                listener.event_name(),
                closure.as_ref().unchecked_ref(),
            );
            shared.retired.borrow_mut().push(closure);
        }
    }
}

fn dispatch(weak: &Weak<Shared>, listener: PageListener, event: MouseEvent) {
    let Some(shared) = weak.upgrade() else {
        return;
    };
    if let Ok(mut retired) = shared.retired.try_borrow_mut() {
        retired.clear();
    }

    let result = {
        let Ok(mut engine) = shared.engine.try_borrow_mut() else {
            log::warn!("[casement] {:?} event dropped, engine busy", listener);
            return;
        };
        let pointer = Vec2::new(event.client_x() as f32, event.client_y() as f32);
        match listener {
            PageListener::PointerMove => engine.pointer_move(pointer),
            PageListener::PointerUp => engine.pointer_up(),
            PageListener::WindowClick | PageListener::DropdownClick | PageListener::PointerDown => {
                let Some(target) = engine.host_mut().resolve_event(&event) else {
                    return;
                };
                let result = match listener {
                    PageListener::PointerDown => engine.route_pointer_down(&target, pointer),
                    _ => engine.handle_page_click(&target),
                };
                engine.host_mut().release_target(target.node);
                result
            }
        }
    };

    if let InputResult::DragStarted { .. } = result {
        // keep the title text from being selected while dragging
        event.prevent_default();
    }
    sync_listeners(&shared);
}

impl Drop for Shared {
    fn drop(&mut self) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        for (listener, closure) in self.listeners.get_mut().drain() {
            let _ = document.remove_event_listener_with_callback(
                listener.event_name(),
                closure.as_ref().unchecked_ref(),
            );
        }
        log::debug!("[casement] controller dropped, page listeners removed");
    }
}

/// Window manager controller for WASM
#[wasm_bindgen]
pub struct WindowController {
    shared: Rc<Shared>,
}

impl WindowController {
    /// Run `f` against the engine, then bind or unbind listeners it changed
    fn with_engine<R>(
        &self,
        f: impl FnOnce(&mut WindowEngine<DomHost>) -> R,
    ) -> Result<R, JsValue> {
        let result = {
            let mut engine = self.shared.engine.try_borrow_mut().map_err(|_| busy())?;
            f(&mut engine)
        };
        sync_listeners(&self.shared);
        Ok(result)
    }

    fn config(&self) -> Result<EngineConfig, JsValue> {
        let engine = self.shared.engine.try_borrow().map_err(|_| busy())?;
        Ok(engine.config().clone())
    }

    /// Fetch without borrowing the engine, then build with it
    fn spawn_build<F>(
        &self,
        title: String,
        source: ContentSource,
        kind: TemplateKind,
        modal: bool,
        build: F,
    ) -> Promise
    where
        F: FnOnce(&mut WindowEngine<DomHost>, LoadedWindow) -> Result<WindowId, WindowError> + 'static,
    {
        let shared = self.shared.clone();
        let config = self.config();
        future_to_promise(async move {
            let config = config?;
            let loaded = load_window(&FetchLoader, &config, &title, source, kind, modal)
                .await
                .map_err(|err| {
                    log::warn!("[casement] window '{}' not created: {}", title, err);
                    to_js(err)
                })?;
            let id = {
                let mut engine = shared.engine.try_borrow_mut().map_err(|_| busy())?;
                build(&mut engine, loaded).map_err(to_js)?
            };
            sync_listeners(&shared);
            Ok(JsValue::from(id))
        })
    }

    fn spawn_window(&self, title: String, source: ContentSource, modal: bool) -> Promise {
        self.spawn_build(title, source, TemplateKind::Window, modal, |engine, loaded| {
            engine.build_window(loaded)
        })
    }

    fn spawn_dialog(&self, spec: DialogSpec) -> Promise {
        let title = spec.title.clone();
        self.spawn_build(title, ContentSource::Empty, TemplateKind::Dialog, true, move |engine, loaded| {
            engine.build_dialog(loaded, spec)
        })
    }
}

#[wasm_bindgen]
impl WindowController {
    /// Create a controller; `config_json` overrides [`EngineConfig`] defaults
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WindowController, JsValue> {
        console_error_panic_hook::set_once();
        logger::init(log::LevelFilter::Info);

        let config = match config_json {
            Some(json) => EngineConfig::from_json(&json).map_err(to_js)?,
            None => EngineConfig::default(),
        };
        let host = DomHost::new()?;
        Ok(Self {
            shared: Rc::new(Shared {
                engine: RefCell::new(WindowEngine::with_config(host, config)),
                listeners: RefCell::new(HashMap::new()),
                retired: RefCell::new(Vec::new()),
            }),
        })
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Install the page listeners; false if already initialized
    #[wasm_bindgen]
    pub fn initialize(&self) -> Result<bool, JsValue> {
        self.with_engine(|engine| engine.initialize())
    }

    /// Hide every window and release all page listeners
    #[wasm_bindgen]
    pub fn shutdown(&self) -> Result<(), JsValue> {
        self.with_engine(|engine| engine.shutdown())
    }

    // =========================================================================
    // Windows
    // =========================================================================

    /// Create a window with inline content; resolves to the window id
    #[wasm_bindgen]
    pub fn create_window(&self, title: String, content: Option<String>) -> Promise {
        let source = content.map_or(ContentSource::Empty, ContentSource::Inline);
        self.spawn_window(title, source, false)
    }

    /// Create a window whose content is fetched from `url`
    #[wasm_bindgen]
    pub fn create_window_from_source(&self, title: String, url: String) -> Promise {
        self.spawn_window(title, ContentSource::Locator(url), false)
    }

    #[wasm_bindgen]
    pub fn create_modal(&self, title: String, content: Option<String>) -> Promise {
        let source = content.map_or(ContentSource::Empty, ContentSource::Inline);
        self.spawn_window(title, source, true)
    }

    #[wasm_bindgen]
    pub fn create_modal_from_source(&self, title: String, url: String) -> Promise {
        self.spawn_window(title, ContentSource::Locator(url), true)
    }

    #[wasm_bindgen]
    pub fn show(&self, id: u64) -> Result<(), JsValue> {
        self.with_engine(|engine| engine.show(id))?.map_err(to_js)
    }

    /// Hide and destroy a window; false if it was not visible
    #[wasm_bindgen]
    pub fn hide(&self, id: u64) -> Result<bool, JsValue> {
        self.with_engine(|engine| engine.hide(id))
    }

    #[wasm_bindgen]
    pub fn raise_window(&self, id: u64) -> Result<u32, JsValue> {
        self.with_engine(|engine| engine.raise_window(id))?.map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn get_top_window(&self) -> Option<u64> {
        let engine = self.shared.engine.try_borrow().ok()?;
        engine.top_window()
    }

    /// Visible window ids, bottom to top
    #[wasm_bindgen]
    pub fn get_visible_windows(&self) -> Vec<u64> {
        self.shared
            .engine
            .try_borrow()
            .map(|engine| engine.visible_windows())
            .unwrap_or_default()
    }

    /// Window state as JSON
    #[wasm_bindgen]
    pub fn get_window_json(&self, id: u64) -> String {
        let Ok(engine) = self.shared.engine.try_borrow() else {
            return "null".to_string();
        };
        let Some(window) = engine.window(id) else {
            return "null".to_string();
        };
        serde_json::to_string(&serde_json::json!({
            "id": window.id(),
            "title": window.title(),
            "icon": window.icon(),
            "modal": window.is_modal(),
            "visible": window.is_visible(),
            "zOrder": window.z_order(),
            "interactive": window.is_interactive(),
            "position": window.position(),
        }))
        .unwrap_or_else(|_| "null".to_string())
    }

    // =========================================================================
    // Properties
    // =========================================================================

    #[wasm_bindgen]
    pub fn set_title(&self, id: u64, title: &str) -> Result<(), JsValue> {
        self.with_engine(|engine| engine.set_title(id, title))?.map_err(to_js)
    }

    /// Append markup to the content area
    #[wasm_bindgen]
    pub fn set_content(&self, id: u64, markup: &str) -> Result<(), JsValue> {
        self.with_engine(|engine| engine.set_content(id, markup))?.map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn set_icon_path(&self, id: u64, path: &str) -> Result<(), JsValue> {
        self.with_engine(|engine| engine.set_icon_path(id, path))?.map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn get_icon_path(&self, id: u64) -> Option<String> {
        let engine = self.shared.engine.try_borrow().ok()?;
        engine.icon_path(id).map(str::to_string)
    }

    /// Icon for windows created from now on
    #[wasm_bindgen]
    pub fn set_default_icon_path(&self, path: Option<String>) -> Result<(), JsValue> {
        self.with_engine(|engine| engine.set_default_icon_path(path.as_deref()))
    }

    #[wasm_bindgen]
    pub fn get_default_icon(&self) -> Option<String> {
        let engine = self.shared.engine.try_borrow().ok()?;
        engine.default_icon().map(str::to_string)
    }

    #[wasm_bindgen]
    pub fn enable_draggable(&self, id: u64, enabled: bool) -> Result<(), JsValue> {
        self.with_engine(|engine| engine.enable_draggable(id, enabled))?.map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn enable_dismissable(&self, id: u64, enabled: bool) -> Result<(), JsValue> {
        self.with_engine(|engine| engine.enable_dismissable(id, enabled))?.map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn enable_dismissable_outside(&self, id: u64, enabled: bool) -> Result<(), JsValue> {
        self.with_engine(|engine| engine.enable_dismissable_outside(id, enabled))?
            .map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn set_resizable(&self, id: u64, resizable: bool) -> Result<(), JsValue> {
        self.with_engine(|engine| engine.set_resizable(id, resizable))?.map_err(to_js)
    }

    /// `callback(id)` runs after the window is displayed
    #[wasm_bindgen]
    pub fn set_on_show(&self, id: u64, callback: Function) -> Result<(), JsValue> {
        self.with_engine(|engine| {
            engine.set_on_show(id, move |id| defer(&callback, Array::of1(&JsValue::from(id))))
        })?
        .map_err(to_js)
    }

    /// `callback(id)` runs after the window is removed from the page
    #[wasm_bindgen]
    pub fn set_on_close(&self, id: u64, callback: Function) -> Result<(), JsValue> {
        self.with_engine(|engine| {
            engine.set_on_close(id, move |id| defer(&callback, Array::of1(&JsValue::from(id))))
        })?
        .map_err(to_js)
    }

    // =========================================================================
    // Menus
    // =========================================================================

    /// Render `bar` into the window's menu slot once its widgets resolve
    #[wasm_bindgen]
    pub fn set_menu_bar(&self, id: u64, bar: &JsMenuBar) -> Promise {
        let shared = self.shared.clone();
        let bar = bar.build();
        future_to_promise(async move {
            let bar = bar.map_err(to_js)?;
            let view = bar.menu_bar_view().await.map_err(|err| {
                log::warn!("[casement] menu bar for window {} not built: {}", id, err);
                to_js(err)
            })?;
            {
                let mut engine = shared.engine.try_borrow_mut().map_err(|_| busy())?;
                engine.attach_menu_bar(id, bar, view).map_err(to_js)?;
            }
            sync_listeners(&shared);
            Ok(JsValue::UNDEFINED)
        })
    }

    /// Close whichever dropdown is open on the page
    #[wasm_bindgen]
    pub fn close_dropdowns(&self) -> Result<bool, JsValue> {
        self.with_engine(|engine| engine.close_dropdowns())
    }

    // =========================================================================
    // Dialogs
    // =========================================================================

    /// Message dialog. Buttons without a callback just close the dialog.
    #[wasm_bindgen]
    pub fn prompt_dialog(
        &self,
        title: &str,
        body: &str,
        first_label: Option<String>,
        on_first: Option<Function>,
        second_label: Option<String>,
        on_second: Option<Function>,
    ) -> Promise {
        let first = js_button(first_label.as_deref().unwrap_or("Ok"), on_first);
        let second = second_label.map(|label| js_button(&label, on_second));
        self.spawn_dialog(DialogSpec::prompt_dialog(title, body, first, second))
    }

    /// Single-value editor; `callback(value, optionChecked)`
    #[wasm_bindgen]
    #[allow(clippy::too_many_arguments)]
    pub fn prompt_edit(
        &self,
        title: &str,
        message: &str,
        value: &str,
        masked: bool,
        file_name: bool,
        option: Option<String>,
        callback: Function,
    ) -> Promise {
        let kind = if masked {
            FieldKind::Password
        } else if file_name {
            FieldKind::FileName
        } else {
            FieldKind::Text
        };
        let spec = DialogSpec::prompt_edit(title, message, value, kind, option.as_deref(), move |value, checked| {
            defer(&callback, Array::of2(&JsValue::from_str(value), &JsValue::from(checked)))
        });
        self.spawn_dialog(spec)
    }

    /// `fields` is an array of `{ hint, value, masked }`; `callback(values)`
    #[wasm_bindgen]
    pub fn prompt_credentials(
        &self,
        title: &str,
        message: &str,
        fields: Array,
        callback: Function,
    ) -> Promise {
        let fields: Vec<(String, String, bool)> = fields
            .iter()
            .map(|field| {
                (
                    string_prop(&field, "hint").unwrap_or_default(),
                    string_prop(&field, "value").unwrap_or_default(),
                    Reflect::get(&field, &JsValue::from_str("masked"))
                        .ok()
                        .and_then(|v| v.as_bool())
                        .unwrap_or(false),
                )
            })
            .collect();
        let borrowed: Vec<(&str, &str, bool)> = fields
            .iter()
            .map(|(hint, value, masked)| (hint.as_str(), value.as_str(), *masked))
            .collect();
        let spec = DialogSpec::prompt_credentials(title, message, &borrowed, move |values| {
            let values: Array = values.iter().map(|v| JsValue::from_str(v)).collect();
            defer(&callback, Array::of1(&values))
        });
        self.spawn_dialog(spec)
    }

    /// Pick one of `items`; `callback(index)`
    #[wasm_bindgen]
    pub fn prompt_single_value(
        &self,
        title: &str,
        items: Vec<String>,
        current: Option<usize>,
        callback: Function,
    ) -> Promise {
        let items: Vec<&str> = items.iter().map(String::as_str).collect();
        let spec = DialogSpec::prompt_single_value(title, &items, current, move |index| {
            defer(&callback, Array::of1(&JsValue::from(index as u32)))
        });
        self.spawn_dialog(spec)
    }

    // =========================================================================
    // Context menus
    // =========================================================================

    /// `entries` is an array of `{ name, icon, callback }`; each callback
    /// receives the context menu's id
    #[wasm_bindgen]
    pub fn show_context_menu(&self, title: &str, x: f32, y: f32, entries: Array) -> Promise {
        let spec = entries.iter().fold(ContextMenuSpec::new(title, x, y), |spec, entry| {
            let name = string_prop(&entry, "name").unwrap_or_default();
            let icon = string_prop(&entry, "icon");
            let callback = Reflect::get(&entry, &JsValue::from_str("callback"))
                .ok()
                .and_then(|v| v.dyn_into::<Function>().ok());
            spec.entry(&name, icon.as_deref(), move |id| {
                if let Some(callback) = &callback {
                    defer(callback, Array::of1(&JsValue::from(id)));
                }
            })
        });
        let title = spec.title.clone();
        self.spawn_build(title, ContentSource::Empty, TemplateKind::ContextMenu, false, move |engine, loaded| {
            engine.build_context_menu(loaded, spec)
        })
    }
}

fn string_prop(object: &JsValue, key: &str) -> Option<String> {
    Reflect::get(object, &JsValue::from_str(key))
        .ok()
        .and_then(|v| v.as_string())
}

fn js_button(label: &str, callback: Option<Function>) -> DialogButton {
    match callback {
        Some(callback) => DialogButton::new(label, move |response| {
            let values: Array = response.values.iter().map(|v| JsValue::from_str(v)).collect();
            defer(&callback, Array::of1(&values))
        }),
        None => DialogButton::close(label),
    }
}

/// Menu bar builder for JS callers
#[wasm_bindgen]
#[derive(Default)]
pub struct JsMenuBar {
    entries: Vec<MenuEntry>,
}

impl JsMenuBar {
    fn build(&self) -> Result<MenuBar, crate::error::MenuError> {
        let mut bar = MenuBar::new();
        for entry in &self.entries {
            bar.add(entry.clone())?;
        }
        Ok(bar)
    }
}

#[wasm_bindgen]
impl JsMenuBar {
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsMenuBar {
        Self::default()
    }

    /// Add a top-level dropdown item
    #[wasm_bindgen]
    pub fn add_menu_item(&mut self, name: &str, title: &str) -> Result<(), JsValue> {
        let item = MenuItem::new(name, title).map_err(to_js)?;
        self.entries.push(MenuEntry::Item(item));
        Ok(())
    }

    /// Add a sub-item under `item`; `callback(windowId, item, sub)`
    #[wasm_bindgen]
    pub fn add_sub_item(
        &mut self,
        item: &str,
        name: &str,
        title: &str,
        icon: Option<String>,
        callback: Function,
    ) -> Result<(), JsValue> {
        let sub = MenuSubItem::new(name, title, icon.as_deref(), move |activation| {
            defer(
                &callback,
                Array::of3(
                    &JsValue::from(activation.window),
                    &JsValue::from_str(&activation.item),
                    &JsValue::from_str(&activation.sub),
                ),
            )
        })
        .map_err(to_js)?;
        let parent = self
            .entries
            .iter_mut()
            .find_map(|entry| match entry {
                MenuEntry::Item(menu) if menu.name() == item => Some(menu),
                _ => None,
            })
            .ok_or_else(|| to_js(format!("no menu item named `{}`", item)))?;
        parent.add_sub_item(sub).map_err(to_js)
    }

    /// Add a custom block; `producer()` returns markup or a promise of it.
    /// `on_attached(windowId, name)` runs once the block is on the page.
    #[wasm_bindgen]
    pub fn add_menu_widget(
        &mut self,
        name: &str,
        producer: Function,
        on_attached: Option<Function>,
    ) -> Result<(), JsValue> {
        let label = name.to_string();
        let mut widget = MenuWidget::new(name, move || {
            let producer = producer.clone();
            let label = label.clone();
            async move { produce_markup(&producer, &label).await }
        })
        .map_err(to_js)?;
        if let Some(callback) = on_attached {
            widget = widget.with_attached(move |id, name| {
                defer(&callback, Array::of2(&JsValue::from(id), &JsValue::from_str(name)))
            });
        }
        self.entries.push(MenuEntry::Widget(widget));
        Ok(())
    }
}

async fn produce_markup(producer: &Function, name: &str) -> Result<String, LoadError> {
    let failed = |reason: String| LoadError::Request {
        url: format!("widget:{}", name),
        reason,
    };
    let mut value = producer
        .call0(&JsValue::NULL)
        .map_err(|e| failed(format!("{:?}", e)))?;
    if let Some(promise) = value.dyn_ref::<Promise>() {
        value = JsFuture::from(promise.clone())
            .await
            .map_err(|e| failed(format!("{:?}", e)))?;
    }
    value
        .as_string()
        .ok_or_else(|| failed(String::from("producer did not return a string")))
}

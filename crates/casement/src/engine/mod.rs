//! Window engine coordinating all components
//!
//! This module is split into focused submodules:
//! - `windows`: Window lifecycle, stacking and modality
//! - `input`: Outside-click routing and drag operations
//! - `menus`: Menu bar mounting and the page-wide dropdown
//! - `widgets`: Dialogs and context menus

mod windows;
mod input;
mod menus;
mod widgets;

use std::collections::{BTreeSet, HashMap};

use crate::config::EngineConfig;
use crate::error::WindowError;
use crate::host::{Host, PageListener};
use crate::menu::DropdownState;
use crate::widgets::Decoration;
use crate::window::{Registry, StackOrder, Window, WindowId};

/// Process-wide window manager context
///
/// Owns everything the page shares between windows:
/// - Registry of visible windows and the stacking counter
/// - The single open dropdown across all menu bars
/// - The page-level listeners, each installed at most once
/// - The active drag, if any
///
/// Nothing works before [`initialize`](Self::initialize); after
/// [`shutdown`](Self::shutdown) the engine is back to its initial state.
pub struct WindowEngine<H: Host> {
    pub(crate) host: H,
    pub(crate) config: EngineConfig,
    pub(crate) initialized: bool,
    /// Every live window, shown or not
    pub(crate) windows: HashMap<WindowId, Window>,
    pub(crate) registry: Registry,
    pub(crate) stack: StackOrder,
    pub(crate) dropdowns: DropdownState,
    pub(crate) decorations: HashMap<WindowId, Decoration>,
    /// Listeners currently installed on the host
    pub(crate) listeners: BTreeSet<PageListener>,
    pub(crate) active_drag: Option<WindowId>,
    next_id: WindowId,
}

impl<H: Host> WindowEngine<H> {
    /// Create an engine with the default configuration
    pub fn new(host: H) -> Self {
        Self::with_config(host, EngineConfig::default())
    }

    pub fn with_config(host: H, config: EngineConfig) -> Self {
        let stack = StackOrder::new(config.stack_step);
        Self {
            host,
            config,
            initialized: false,
            windows: HashMap::new(),
            registry: Registry::new(),
            stack,
            dropdowns: DropdownState::new(),
            decorations: HashMap::new(),
            listeners: BTreeSet::new(),
            active_drag: None,
            next_id: 1,
        }
    }

    /// Install the page-level click and drag-start listeners.
    ///
    /// Returns false if the engine was already initialized.
    pub fn initialize(&mut self) -> bool {
        if self.initialized {
            return false;
        }
        self.ensure_listener(PageListener::WindowClick);
        self.ensure_listener(PageListener::PointerDown);
        self.initialized = true;
        log::info!("[casement] engine initialized");
        true
    }

    /// Hide every window, remove all listeners and reset stacking.
    pub fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }
        let mut ids: Vec<WindowId> = self.windows.keys().copied().collect();
        ids.sort_unstable();
        for id in ids {
            self.hide(id);
        }
        self.end_drag();
        self.close_dropdowns();

        let installed: Vec<PageListener> = self.listeners.iter().copied().collect();
        for listener in installed {
            self.release_listener(listener);
        }
        self.registry.clear();
        self.stack.reset();
        self.initialized = false;
        log::info!("[casement] engine shut down");
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub(crate) fn ensure_initialized(&self) -> Result<(), WindowError> {
        if self.initialized {
            Ok(())
        } else {
            Err(WindowError::NotInitialized)
        }
    }

    pub(crate) fn allocate_id(&mut self) -> WindowId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Install a page listener unless it is already installed
    pub(crate) fn ensure_listener(&mut self, listener: PageListener) {
        if self.listeners.insert(listener) {
            self.host.install_listener(listener);
            log::debug!("[casement] installed {:?} listener", listener);
        }
    }

    pub(crate) fn release_listener(&mut self, listener: PageListener) {
        if self.listeners.remove(&listener) {
            self.host.remove_listener(listener);
            log::debug!("[casement] removed {:?} listener", listener);
        }
    }

    pub fn is_listening(&self, listener: PageListener) -> bool {
        self.listeners.contains(&listener)
    }
}

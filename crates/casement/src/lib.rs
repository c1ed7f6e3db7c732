//! In-page window manager
//!
//! This crate provides floating panels for a browser page:
//! - Window lifecycle (create, show, hide) with fetched templates
//! - Stacking (a monotonic z-order counter, click-to-front)
//! - Modality and outside-click dismissal
//! - Title-bar dragging
//! - Menu bars with a single open dropdown across the page
//! - Dialogs and context menus built on plain windows
//!
//! ## Architecture
//!
//! - [`math`]: `Vec2` pointer and position vector
//! - [`host`]: The [`Host`] trait every page side effect goes through
//! - [`content`]: Template and content loading
//! - [`window`]: Window entity, registry and stacking counter
//! - [`input`]: Drag state machine and click descriptors
//! - [`menu`]: Menu bars, items, widgets and the dropdown state
//! - [`widgets`]: Dialog and context-menu decorations
//! - [`testing`]: `MockHost` and `MockLoader`
//!
//! ## Example
//!
//! ```rust
//! use casement::testing::{MockHost, MockLoader};
//! use casement::{ContentSource, WindowEngine};
//! use futures::executor::block_on;
//!
//! let mut engine = WindowEngine::new(MockHost::new());
//! engine.initialize();
//!
//! let loader = MockLoader::with_templates();
//! let id = block_on(engine.create_window(
//!     &loader,
//!     "Notes",
//!     ContentSource::inline("<p>Hello</p>"),
//!     false,
//! ))
//! .unwrap();
//!
//! engine.show(id).unwrap();
//! assert_eq!(engine.top_window(), Some(id));
//! ```
//!
//! ## Design Principles
//!
//! 1. **Pure Rust Core**: All state lives in [`WindowEngine`], testable without a browser
//! 2. **Explicit Context**: No globals; `initialize`/`shutdown` bracket the page listeners
//! 3. **Host Seam**: The DOM is reached only through [`Host`] (`DomHost` with the `wasm` feature)

pub mod math;
pub mod error;
pub mod config;
pub mod host;
pub mod content;
pub mod window;
pub mod input;
pub mod menu;
pub mod widgets;
pub mod testing;

mod engine;

// WASM exports (only available with "wasm" feature)
#[cfg(feature = "wasm")]
pub mod wasm;
#[cfg(feature = "wasm")]
pub use wasm::WindowController;

// Re-export core types for convenience
pub use math::Vec2;
pub use error::{HostError, LoadError, MenuError, WindowError};
pub use config::EngineConfig;
pub use host::{Cursor, Host, NodeId, PageListener, WindowParts};
pub use content::{ContentLoader, ContentSource, LoadedWindow, TemplateKind};
pub use window::{Window, WindowId, WindowPhase};
pub use input::{ClickTarget, DialogForm, DragState, InputResult, UiAction};
pub use menu::{MenuBar, MenuEntry, MenuItem, MenuSubItem, MenuWidget};
pub use widgets::{ContextMenuSpec, DialogSpec};
pub use engine::WindowEngine;

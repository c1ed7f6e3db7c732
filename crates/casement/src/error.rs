//! Error types for the window manager
//!
//! Every fallible operation returns one of these instead of leaving the page
//! half-built.

use crate::host::NodeId;
use crate::window::WindowId;

/// Failure to load a template or content resource.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// The request could not be issued or the connection failed.
    #[error("request for {url} failed: {reason}")]
    Request { url: String, reason: String },

    /// The server answered with a non-success status.
    #[error("request for {url} returned status {status}")]
    Status { url: String, status: u16 },

    /// No response arrived before the configured deadline.
    #[error("request for {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u32 },
}

/// Failure reported by the page host while mounting or mutating nodes.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// The template does not expose a required named region.
    #[error("template is missing the `{0}` region")]
    MissingRegion(&'static str),

    /// The markup could not be parsed or inserted.
    #[error("invalid markup: {0}")]
    Markup(String),

    /// The node was already removed from the page.
    #[error("node {0:?} is no longer attached")]
    Detached(NodeId),
}

/// Menu bar configuration errors.
///
/// These are raised synchronously while building a menu and abort the add.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MenuError {
    /// Item and sub-item names are required.
    #[error("menu names must not be empty")]
    EmptyName,

    /// Names double as class names on the page and may not contain whitespace.
    #[error("menu name `{0}` contains whitespace")]
    InvalidName(String),

    /// Dropdowns are keyed by name, so names must be unique within a bar.
    #[error("menu entry `{0}` already exists")]
    DuplicateName(String),

    /// No top-level item with this name exists on the bar.
    #[error("no menu item named `{0}`")]
    UnknownItem(String),

    /// No sub-item with this name exists under the item.
    #[error("no sub-item `{sub}` under menu item `{item}`")]
    UnknownSubItem { item: String, sub: String },

    /// A widget's content producer failed.
    #[error("menu widget `{name}` failed to produce content: {source}")]
    Widget {
        name: String,
        #[source]
        source: LoadError,
    },
}

/// Errors from window lifecycle operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WindowError {
    /// `initialize()` has not been called on the engine.
    #[error("window engine is not initialized")]
    NotInitialized,

    /// No live window has this id.
    #[error("unknown window {0}")]
    UnknownWindow(WindowId),

    /// A window can be shown once per construction.
    #[error("window {0} has already been shown")]
    AlreadyShown(WindowId),

    /// The operation needs a shown window.
    #[error("window {0} is not visible")]
    NotVisible(WindowId),

    /// The window template has no menu-bar slot.
    #[error("window {0} has no menu-bar slot")]
    NoMenuSlot(WindowId),

    #[error("failed to load window resource: {0}")]
    Load(#[from] LoadError),

    #[error("host error: {0}")]
    Host(#[from] HostError),

    #[error("menu error: {0}")]
    Menu(#[from] MenuError),
}

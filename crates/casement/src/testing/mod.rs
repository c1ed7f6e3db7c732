//! Test doubles for the page host and the resource loader
//!
//! Used by the crate's own tests and available to downstream crates that
//! drive a [`WindowEngine`](crate::WindowEngine) without a browser.

mod mock_host;
mod mock_loader;

pub use mock_host::{MockHost, BODY};
pub use mock_loader::MockLoader;

/// Plain window template with a menu-bar slot
pub const WINDOW_TEMPLATE: &str = r#"<div class="window-panel">
  <div class="window-title-bar">
    <img class="window-icon"><span class="window-title"></span>
    <button class="window-close">x</button>
  </div>
  <div class="window-menubar"></div>
  <div class="window-content"></div>
</div>"#;

/// Dialog template (no menu bar)
pub const DIALOG_TEMPLATE: &str = r#"<div class="window-panel dialog">
  <div class="window-title-bar">
    <img class="window-icon"><span class="window-title"></span>
    <button class="window-close">x</button>
  </div>
  <div class="window-content"></div>
</div>"#;

/// Context menu template (no menu bar)
pub const CONTEXT_MENU_TEMPLATE: &str = r#"<div class="window-panel context-menu">
  <div class="window-title-bar">
    <img class="window-icon"><span class="window-title"></span>
    <button class="window-close">x</button>
  </div>
  <div class="window-content context-menu-content"></div>
</div>"#;

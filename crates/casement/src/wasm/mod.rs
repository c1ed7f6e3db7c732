//! WASM exports for the window manager
//!
//! This module binds the engine to a real page:
//! - `logger`: `log` backend writing to the browser console
//! - `fetch`: `ContentLoader` over `window.fetch` with an abort timeout
//! - `dom`: `Host` implementation over web-sys elements
//! - `controller`: wasm-bindgen API consumed from JavaScript

pub mod logger;
pub mod fetch;
pub mod dom;
mod controller;

pub use controller::{JsMenuBar, WindowController};
pub use dom::DomHost;
pub use fetch::FetchLoader;

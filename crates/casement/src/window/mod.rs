//! Window entity, visible-window registry and stacking order

#[allow(clippy::module_inception)]
mod window;
mod registry;
mod stack;

pub use window::{Window, WindowCallback, WindowPhase};
pub use registry::Registry;
pub use stack::StackOrder;

/// Unique window identifier
pub type WindowId = u64;

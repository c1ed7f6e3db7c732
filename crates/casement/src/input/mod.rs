//! Input routing module
//!
//! Provides the per-window drag state machine and the click descriptors the
//! host hands to the engine.

mod drag;
mod result;
mod action;

pub use drag::{DragController, DragState, DragStep};
pub use result::InputResult;
pub use action::{ClickTarget, DialogForm, UiAction};

//! Input result type

use serde::Serialize;
use crate::window::WindowId;

/// Result of input handling
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InputResult {
    /// Input was handled internally
    Handled,
    /// Input was not handled (pass through)
    Unhandled,
    /// A drag began; the host should start delivering move/up events
    DragStarted {
        #[serde(rename = "windowId")]
        window_id: WindowId,
    },
    /// A drag ended; move/up listeners have been released
    DragEnded {
        #[serde(rename = "windowId")]
        window_id: WindowId,
    },
}

impl InputResult {
    /// Check if input was handled
    #[inline]
    pub fn is_handled(&self) -> bool {
        !matches!(self, InputResult::Unhandled)
    }

    /// Combine results from two routing passes
    pub fn or(self, other: InputResult) -> InputResult {
        match self {
            InputResult::Unhandled => other,
            handled => handled,
        }
    }
}

//! Click descriptors handed from the page to the engine
//!
//! The host tags every interactive element it renders with a serialized
//! [`UiAction`]. On a click it walks up from the target to the nearest tagged
//! element and reports both the raw target node and the decoded action.

use serde::{Deserialize, Serialize};

use crate::host::NodeId;
use crate::widgets::ButtonSlot;
use crate::window::WindowId;

/// An engine-rendered control
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum UiAction {
    /// Close affordance in a title bar
    Close { window: WindowId },
    /// Drag handle
    TitleBar { window: WindowId },
    /// Top-level menu item (the dropdown trigger)
    MenuTrigger { window: WindowId, item: String },
    /// Entry inside a dropdown
    SubItem {
        window: WindowId,
        item: String,
        sub: String,
    },
    DialogButton { window: WindowId, slot: ButtonSlot },
    ContextEntry { window: WindowId, index: usize },
}

impl UiAction {
    /// Encode for a `data-` attribute
    pub fn to_attribute(&self) -> String {
        // A plain enum of strings and integers always serializes.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Decode a `data-` attribute; unknown markup yields None
    pub fn from_attribute(value: &str) -> Option<Self> {
        serde_json::from_str(value).ok()
    }

    /// Window this control belongs to
    pub fn window(&self) -> WindowId {
        match self {
            UiAction::Close { window }
            | UiAction::TitleBar { window }
            | UiAction::MenuTrigger { window, .. }
            | UiAction::SubItem { window, .. }
            | UiAction::DialogButton { window, .. }
            | UiAction::ContextEntry { window, .. } => *window,
        }
    }

    #[inline]
    pub fn is_menu_trigger(&self) -> bool {
        matches!(self, UiAction::MenuTrigger { .. })
    }
}

/// Values read from a dialog's form at the time a button is pressed
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DialogForm {
    /// Field values in declaration order
    pub values: Vec<String>,
    pub option_checked: bool,
    pub selected_index: Option<usize>,
}

/// A click as seen by the engine
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClickTarget {
    /// Innermost node that received the click
    pub node: NodeId,
    /// Nearest tagged control, if any
    pub action: Option<UiAction>,
    /// Dialog form snapshot; empty unless `action` is a dialog button
    pub form: DialogForm,
}

impl ClickTarget {
    /// A click on an untagged node
    pub fn node(node: NodeId) -> Self {
        Self {
            node,
            action: None,
            form: DialogForm::default(),
        }
    }

    pub fn with_action(node: NodeId, action: UiAction) -> Self {
        Self {
            node,
            action: Some(action),
            form: DialogForm::default(),
        }
    }

    pub fn with_form(mut self, form: DialogForm) -> Self {
        self.form = form;
        self
    }

    /// Whether the click landed on a dropdown trigger
    pub fn is_menu_trigger(&self) -> bool {
        self.action.as_ref().is_some_and(UiAction::is_menu_trigger)
    }
}

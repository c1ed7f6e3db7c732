//! Widgets composed on top of a plain window
//!
//! A dialog or context menu is an ordinary [`Window`](crate::window::Window)
//! plus a decoration the engine consults when routing clicks on its controls.

pub mod dialog;
pub mod context_menu;

pub use dialog::{
    stem_selection, ButtonSlot, Dialog, DialogAction, DialogButton, DialogField, DialogResponse,
    DialogSpec, DialogView, FieldKind, FieldView,
};
pub use context_menu::{ContextAction, ContextEntry, ContextEntryView, ContextMenu, ContextMenuSpec};

/// Widget-specific behavior attached to a window
#[derive(Debug)]
pub enum Decoration {
    Dialog(Dialog),
    ContextMenu(ContextMenu),
}

impl Decoration {
    pub fn as_dialog(&self) -> Option<&Dialog> {
        match self {
            Decoration::Dialog(dialog) => Some(dialog),
            Decoration::ContextMenu(_) => None,
        }
    }

    pub fn as_context_menu(&self) -> Option<&ContextMenu> {
        match self {
            Decoration::ContextMenu(menu) => Some(menu),
            Decoration::Dialog(_) => None,
        }
    }
}

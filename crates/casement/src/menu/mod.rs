//! Menu bars
//!
//! A [`MenuBar`] is an ordered list of [`MenuEntry`] values, each either a
//! dropdown [`MenuItem`] or a custom [`MenuWidget`]. Which dropdown is open is
//! tracked once for the whole page in [`DropdownState`], owned by the engine.

mod item;
mod widget;
mod bar;
mod view;
mod dropdown;

pub use item::{MenuAction, MenuActivation, MenuItem, MenuSubItem};
pub use widget::{AttachedCallback, MenuWidget, WidgetContent};
pub use bar::{MenuBar, MenuEntry};
pub use view::{dropdown_id, MenuBarView, MenuEntryView, SubItemView};
pub use dropdown::{DropdownKey, DropdownState, DropdownTransition};

use crate::error::MenuError;

/// Names become class names on the page, so they must be single tokens.
pub(crate) fn validate_name(name: &str) -> Result<(), MenuError> {
    if name.is_empty() {
        return Err(MenuError::EmptyName);
    }
    if name.chars().any(char::is_whitespace) {
        return Err(MenuError::InvalidName(name.to_string()));
    }
    Ok(())
}

//! Page host abstraction
//!
//! The engine never touches the document directly. Every visual side effect
//! goes through [`Host`], which lets the whole window manager run in plain
//! Rust tests against [`MockHost`](crate::testing::MockHost) and in the browser
//! against the web-sys `DomHost` (behind the `wasm` feature).

use serde::{Deserialize, Serialize};

use crate::content::TemplateKind;
use crate::error::HostError;
use crate::math::Vec2;
use crate::menu::MenuBarView;
use crate::widgets::{ContextEntryView, DialogView};
use crate::window::WindowId;

/// Opaque handle to a node owned by the host
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

/// Class names a window template must expose
pub mod regions {
    /// The floating panel that is shown, stacked and positioned
    pub const PANEL: &str = "window-panel";
    pub const ICON: &str = "window-icon";
    /// Drag handle
    pub const TITLE_BAR: &str = "window-title-bar";
    pub const TITLE: &str = "window-title";
    /// Close affordance
    pub const CLOSE: &str = "window-close";
    /// Optional slot the menu bar is mounted into
    pub const MENU_BAR: &str = "window-menubar";
    pub const CONTENT: &str = "window-content";

    /// Regions every template has to provide
    pub const REQUIRED: [&str; 6] = [PANEL, ICON, TITLE_BAR, TITLE, CLOSE, CONTENT];
}

/// Named regions of a mounted window template
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowParts {
    /// Container appended to the page; detached on hide
    pub root: NodeId,
    pub panel: NodeId,
    pub icon: NodeId,
    pub title_bar: NodeId,
    pub title: NodeId,
    pub close_button: NodeId,
    pub menu_slot: Option<NodeId>,
    pub content: NodeId,
}

/// Cursor shown over the title bar
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cursor {
    Move,
    Auto,
}

impl Cursor {
    pub fn css(&self) -> &'static str {
        match self {
            Cursor::Move => "move",
            Cursor::Auto => "auto",
        }
    }
}

/// Page-level listeners the engine asks the host to install
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PageListener {
    /// Outside-click dismissal and click-to-front
    WindowClick,
    /// Dropdown toggling and click-outside-dropdown
    DropdownClick,
    /// Drag start on title bars
    PointerDown,
    /// Drag tracking, only while a drag is active
    PointerMove,
    /// Drag end, only while a drag is active
    PointerUp,
}

impl PageListener {
    /// DOM event name the listener is bound to
    pub fn event_name(&self) -> &'static str {
        match self {
            PageListener::WindowClick | PageListener::DropdownClick => "click",
            PageListener::PointerDown => "mousedown",
            PageListener::PointerMove => "mousemove",
            PageListener::PointerUp => "mouseup",
        }
    }

    /// Listener whose page binding also delivers this one's events.
    ///
    /// Both click listeners share the `WindowClick` binding, which routes
    /// dropdowns before windows.
    pub fn bound_with(&self) -> Option<PageListener> {
        match self {
            PageListener::DropdownClick => Some(PageListener::WindowClick),
            _ => None,
        }
    }
}

/// Document operations used by the engine
pub trait Host {
    /// Parse a template, append its root to the page and locate its regions.
    ///
    /// The root must stay hidden until the engine displays the panel.
    fn mount_window(
        &mut self,
        window: WindowId,
        kind: TemplateKind,
        markup: &str,
    ) -> Result<WindowParts, HostError>;

    /// Remove a window root from the page
    fn detach(&mut self, root: NodeId);

    /// Whether `node` is `ancestor` or one of its descendants
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool;

    fn set_text(&mut self, node: NodeId, text: &str);

    fn set_image(&mut self, node: NodeId, src: &str);

    /// Append markup as a new child block of `node`
    fn append_markup(&mut self, node: NodeId, markup: &str) -> Result<(), HostError>;

    fn set_displayed(&mut self, node: NodeId, displayed: bool);

    fn set_z_index(&mut self, node: NodeId, z: u32);

    /// Current top-left of a node in page pixels
    fn position(&self, node: NodeId) -> Vec2;

    fn set_position(&mut self, node: NodeId, position: Vec2);

    fn set_cursor(&mut self, node: NodeId, cursor: Cursor);

    /// Toggle the disabled marker used for modality
    fn set_interactive(&mut self, node: NodeId, interactive: bool);

    fn set_resizable(&mut self, node: NodeId, resizable: bool);

    fn install_listener(&mut self, listener: PageListener);

    fn remove_listener(&mut self, listener: PageListener);

    /// Render a menu bar into a window's menu slot
    fn mount_menu_bar(
        &mut self,
        slot: NodeId,
        window: WindowId,
        view: &MenuBarView,
    ) -> Result<(), HostError>;

    /// Show or hide a dropdown, stacking it at `z` while open
    fn set_dropdown_open(&mut self, window: WindowId, item: &str, open: bool, z: u32);

    fn mount_context_entries(
        &mut self,
        content: NodeId,
        window: WindowId,
        entries: &[ContextEntryView],
    ) -> Result<(), HostError>;

    fn mount_dialog(
        &mut self,
        parts: &WindowParts,
        window: WindowId,
        view: &DialogView,
    ) -> Result<(), HostError>;

    /// Focus a dialog field, optionally selecting a character range
    fn focus_field(&mut self, window: WindowId, field: usize, selection: Option<(usize, usize)>);
}

/// Locate required regions by class name in template markup.
///
/// Hosts without a real parser use this to validate a template before
/// building nodes for it.
pub fn check_regions(markup: &str) -> Result<bool, HostError> {
    if markup.trim().is_empty() {
        return Err(HostError::Markup(String::from("empty template")));
    }
    for region in regions::REQUIRED {
        if !has_class(markup, region) {
            return Err(HostError::MissingRegion(region));
        }
    }
    Ok(has_class(markup, regions::MENU_BAR))
}

/// Whether `name` appears as a whole class token (`window-title` does not
/// match inside `window-title-bar`)
fn has_class(markup: &str, name: &str) -> bool {
    let is_ident = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_';
    markup.match_indices(name).any(|(start, _)| {
        let before = markup[..start].chars().next_back();
        let after = markup[start + name.len()..].chars().next();
        !before.is_some_and(is_ident) && !after.is_some_and(is_ident)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_regions_reports_first_missing() {
        let markup = "<div class=\"window-panel\"><span class=\"window-icon\"></span></div>";
        assert_eq!(
            check_regions(markup),
            Err(HostError::MissingRegion(regions::TITLE_BAR))
        );
    }

    #[test]
    fn test_check_regions_detects_menu_slot() {
        let all = regions::REQUIRED.join(" ");
        assert_eq!(check_regions(&all), Ok(false));

        let with_menu = format!("{} {}", all, regions::MENU_BAR);
        assert_eq!(check_regions(&with_menu), Ok(true));
    }

    #[test]
    fn test_region_names_match_whole_tokens() {
        let markup = "window-panel window-icon window-title-bar window-close window-content";
        assert_eq!(
            check_regions(markup),
            Err(HostError::MissingRegion(regions::TITLE))
        );
    }

    #[test]
    fn test_empty_template_is_markup_error() {
        assert!(matches!(check_regions("  "), Err(HostError::Markup(_))));
    }

    #[test]
    fn test_listener_event_names() {
        assert_eq!(PageListener::WindowClick.event_name(), "click");
        assert_eq!(PageListener::DropdownClick.event_name(), "click");
        assert_eq!(PageListener::PointerMove.event_name(), "mousemove");
        assert_eq!(Cursor::Move.css(), "move");
    }

    #[test]
    fn test_click_listeners_share_one_binding() {
        assert_eq!(
            PageListener::DropdownClick.bound_with(),
            Some(PageListener::WindowClick)
        );
        assert!(PageListener::WindowClick.bound_with().is_none());
        assert!(PageListener::PointerDown.bound_with().is_none());
        assert!(PageListener::PointerMove.bound_with().is_none());
    }
}

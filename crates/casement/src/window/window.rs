//! Window entity

use std::collections::BTreeSet;
use std::fmt;

use crate::content::TemplateKind;
use crate::host::WindowParts;
use crate::input::DragController;
use crate::math::Vec2;
use crate::menu::MenuBar;
use super::WindowId;

/// Show/close handler; receives the window it was registered on
pub type WindowCallback = Box<dyn FnOnce(WindowId)>;

/// Lifecycle phase of a live window.
///
/// A hidden window is destroyed rather than entering a third phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowPhase {
    /// Mounted but not yet shown; not registered
    Created,
    /// Shown and registered
    Visible,
}

/// A floating panel on the page
pub struct Window {
    pub(crate) id: WindowId,
    pub(crate) kind: TemplateKind,
    pub(crate) parts: WindowParts,
    pub(crate) title: String,
    pub(crate) icon: Option<String>,
    pub(crate) modal: bool,
    pub(crate) draggable: bool,
    pub(crate) dismissable: bool,
    pub(crate) dismissable_outside: bool,
    pub(crate) resizable: bool,
    pub(crate) phase: WindowPhase,
    /// Stacking value, assigned only while visible
    pub(crate) z_order: Option<u32>,
    pub(crate) position: Vec2,
    /// Visible modals currently blocking this window
    pub(crate) blocked_by: BTreeSet<WindowId>,
    pub(crate) menu: Option<MenuBar>,
    pub(crate) drag: DragController,
    pub(crate) on_show: Option<WindowCallback>,
    pub(crate) on_close: Option<WindowCallback>,
}

impl Window {
    pub(crate) fn new(id: WindowId, kind: TemplateKind, parts: WindowParts, modal: bool) -> Self {
        Self {
            id,
            kind,
            parts,
            title: String::new(),
            icon: None,
            modal,
            draggable: false,
            dismissable: false,
            dismissable_outside: false,
            resizable: true,
            phase: WindowPhase::Created,
            z_order: None,
            position: Vec2::ZERO,
            blocked_by: BTreeSet::new(),
            menu: None,
            drag: DragController::new(),
            on_show: None,
            on_close: None,
        }
    }

    #[inline]
    pub fn id(&self) -> WindowId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> TemplateKind {
        self.kind
    }

    #[inline]
    pub fn parts(&self) -> &WindowParts {
        &self.parts
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Icon locator, if one was resolved
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    #[inline]
    pub fn is_modal(&self) -> bool {
        self.modal
    }

    #[inline]
    pub fn is_draggable(&self) -> bool {
        self.draggable
    }

    /// Whether the close affordance is shown
    #[inline]
    pub fn is_dismissable(&self) -> bool {
        self.dismissable
    }

    /// Whether a click outside the window hides it
    #[inline]
    pub fn is_dismissable_outside(&self) -> bool {
        self.dismissable_outside
    }

    #[inline]
    pub fn is_resizable(&self) -> bool {
        self.resizable
    }

    #[inline]
    pub fn phase(&self) -> WindowPhase {
        self.phase
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.phase == WindowPhase::Visible
    }

    #[inline]
    pub fn z_order(&self) -> Option<u32> {
        self.z_order
    }

    /// Last position set by a drag
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// False while any visible modal blocks this window
    #[inline]
    pub fn is_interactive(&self) -> bool {
        self.blocked_by.is_empty()
    }

    pub fn blocked_by(&self) -> impl Iterator<Item = WindowId> + '_ {
        self.blocked_by.iter().copied()
    }

    pub fn menu_bar(&self) -> Option<&MenuBar> {
        self.menu.as_ref()
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("title", &self.title)
            .field("modal", &self.modal)
            .field("phase", &self.phase)
            .field("z_order", &self.z_order)
            .field("blocked_by", &self.blocked_by)
            .finish_non_exhaustive()
    }
}

//! Per-window drag state machine

use crate::math::Vec2;

/// Current drag state of one window
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    /// Title bar grabbed
    Dragging {
        /// Pointer position at gesture start
        start: Vec2,
        /// Panel origin minus pointer position
        offset: Vec2,
    },
}

/// Outcome of a pointer-move tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragStep {
    /// No drag in progress
    Ignored,
    /// Move the panel here
    MoveTo(Vec2),
    /// Dragging was disabled mid-gesture; the drag is over
    Halted,
}

/// Drag controller attached to a window's title bar.
///
/// `draggable` is passed on every transition so that disabling dragging
/// takes effect on the very next tick.
#[derive(Clone, Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> DragState {
        self.state
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Pointer-down on the title bar. Returns true if a drag started.
    pub fn begin(&mut self, draggable: bool, pointer: Vec2, origin: Vec2) -> bool {
        if !draggable {
            return false;
        }
        self.state = DragState::Dragging {
            start: pointer,
            offset: origin - pointer,
        };
        true
    }

    /// Pointer-move anywhere on the page
    pub fn update(&mut self, draggable: bool, pointer: Vec2) -> DragStep {
        match self.state {
            DragState::Idle => DragStep::Ignored,
            DragState::Dragging { .. } if !draggable => {
                self.state = DragState::Idle;
                DragStep::Halted
            }
            DragState::Dragging { offset, .. } => DragStep::MoveTo(pointer + offset),
        }
    }

    /// Pointer-up; returns true if a drag was in progress
    pub fn finish(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        self.state = DragState::Idle;
        was_dragging
    }
}

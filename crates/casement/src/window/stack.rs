//! Global stacking counter

use crate::config::DEFAULT_STACK_STEP;

/// Monotonic z-order allocator.
///
/// Each show or raise takes the next value, `step` above the last one. The
/// values in between are overlay slots for transient layers (open dropdowns)
/// of the window directly below them. The counter never goes down on hide.
#[derive(Clone, Debug)]
pub struct StackOrder {
    current: u32,
    step: u32,
}

impl Default for StackOrder {
    fn default() -> Self {
        Self::new(DEFAULT_STACK_STEP)
    }
}

impl StackOrder {
    pub fn new(step: u32) -> Self {
        Self {
            current: 0,
            step: step.max(DEFAULT_STACK_STEP),
        }
    }

    /// Allocate the next stacking value
    pub fn advance(&mut self) -> u32 {
        self.current = self.current.saturating_add(self.step);
        self.current
    }

    /// Last value handed out (0 before the first show)
    #[inline]
    pub fn current(&self) -> u32 {
        self.current
    }

    /// Overlay slot reserved directly above a window's value
    #[inline]
    pub fn overlay_above(z: u32) -> u32 {
        z.saturating_add(1)
    }

    /// Start over from zero
    pub fn reset(&mut self) {
        self.current = 0;
    }
}

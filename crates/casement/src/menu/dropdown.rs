//! Page-wide open-dropdown state
//!
//! There is one instance per engine, shared by every menu bar, so at most one
//! dropdown is open on the page.

use crate::window::WindowId;

/// A dropdown is identified by its window and item name
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DropdownKey {
    pub window: WindowId,
    pub item: String,
}

impl DropdownKey {
    pub fn new(window: WindowId, item: &str) -> Self {
        Self {
            window,
            item: item.to_string(),
        }
    }
}

/// Visible change caused by a trigger click
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropdownTransition {
    /// Nothing was open; `0` opened
    Opened(DropdownKey),
    /// `0` was open and its own trigger closed it
    Closed(DropdownKey),
    /// Another dropdown was open; it closed and the requested one opened
    Switched {
        closed: DropdownKey,
        opened: DropdownKey,
    },
}

#[derive(Clone, Debug, Default)]
pub struct DropdownState {
    open: Option<DropdownKey>,
}

impl DropdownState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self) -> Option<&DropdownKey> {
        self.open.as_ref()
    }

    pub fn is_open(&self, key: &DropdownKey) -> bool {
        self.open.as_ref() == Some(key)
    }

    /// Trigger click: close whatever is open, then toggle `key`
    pub fn toggle(&mut self, key: DropdownKey) -> DropdownTransition {
        match self.open.take() {
            Some(current) if current == key => DropdownTransition::Closed(current),
            Some(current) => {
                self.open = Some(key.clone());
                DropdownTransition::Switched {
                    closed: current,
                    opened: key,
                }
            }
            None => {
                self.open = Some(key.clone());
                DropdownTransition::Opened(key)
            }
        }
    }

    /// Close the open dropdown, if any
    pub fn close_all(&mut self) -> Option<DropdownKey> {
        self.open.take()
    }

    /// Close the open dropdown only if it belongs to `window`
    pub fn close_for_window(&mut self, window: WindowId) -> Option<DropdownKey> {
        if self.open.as_ref().is_some_and(|k| k.window == window) {
            self.open.take()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_trigger_switches() {
        let mut state = DropdownState::new();
        let file = DropdownKey::new(1, "File");
        let edit = DropdownKey::new(1, "Edit");

        assert_eq!(state.toggle(file.clone()), DropdownTransition::Opened(file.clone()));
        assert_eq!(
            state.toggle(edit.clone()),
            DropdownTransition::Switched {
                closed: file.clone(),
                opened: edit.clone()
            }
        );
        assert!(state.is_open(&edit));
        assert!(!state.is_open(&file));
    }

    #[test]
    fn test_same_trigger_closes() {
        let mut state = DropdownState::new();
        let file = DropdownKey::new(1, "File");

        state.toggle(file.clone());
        assert_eq!(state.toggle(file.clone()), DropdownTransition::Closed(file));
        assert!(state.open().is_none());
    }

    #[test]
    fn test_single_open_across_windows() {
        let mut state = DropdownState::new();
        state.toggle(DropdownKey::new(1, "File"));
        let transition = state.toggle(DropdownKey::new(2, "File"));

        assert!(matches!(transition, DropdownTransition::Switched { ref closed, .. } if closed.window == 1));
        assert_eq!(state.close_for_window(1), None);
        assert_eq!(state.close_for_window(2), Some(DropdownKey::new(2, "File")));
        assert_eq!(state.close_all(), None);
    }
}

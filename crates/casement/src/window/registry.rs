//! Set of currently visible windows

use super::WindowId;

/// Visible-window set.
///
/// Membership is all that matters for routing; the registration sequence is
/// kept only to break ties between equal stacking values.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    /// (window, registration sequence), in registration order
    entries: Vec<(WindowId, u64)>,
    next_seq: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a window; returns false if it was already present
    pub fn insert(&mut self, id: WindowId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.entries.push((id, self.next_seq));
        self.next_seq += 1;
        true
    }

    /// Unregister a window; removing an absent window is a no-op
    pub fn remove(&mut self, id: WindowId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|&(wid, _)| wid != id);
        self.entries.len() != before
    }

    #[inline]
    pub fn contains(&self, id: WindowId) -> bool {
        self.entries.iter().any(|&(wid, _)| wid == id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered windows in registration order
    pub fn ids(&self) -> Vec<WindowId> {
        self.entries.iter().map(|&(id, _)| id).collect()
    }

    /// Topmost window: greatest stacking value, ties to the last registered
    pub fn topmost<F>(&self, z_of: F) -> Option<WindowId>
    where
        F: Fn(WindowId) -> u32,
    {
        self.entries
            .iter()
            .max_by_key(|&&(id, seq)| (z_of(id), seq))
            .map(|&(id, _)| id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_is_unique() {
        let mut registry = Registry::new();
        assert!(registry.insert(1));
        assert!(!registry.insert(1));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_absent_is_benign() {
        let mut registry = Registry::new();
        registry.insert(3);
        assert!(!registry.remove(7));
        assert!(registry.remove(3));
        assert!(!registry.remove(3));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_topmost_by_z() {
        let mut registry = Registry::new();
        registry.insert(1);
        registry.insert(2);
        registry.insert(3);

        let z = |id: WindowId| match id {
            1 => 8,
            2 => 4,
            _ => 6,
        };
        assert_eq!(registry.topmost(z), Some(1));
    }

    #[test]
    fn test_topmost_tie_goes_to_last_registered() {
        let mut registry = Registry::new();
        registry.insert(5);
        registry.insert(2);
        assert_eq!(registry.topmost(|_| 4), Some(2));
    }

    #[test]
    fn test_topmost_empty() {
        assert_eq!(Registry::new().topmost(|_| 0), None);
    }
}

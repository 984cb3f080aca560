//! Click-to-toggle model selection

/// Whether the model is currently selected
///
/// A hit toggles the flag; a miss always clears it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    selected: bool,
}

impl Selection {
    pub fn is_selected(self) -> bool {
        self.selected
    }

    /// Apply one left click and return the new state
    pub fn register_click(&mut self, hit: bool) -> bool {
        self.selected = hit && !self.selected;
        self.selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_toggles() {
        let mut selection = Selection::default();
        assert!(!selection.is_selected());
        assert!(selection.register_click(true));
        assert!(!selection.register_click(true));
        assert!(selection.register_click(true));
    }

    #[test]
    fn test_miss_always_clears() {
        let mut selection = Selection::default();
        assert!(!selection.register_click(false));
        selection.register_click(true);
        assert!(!selection.register_click(false));
        assert!(!selection.register_click(false));
    }
}

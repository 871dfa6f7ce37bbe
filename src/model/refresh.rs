//! Refresh state
//!
//! The table has exactly one piece of state of its own: whether it is
//! currently refreshing. It flips on a pull gesture or when the host raises
//! its `loading` flag, and flips back when the refresh finishes or the host
//! lowers `loading`.

/// Label shown next to the spinner when no other label is configured
pub const DEFAULT_REFRESH_TITLE: &str = "refreshing";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshState {
    #[default]
    Idle,
    Refreshing,
}

/// Refreshing flag reconciled with the host's `loading` flag
#[derive(Debug, Clone)]
pub struct RefreshControl {
    state: RefreshState,
    /// Last `loading` value seen from the host
    loading: bool,
    label: String,
}

impl Default for RefreshControl {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshControl {
    pub fn new() -> Self {
        Self {
            state: RefreshState::Idle,
            loading: false,
            label: DEFAULT_REFRESH_TITLE.to_string(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn state(&self) -> RefreshState {
        self.state
    }

    pub fn is_refreshing(&self) -> bool {
        self.state == RefreshState::Refreshing
    }

    /// Pull gesture. Returns true if a new refresh was started.
    pub fn pull(&mut self) -> bool {
        if self.is_refreshing() {
            return false;
        }
        self.state = RefreshState::Refreshing;
        true
    }

    /// The refresh operation completed, successfully or not
    pub fn finish(&mut self) {
        self.state = RefreshState::Idle;
    }

    /// Apply the host's `loading` flag; only a change has an effect
    pub fn sync_loading(&mut self, loading: bool) {
        if loading == self.loading {
            return;
        }
        self.loading = loading;
        self.state = if loading {
            RefreshState::Refreshing
        } else {
            RefreshState::Idle
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pull_and_finish() {
        let mut control = RefreshControl::new();
        assert_eq!(control.state(), RefreshState::Idle);
        assert!(control.pull());
        assert!(control.is_refreshing());
        assert!(!control.pull());
        control.finish();
        assert_eq!(control.state(), RefreshState::Idle);
    }

    #[test]
    fn test_loading_drives_flag() {
        let mut control = RefreshControl::new();
        control.sync_loading(true);
        assert!(control.is_refreshing());
        control.sync_loading(false);
        assert!(!control.is_refreshing());
    }

    #[test]
    fn test_loading_false_clears_pulled_refresh() {
        let mut control = RefreshControl::new();
        control.sync_loading(true);
        control.finish();
        assert!(control.pull());
        control.sync_loading(false);
        assert!(!control.is_refreshing());
    }

    #[test]
    fn test_unchanged_loading_is_ignored() {
        let mut control = RefreshControl::new();
        assert!(control.pull());
        // loading was already false, so the pull stays in effect
        control.sync_loading(false);
        assert!(control.is_refreshing());
    }

    #[test]
    fn test_label() {
        assert_eq!(RefreshControl::new().label(), "refreshing");
        assert_eq!(RefreshControl::new().with_label("loading…").label(), "loading…");
    }
}

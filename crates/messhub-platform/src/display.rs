//! Display state
//!
//! Display mode, the legacy navigator standalone flag, the document
//! referrer, and a media-query change feed for `(display-mode: standalone)`.

use std::sync::{Arc, Mutex};

use crate::listeners::{ListenerGuard, ListenerSet};

/// How the app is currently displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Browser,
    Standalone,
}

/// Media-query change event for the standalone display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayModeChange {
    pub matches_standalone: bool,
}

#[derive(Debug)]
struct DisplayInner {
    mode: DisplayMode,
    navigator_standalone: bool,
    referrer: String,
}

/// Shared display-state handle
#[derive(Clone)]
pub struct DisplayState {
    inner: Arc<Mutex<DisplayInner>>,
    changes: ListenerSet<DisplayModeChange>,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayState {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(DisplayInner {
                mode: DisplayMode::Browser,
                navigator_standalone: false,
                referrer: String::new(),
            })),
            changes: ListenerSet::new(),
        }
    }

    /// Current display mode
    pub fn mode(&self) -> DisplayMode {
        self.inner.lock().unwrap().mode
    }

    /// Change the display mode, firing the media-query listeners
    pub fn set_mode(&self, mode: DisplayMode) {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.mode = mode;
        }
        tracing::debug!(?mode, "display mode changed");
        self.changes.emit(&DisplayModeChange {
            matches_standalone: mode == DisplayMode::Standalone,
        });
    }

    /// Legacy `navigator.standalone` flag
    pub fn navigator_standalone(&self) -> bool {
        self.inner.lock().unwrap().navigator_standalone
    }

    pub fn set_navigator_standalone(&self, value: bool) {
        self.inner.lock().unwrap().navigator_standalone = value;
    }

    /// Document referrer
    pub fn referrer(&self) -> String {
        self.inner.lock().unwrap().referrer.clone()
    }

    pub fn set_referrer(&self, referrer: &str) {
        self.inner.lock().unwrap().referrer = referrer.to_string();
    }

    /// Subscribe to media-query change events
    pub fn subscribe_changes(
        &self,
        callback: impl FnMut(&DisplayModeChange) + Send + 'static,
    ) -> ListenerGuard {
        self.changes.subscribe(callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_change_fires_listeners() {
        let display = DisplayState::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen2 = seen.clone();
        let guard = display.subscribe_changes(move |change| {
            seen2.lock().unwrap().push(change.matches_standalone);
        });

        display.set_mode(DisplayMode::Standalone);
        display.set_mode(DisplayMode::Browser);
        assert_eq!(*seen.lock().unwrap(), vec![true, false]);

        guard.cancel();
        display.set_mode(DisplayMode::Standalone);
        assert_eq!(seen.lock().unwrap().len(), 2);
    }
}

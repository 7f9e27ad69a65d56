//! Window host
//!
//! User-agent string and the page-reload side effect.

use std::sync::{Arc, Mutex};

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// An iOS Safari user agent, for environment setup
pub const IOS_USER_AGENT: &str =
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";

#[derive(Debug)]
struct WindowInner {
    user_agent: String,
    reloads: u32,
}

/// Shared window handle
#[derive(Debug, Clone)]
pub struct WindowHost {
    inner: Arc<Mutex<WindowInner>>,
}

impl Default for WindowHost {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowHost {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(WindowInner {
                user_agent: DEFAULT_USER_AGENT.to_string(),
                reloads: 0,
            })),
        }
    }

    pub fn user_agent(&self) -> String {
        self.inner.lock().unwrap().user_agent.clone()
    }

    pub fn set_user_agent(&self, user_agent: &str) {
        self.inner.lock().unwrap().user_agent = user_agent.to_string();
    }

    /// Whether the user agent identifies an iOS device
    pub fn is_ios(&self) -> bool {
        let ua = self.inner.lock().unwrap().user_agent.clone();
        ["iPad", "iPhone", "iPod"].iter().any(|m| ua.contains(m))
    }

    /// Reload the page
    pub fn reload(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.reloads += 1;
        tracing::info!(count = inner.reloads, "page reload");
    }

    /// How many times the page has been reloaded
    pub fn reload_count(&self) -> u32 {
        self.inner.lock().unwrap().reloads
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ios_detection() {
        let window = WindowHost::new();
        assert!(!window.is_ios());

        window.set_user_agent(IOS_USER_AGENT);
        assert!(window.is_ios());
    }

    #[test]
    fn test_reload_counter() {
        let window = WindowHost::new();
        window.reload();
        window.reload();
        assert_eq!(window.reload_count(), 2);
    }
}

//! Notifications host
//!
//! Mirrors the platform permission state and displays local notifications.
//! Prompt outcomes are scripted; once the permission settles as granted or
//! denied the host never re-prompts, matching browser behavior.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Notification permission state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionStatus {
    /// Not yet asked, or the prompt was dismissed without a choice
    #[default]
    Default,
    Granted,
    Denied,
}

/// Notification display options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationOptions {
    pub body: Option<String>,
    pub icon: Option<String>,
    pub badge: Option<String>,
    pub tag: Option<String>,
    pub vibrate: Vec<u32>,
    pub require_interaction: bool,
    pub silent: bool,
}

/// A notification the host has displayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShownNotification {
    pub title: String,
    pub options: NotificationOptions,
}

#[derive(Debug)]
struct NotificationsInner {
    supported: bool,
    permission: PermissionStatus,
    scripted: VecDeque<PermissionStatus>,
    shown: Vec<ShownNotification>,
    prompts_shown: u32,
}

/// Shared notifications-host handle
#[derive(Debug, Clone)]
pub struct NotificationsHost {
    inner: Arc<Mutex<NotificationsInner>>,
}

impl Default for NotificationsHost {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationsHost {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(NotificationsInner {
                supported: true,
                permission: PermissionStatus::Default,
                scripted: VecDeque::new(),
                shown: Vec::new(),
                prompts_shown: 0,
            })),
        }
    }

    /// Whether the Notification API exists in this environment
    pub fn is_supported(&self) -> bool {
        self.inner.lock().unwrap().supported
    }

    pub fn set_supported(&self, supported: bool) {
        self.inner.lock().unwrap().supported = supported;
    }

    /// Current permission state
    pub fn permission(&self) -> PermissionStatus {
        self.inner.lock().unwrap().permission
    }

    /// Force a permission state (environment setup)
    pub fn set_permission(&self, permission: PermissionStatus) {
        self.inner.lock().unwrap().permission = permission;
    }

    /// Queue the outcome of the next permission prompt
    pub fn script_prompt_outcome(&self, outcome: PermissionStatus) {
        self.inner.lock().unwrap().scripted.push_back(outcome);
    }

    /// Show the permission prompt and wait for it to settle
    ///
    /// A settled permission (granted or denied) is returned as-is without
    /// prompting again. An unscripted prompt settles as `Default`, i.e. the
    /// user dismissed the chrome without choosing.
    pub async fn request_prompt(&self) -> PermissionStatus {
        let mut inner = self.inner.lock().unwrap();
        if inner.permission != PermissionStatus::Default {
            return inner.permission;
        }

        inner.prompts_shown += 1;
        let outcome = inner.scripted.pop_front().unwrap_or_default();
        if outcome != PermissionStatus::Default {
            inner.permission = outcome;
        }
        tracing::debug!(?outcome, "notification permission prompt settled");
        outcome
    }

    /// How many prompts have actually been shown
    pub fn prompts_shown(&self) -> u32 {
        self.inner.lock().unwrap().prompts_shown
    }

    /// Display a notification
    pub fn show(&self, title: &str, options: NotificationOptions) {
        let mut inner = self.inner.lock().unwrap();
        inner.shown.push(ShownNotification {
            title: title.to_string(),
            options,
        });
    }

    /// Notifications displayed so far
    pub fn shown(&self) -> Vec<ShownNotification> {
        self.inner.lock().unwrap().shown.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_settles_scripted_outcome() {
        let host = NotificationsHost::new();
        host.script_prompt_outcome(PermissionStatus::Granted);

        let outcome = smol::block_on(host.request_prompt());
        assert_eq!(outcome, PermissionStatus::Granted);
        assert_eq!(host.permission(), PermissionStatus::Granted);
        assert_eq!(host.prompts_shown(), 1);
    }

    #[test]
    fn test_settled_permission_never_reprompts() {
        let host = NotificationsHost::new();
        host.set_permission(PermissionStatus::Denied);

        let outcome = smol::block_on(host.request_prompt());
        assert_eq!(outcome, PermissionStatus::Denied);
        assert_eq!(host.prompts_shown(), 0);
    }

    #[test]
    fn test_dismissed_prompt_stays_default() {
        let host = NotificationsHost::new();

        // No scripted outcome: the user closed the prompt chrome
        let outcome = smol::block_on(host.request_prompt());
        assert_eq!(outcome, PermissionStatus::Default);
        assert_eq!(host.permission(), PermissionStatus::Default);

        // Still promptable afterwards
        host.script_prompt_outcome(PermissionStatus::Granted);
        assert_eq!(
            smol::block_on(host.request_prompt()),
            PermissionStatus::Granted
        );
        assert_eq!(host.prompts_shown(), 2);
    }
}

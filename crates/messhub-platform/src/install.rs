//! Install-eligibility signal
//!
//! The `beforeinstallprompt` equivalent: a platform-issued, single-use
//! event announcing that the session may prompt the user to install the
//! app. The trigger is consumed by value, so a second prompt on the same
//! signal cannot compile.

use std::sync::{Arc, Mutex};

use crate::listeners::{ListenerGuard, ListenerSet};

/// Outcome of the user-facing install prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallChoice {
    Accepted,
    Dismissed,
}

/// One-shot prompt trigger captured from an install event
#[derive(Debug)]
pub struct InstallPromptTrigger {
    choice: InstallChoice,
}

impl InstallPromptTrigger {
    /// Show the install prompt and wait for the user's choice
    pub async fn prompt(self) -> InstallChoice {
        tracing::debug!(choice = ?self.choice, "install prompt settled");
        self.choice
    }
}

/// Delivered to install-signal listeners
pub struct InstallPromptEvent {
    trigger: Mutex<Option<InstallPromptTrigger>>,
    default_prevented: Mutex<bool>,
}

impl InstallPromptEvent {
    fn new(choice: InstallChoice) -> Self {
        Self {
            trigger: Mutex::new(Some(InstallPromptTrigger { choice })),
            default_prevented: Mutex::new(false),
        }
    }

    /// Suppress the platform's native mini-prompt
    pub fn prevent_default(&self) {
        *self.default_prevented.lock().unwrap() = true;
    }

    /// Capture the one-shot trigger; `None` once taken
    pub fn take_trigger(&self) -> Option<InstallPromptTrigger> {
        self.trigger.lock().unwrap().take()
    }
}

#[derive(Debug, Default)]
struct SignalInner {
    native_prompts_shown: u32,
    emitted: u32,
}

/// Shared install-signal handle
#[derive(Clone, Default)]
pub struct InstallSignal {
    inner: Arc<Mutex<SignalInner>>,
    listeners: ListenerSet<InstallPromptEvent>,
}

impl InstallSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to install-eligibility events
    pub fn subscribe(
        &self,
        callback: impl FnMut(&InstallPromptEvent) + Send + 'static,
    ) -> ListenerGuard {
        self.listeners.subscribe(callback)
    }

    /// Emit the install-eligibility signal with a scripted user choice
    pub fn emit(&self, choice: InstallChoice) {
        let event = InstallPromptEvent::new(choice);
        self.listeners.emit(&event);

        let mut inner = self.inner.lock().unwrap();
        inner.emitted += 1;
        if !*event.default_prevented.lock().unwrap() {
            // Nobody intercepted the event, so the mini-prompt would appear
            inner.native_prompts_shown += 1;
        }
    }

    /// How many times the native mini-prompt would have appeared
    pub fn native_prompts_shown(&self) -> u32 {
        self.inner.lock().unwrap().native_prompts_shown
    }

    /// How many signals have been emitted
    pub fn emitted(&self) -> u32 {
        self.inner.lock().unwrap().emitted
    }
}

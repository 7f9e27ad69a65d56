//! PWA coordinator
//!
//! Process-wide install state: standalone detection, capture of the
//! one-shot install trigger, and the install action. Built once at app
//! start and torn down on unmount; tests construct as many independent
//! instances as they like.

use std::mem;
use std::sync::{Arc, Mutex};

use messhub_platform::{
    DisplayMode, InstallChoice, InstallPromptTrigger, ListenerGuard, Platform,
};

const ANDROID_APP_REFERRER: &str = "android-app://";

/// Derived read model for install UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PwaSnapshot {
    pub is_installable: bool,
    pub is_standalone: bool,
}

impl PwaSnapshot {
    /// Whether install UI may be offered; standalone always suppresses it
    pub fn should_offer_install(&self) -> bool {
        self.is_installable && !self.is_standalone
    }
}

/// Install-trigger lifecycle: absent until the platform signals, captured
/// until consumed
#[derive(Debug, Default)]
enum InstallTrigger {
    #[default]
    Absent,
    Captured(InstallPromptTrigger),
}

/// Coordinates installability and standalone state for the whole app
pub struct PwaCoordinator {
    platform: Platform,
    standalone: Arc<Mutex<bool>>,
    trigger: Arc<Mutex<InstallTrigger>>,
    guards: Mutex<Vec<ListenerGuard>>,
}

impl PwaCoordinator {
    /// Evaluate the environment and start listening for platform events
    pub fn initialize(platform: Platform) -> Self {
        // Any one signal is enough to call the app standalone
        let standalone = platform.display.mode() == DisplayMode::Standalone
            || platform.display.navigator_standalone()
            || platform.display.referrer().contains(ANDROID_APP_REFERRER);
        let standalone = Arc::new(Mutex::new(standalone));

        let trigger = Arc::new(Mutex::new(InstallTrigger::Absent));

        let standalone_sink = standalone.clone();
        let display_guard = platform.display.subscribe_changes(move |change| {
            *standalone_sink.lock().unwrap() = change.matches_standalone;
        });

        let trigger_sink = trigger.clone();
        let install_guard = platform.install.subscribe(move |event| {
            // Keep the platform's own mini-prompt from appearing
            event.prevent_default();
            if let Some(captured) = event.take_trigger() {
                tracing::debug!("install trigger captured");
                *trigger_sink.lock().unwrap() = InstallTrigger::Captured(captured);
            }
        });

        Self {
            platform,
            standalone,
            trigger,
            guards: Mutex::new(vec![display_guard, install_guard]),
        }
    }

    /// Whether the app currently runs as an installed app
    pub fn is_standalone(&self) -> bool {
        *self.standalone.lock().unwrap()
    }

    /// Whether an install trigger is currently captured
    pub fn is_installable(&self) -> bool {
        matches!(*self.trigger.lock().unwrap(), InstallTrigger::Captured(_))
    }

    pub fn snapshot(&self) -> PwaSnapshot {
        PwaSnapshot {
            is_installable: self.is_installable(),
            is_standalone: self.is_standalone(),
        }
    }

    /// Show the captured install prompt and report whether the user accepted
    ///
    /// The trigger is consumed regardless of outcome; only a new platform
    /// signal can make the app installable again.
    pub async fn show_install_prompt(&self) -> bool {
        let taken = mem::take(&mut *self.trigger.lock().unwrap());
        let InstallTrigger::Captured(trigger) = taken else {
            return false;
        };

        let choice = trigger.prompt().await;
        tracing::info!(accepted = (choice == InstallChoice::Accepted), "install prompt shown");
        choice == InstallChoice::Accepted
    }

    /// Borrow the platform this coordinator was built over
    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Detach every platform subscription; idempotent
    pub fn teardown(&self) {
        for guard in self.guards.lock().unwrap().drain(..) {
            guard.cancel();
        }
    }
}

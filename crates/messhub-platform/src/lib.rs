//! MessHub platform layer
//!
//! Explicit, in-memory models of the browser capabilities the MessHub
//! shell runs against: display mode, the install-eligibility signal,
//! notification and push hosting, the service-worker container, local
//! storage, the wall clock, and the window itself.
//!
//! Every surface is a cloneable handle over shared state, so the layers
//! above receive their capabilities by injection and tests can drive
//! independent environments deterministically.

pub mod clock;
pub mod display;
pub mod install;
pub mod listeners;
pub mod notifications;
pub mod push;
pub mod storage;
pub mod sw;
pub mod window;

pub use clock::Clock;
pub use display::{DisplayMode, DisplayModeChange, DisplayState};
pub use install::{InstallChoice, InstallPromptEvent, InstallPromptTrigger, InstallSignal};
pub use listeners::{ListenerGuard, ListenerSet};
pub use notifications::{
    NotificationOptions, NotificationsHost, PermissionStatus, ShownNotification,
};
pub use push::{PushHost, PushSubscription, PushSubscriptionKeys};
pub use storage::{LocalStorage, StorageError};
pub use sw::{ServiceWorkerHost, SwEvent, SwHostError, SwRegistration, WorkerInfo, WorkerState};
pub use window::WindowHost;

use chrono::{DateTime, Utc};

/// The full capability bundle handed to the shell
#[derive(Clone)]
pub struct Platform {
    pub clock: Clock,
    pub storage: LocalStorage,
    pub display: DisplayState,
    pub install: InstallSignal,
    pub notifications: NotificationsHost,
    pub push: PushHost,
    pub sw: ServiceWorkerHost,
    pub window: WindowHost,
}

impl Default for Platform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform {
    /// A fully capable environment on the system clock
    pub fn new() -> Self {
        Self::with_clock(Clock::system())
    }

    /// A fully capable environment on a manually advanced clock
    pub fn simulated(start: DateTime<Utc>) -> Self {
        Self::with_clock(Clock::fixed(start))
    }

    fn with_clock(clock: Clock) -> Self {
        Self {
            clock,
            storage: LocalStorage::new(),
            display: DisplayState::new(),
            install: InstallSignal::new(),
            notifications: NotificationsHost::new(),
            push: PushHost::new(),
            sw: ServiceWorkerHost::new(),
            window: WindowHost::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_handles_share_state() {
        let platform = Platform::simulated("2026-03-01T00:00:00Z".parse().unwrap());
        let other = platform.clone();

        platform.storage.set_item("k", "v").unwrap();
        assert_eq!(other.storage.get_item("k").unwrap().as_deref(), Some("v"));

        platform.display.set_mode(DisplayMode::Standalone);
        assert_eq!(other.display.mode(), DisplayMode::Standalone);
    }
}

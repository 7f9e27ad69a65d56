//! Notification opt-in banner
//!
//! Asks for notification permission once support, permission state, the
//! 7-day throttle, and a short settling delay all allow it. Enabling
//! subscribes to push and confirms with a welcome notification.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use messhub_platform::{NotificationOptions, PermissionStatus, Platform};

use crate::notify::NotificationService;
use crate::records;

pub const TITLE: &str = "Enable Notifications";
pub const BODY: &str =
    "Get updates about your mess activities, payments, and important announcements";

const WELCOME_TITLE: &str = "Notifications Enabled";
const WELCOME_BODY: &str = "You will now receive important updates from MessHub";

/// Seconds to wait after load before the banner may appear
pub const PROMPT_DELAY_SECS: i64 = 5;

pub struct NotificationPrompt {
    platform: Platform,
    service: Arc<NotificationService>,
    ready_at: DateTime<Utc>,
    dismissed: Mutex<bool>,
}

impl NotificationPrompt {
    pub fn new(platform: Platform, service: Arc<NotificationService>) -> Self {
        let ready_at = platform.clock.now() + Duration::seconds(PROMPT_DELAY_SECS);
        Self {
            platform,
            service,
            ready_at,
            dismissed: Mutex::new(false),
        }
    }

    /// Whether the banner should currently render
    pub fn should_show(&self) -> bool {
        if *self.dismissed.lock().unwrap() {
            return false;
        }
        // Let the user settle in before asking
        if self.platform.clock.now() < self.ready_at {
            return false;
        }
        if !self.service.check_support().supported {
            return false;
        }
        if self.service.permission_status() != Some(PermissionStatus::Default) {
            return false;
        }
        !records::notification_ask_throttled(&self.platform.storage, &self.platform.clock)
    }

    /// The Enable action; `true` when permission ended up granted
    pub async fn enable(&self) -> bool {
        let status = match self.service.request_permission().await {
            Ok(status) => status,
            Err(err) => {
                tracing::error!(%err, "notification permission request failed");
                *self.dismissed.lock().unwrap() = true;
                return false;
            }
        };

        records::record_notification_asked(&self.platform.storage, &self.platform.clock);
        *self.dismissed.lock().unwrap() = true;

        if status != PermissionStatus::Granted {
            return false;
        }

        self.service.subscribe().await;
        self.service.show_notification(
            WELCOME_TITLE,
            NotificationOptions {
                body: Some(WELCOME_BODY.to_string()),
                ..NotificationOptions::default()
            },
        );
        true
    }

    /// The Not Now action; counts as an ask for throttling purposes
    pub fn dismiss(&self) {
        *self.dismissed.lock().unwrap() = true;
        records::record_notification_asked(&self.platform.storage, &self.platform.clock);
    }
}

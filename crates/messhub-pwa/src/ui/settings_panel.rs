//! PWA settings panel
//!
//! Notification, offline, and background-sync toggles plus the advanced
//! cache and update actions. A granted notification permission cannot be
//! revoked from the page, so the off position only surfaces guidance.

use std::sync::{Arc, Mutex};

use messhub_platform::{PermissionStatus, Platform};

use crate::notify::NotificationService;
use crate::settings::{self, PwaSettings, WorkerMessage};
use crate::sw::ServiceWorkerClient;

/// Shown when the user tries to switch notifications off
pub const REVOKE_HELP: &str = "To disable notifications, please use your browser settings.";

/// Outcome of the notification toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationToggle {
    Enabled,
    NotGranted,
    /// Turning the toggle off has no platform effect
    RevokeNotSupported,
}

pub struct SettingsPanel {
    platform: Platform,
    service: Arc<NotificationService>,
    sw: Arc<ServiceWorkerClient>,
    settings: Mutex<PwaSettings>,
}

impl SettingsPanel {
    pub fn new(
        platform: Platform,
        service: Arc<NotificationService>,
        sw: Arc<ServiceWorkerClient>,
    ) -> Self {
        let settings = settings::load_settings(&platform.storage);
        Self {
            platform,
            service,
            sw,
            settings: Mutex::new(settings),
        }
    }

    pub fn settings(&self) -> PwaSettings {
        *self.settings.lock().unwrap()
    }

    pub fn notifications_enabled(&self) -> bool {
        self.service.permission_status() == Some(PermissionStatus::Granted)
    }

    /// Flip the notification toggle
    pub async fn set_notifications(&self, enabled: bool) -> NotificationToggle {
        if !enabled {
            return NotificationToggle::RevokeNotSupported;
        }

        match self.service.request_permission().await {
            Ok(PermissionStatus::Granted) => {
                self.service.subscribe().await;
                NotificationToggle::Enabled
            }
            Ok(status) => {
                tracing::debug!(?status, "notifications stay off");
                NotificationToggle::NotGranted
            }
            Err(err) => {
                tracing::error!(%err, "notification permission request failed");
                NotificationToggle::NotGranted
            }
        }
    }

    /// Flip the offline-mode toggle and tell the worker
    pub fn set_offline_enabled(&self, enabled: bool) {
        {
            let mut settings = self.settings.lock().unwrap();
            settings.offline_enabled = enabled;
            settings::save_settings(&self.platform.storage, &settings);
        }
        self.sw.send_message(&WorkerMessage::UpdateCacheSettings {
            offline_enabled: enabled,
        });
    }

    /// Flip the background-sync toggle and tell the worker
    pub fn set_data_sync(&self, enabled: bool) {
        {
            let mut settings = self.settings.lock().unwrap();
            settings.data_sync = enabled;
            settings::save_settings(&self.platform.storage, &settings);
        }
        self.sw
            .send_message(&WorkerMessage::UpdateSyncSettings { data_sync: enabled });
    }

    /// Delete every named cache; returns how many were removed
    pub async fn clear_cached_data(&self) -> usize {
        let names = self.platform.sw.cache_names();
        let mut removed = 0;
        for name in &names {
            if self.platform.sw.delete_cache(name) {
                removed += 1;
            }
        }
        tracing::info!(removed, "cached data cleared");
        removed
    }

    /// The Check for Updates action
    pub async fn check_for_updates(&self) -> bool {
        self.sw.check_for_update().await
    }
}

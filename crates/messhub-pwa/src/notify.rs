//! Notification service
//!
//! Permission flow, push subscription management, and local notification
//! display. Subscription descriptors are handed to a delivery endpoint,
//! stubbed here; failures resolve to `None`/`false` rather than
//! propagating.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use messhub_platform::{
    NotificationOptions, PermissionStatus, Platform, PushSubscription, ShownNotification,
};

use crate::sw::WORKER_SCRIPT_PATH;

/// Public key identifying this app to the push service
pub const VAPID_PUBLIC_KEY: &str =
    "BF93TNDFO7jnVU_o2yi1WK1MgkQynLpCQ1YfYWcw7L84zO8wOQlds5s4S-Key_TocHNvMJDcibbvSddjMcl9s34";

const DEFAULT_ICON: &str = "/icons/icon-192x192.png";
const DEFAULT_BADGE: &str = "/icons/badge-72x72.png";
const DEFAULT_VIBRATE: [u32; 3] = [100, 50, 100];

/// Capability check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Support {
    pub supported: bool,
    pub reason: Option<String>,
}

impl Support {
    fn ok() -> Self {
        Self {
            supported: true,
            reason: None,
        }
    }

    fn missing(reason: &str) -> Self {
        Self {
            supported: false,
            reason: Some(reason.to_string()),
        }
    }
}

/// Notification capability error
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notifications unavailable: {0}")]
    Unsupported(String),
}

/// Receives subscription descriptors; the real one lives on a server
pub trait PushEndpoint: Send + Sync {
    /// Store a new subscription; `false` on failure
    fn save(&self, subscription: &PushSubscription) -> bool;

    /// Forget a subscription by endpoint URL; `false` on failure
    fn remove(&self, endpoint: &str) -> bool;
}

/// Stub delivery endpoint that logs what it is handed
pub struct LoggingEndpoint;

impl PushEndpoint for LoggingEndpoint {
    fn save(&self, subscription: &PushSubscription) -> bool {
        match serde_json::to_string(subscription) {
            Ok(json) => tracing::info!(subscription = %json, "subscription saved"),
            Err(_) => tracing::info!(endpoint = %subscription.endpoint, "subscription saved"),
        }
        true
    }

    fn remove(&self, endpoint: &str) -> bool {
        tracing::info!(%endpoint, "subscription removed");
        true
    }
}

/// Client-side notification and push capability
pub struct NotificationService {
    platform: Platform,
    endpoint: Arc<dyn PushEndpoint>,
}

impl NotificationService {
    pub fn new(platform: Platform) -> Self {
        Self::with_endpoint(platform, Arc::new(LoggingEndpoint))
    }

    pub fn with_endpoint(platform: Platform, endpoint: Arc<dyn PushEndpoint>) -> Self {
        Self { platform, endpoint }
    }

    /// Check the three capability prerequisites, naming the first one missing
    pub fn check_support(&self) -> Support {
        if !self.platform.notifications.is_supported() {
            return Support::missing("Notifications not supported in this browser");
        }
        if !self.platform.sw.is_supported() {
            return Support::missing("Service Workers not supported in this browser");
        }
        if !self.platform.push.is_supported() {
            return Support::missing("Push notifications not supported in this browser");
        }
        Support::ok()
    }

    /// Current permission state; `None` when the capability is absent
    pub fn permission_status(&self) -> Option<PermissionStatus> {
        if !self.platform.notifications.is_supported() {
            return None;
        }
        Some(self.platform.notifications.permission())
    }

    /// Ask the user for notification permission
    ///
    /// Fails without touching the platform prompt when support is missing.
    /// The platform itself suppresses repeat prompts once the permission
    /// has settled; this never works around that.
    pub async fn request_permission(&self) -> Result<PermissionStatus, NotifyError> {
        let support = self.check_support();
        if !support.supported {
            return Err(NotifyError::Unsupported(
                support.reason.unwrap_or_else(|| "unknown".to_string()),
            ));
        }

        Ok(self.platform.notifications.request_prompt().await)
    }

    /// Subscribe to push notifications
    ///
    /// Requests permission when not yet granted, registers the worker if
    /// needed, and reuses an existing subscription. New subscriptions are
    /// handed to the delivery endpoint. Resolves to `None` on any failure.
    pub async fn subscribe(&self) -> Option<PushSubscription> {
        if self.permission_status() != Some(PermissionStatus::Granted) {
            match self.request_permission().await {
                Ok(PermissionStatus::Granted) => {}
                Ok(other) => {
                    tracing::warn!(status = ?other, "notification permission not granted");
                    return None;
                }
                Err(err) => {
                    tracing::warn!(%err, "cannot subscribe to push notifications");
                    return None;
                }
            }
        }

        if let Err(err) = self.platform.sw.register(WORKER_SCRIPT_PATH) {
            tracing::error!(%err, "service worker registration failed");
            return None;
        }

        if let Some(existing) = self.platform.push.get_subscription() {
            return Some(existing);
        }

        let key = match URL_SAFE_NO_PAD.decode(VAPID_PUBLIC_KEY.trim_end_matches('=')) {
            Ok(key) => key,
            Err(err) => {
                tracing::error!(%err, "invalid application server key");
                return None;
            }
        };

        let subscription = self.platform.push.subscribe(&key).await?;
        if !self.endpoint.save(&subscription) {
            tracing::warn!(endpoint = %subscription.endpoint, "failed to save subscription");
        }
        Some(subscription)
    }

    /// Unsubscribe from push notifications
    ///
    /// `true` when no subscription existed; already in the desired state.
    pub async fn unsubscribe(&self) -> bool {
        let Some(subscription) = self.platform.push.get_subscription() else {
            return true;
        };

        if !self.endpoint.remove(&subscription.endpoint) {
            tracing::warn!(endpoint = %subscription.endpoint, "failed to remove subscription");
        }
        self.platform.push.unsubscribe().await
    }

    /// Display a local notification with the app defaults merged under
    /// caller overrides
    pub fn show_notification(
        &self,
        title: &str,
        options: NotificationOptions,
    ) -> Option<ShownNotification> {
        if !self.platform.notifications.is_supported()
            || self.platform.notifications.permission() != PermissionStatus::Granted
        {
            return None;
        }

        let mut merged = options;
        if merged.icon.is_none() {
            merged.icon = Some(DEFAULT_ICON.to_string());
        }
        if merged.badge.is_none() {
            merged.badge = Some(DEFAULT_BADGE.to_string());
        }
        if merged.vibrate.is_empty() {
            merged.vibrate = DEFAULT_VIBRATE.to_vec();
        }

        self.platform.notifications.show(title, merged.clone());
        Some(ShownNotification {
            title: title.to_string(),
            options: merged,
        })
    }
}

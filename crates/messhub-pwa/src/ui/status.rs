//! PWA status panel
//!
//! Read model for the installation, notification, and update rows, plus
//! the actions each row offers.

use std::sync::{Arc, Mutex};

use messhub_platform::{ListenerGuard, PermissionStatus};

use crate::coordinator::PwaCoordinator;
use crate::notify::NotificationService;
use crate::sw::ServiceWorkerClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStatus {
    Installed,
    Available,
    NotAvailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationStatus {
    Enabled,
    Blocked,
    NotEnabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStatus {
    NotControlled,
    UpdateAvailable,
    UpToDate,
}

pub struct PwaStatusPanel {
    coordinator: Arc<PwaCoordinator>,
    service: Arc<NotificationService>,
    sw: Arc<ServiceWorkerClient>,
    update_available: Arc<Mutex<bool>>,
    guard: Mutex<Option<ListenerGuard>>,
}

impl PwaStatusPanel {
    pub fn new(
        coordinator: Arc<PwaCoordinator>,
        service: Arc<NotificationService>,
        sw: Arc<ServiceWorkerClient>,
    ) -> Self {
        let update_available = Arc::new(Mutex::new(sw.has_update_waiting()));

        let flag = update_available.clone();
        let guard = sw.subscribe_to_updates(
            || {},
            move || {
                *flag.lock().unwrap() = true;
            },
            || {},
        );

        Self {
            coordinator,
            service,
            sw,
            update_available,
            guard: Mutex::new(Some(guard)),
        }
    }

    pub fn install_status(&self) -> InstallStatus {
        let snapshot = self.coordinator.snapshot();
        if snapshot.is_standalone {
            InstallStatus::Installed
        } else if snapshot.is_installable {
            InstallStatus::Available
        } else {
            InstallStatus::NotAvailable
        }
    }

    pub fn notification_status(&self) -> NotificationStatus {
        match self.service.permission_status() {
            Some(PermissionStatus::Granted) => NotificationStatus::Enabled,
            Some(PermissionStatus::Denied) => NotificationStatus::Blocked,
            _ => NotificationStatus::NotEnabled,
        }
    }

    pub fn update_status(&self) -> UpdateStatus {
        if !self.sw.is_controlled() {
            UpdateStatus::NotControlled
        } else if *self.update_available.lock().unwrap() {
            UpdateStatus::UpdateAvailable
        } else {
            UpdateStatus::UpToDate
        }
    }

    /// The Install action on the installation row
    pub async fn install(&self) -> bool {
        self.coordinator.show_install_prompt().await
    }

    /// The Enable action on the notifications row
    pub async fn request_notifications(&self) -> NotificationStatus {
        match self.service.request_permission().await {
            Ok(PermissionStatus::Granted) => {
                self.service.subscribe().await;
            }
            Ok(_) => {}
            Err(err) => {
                tracing::error!(%err, "notification permission request failed");
            }
        }
        self.notification_status()
    }

    /// The Update action on the updates row; reloads the page
    pub async fn apply_update(&self) {
        self.sw.force_update().await;
    }

    /// Detach the update subscription
    pub fn teardown(&self) {
        if let Some(guard) = self.guard.lock().unwrap().take() {
            guard.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use messhub_platform::{DisplayMode, InstallChoice, Platform};

    fn panel_over(platform: &Platform) -> PwaStatusPanel {
        let coordinator = Arc::new(PwaCoordinator::initialize(platform.clone()));
        let service = Arc::new(NotificationService::new(platform.clone()));
        let sw = Arc::new(ServiceWorkerClient::new(platform.clone()));
        smol::block_on(sw.initialize());
        PwaStatusPanel::new(coordinator, service, sw)
    }

    #[test]
    fn test_install_row_transitions() {
        let platform = Platform::simulated(Utc::now());
        let panel = panel_over(&platform);
        assert_eq!(panel.install_status(), InstallStatus::NotAvailable);

        platform.install.emit(InstallChoice::Accepted);
        assert_eq!(panel.install_status(), InstallStatus::Available);

        platform.display.set_mode(DisplayMode::Standalone);
        assert_eq!(panel.install_status(), InstallStatus::Installed);
    }

    #[test]
    fn test_notification_row_maps_permission() {
        let platform = Platform::simulated(Utc::now());
        let panel = panel_over(&platform);
        assert_eq!(panel.notification_status(), NotificationStatus::NotEnabled);

        platform
            .notifications
            .set_permission(PermissionStatus::Granted);
        assert_eq!(panel.notification_status(), NotificationStatus::Enabled);

        platform
            .notifications
            .set_permission(PermissionStatus::Denied);
        assert_eq!(panel.notification_status(), NotificationStatus::Blocked);
    }

    #[test]
    fn test_update_row_follows_lifecycle() {
        let platform = Platform::simulated(Utc::now());
        let panel = panel_over(&platform);
        assert_eq!(panel.update_status(), UpdateStatus::UpToDate);

        platform.sw.begin_update();
        platform.sw.complete_install();
        assert_eq!(panel.update_status(), UpdateStatus::UpdateAvailable);

        smol::block_on(panel.apply_update());
        assert_eq!(platform.window.reload_count(), 1);
    }

    #[test]
    fn test_uncontrolled_page_reports_not_controlled() {
        let platform = Platform::simulated(Utc::now());
        platform.sw.set_supported(false);
        let coordinator = Arc::new(PwaCoordinator::initialize(platform.clone()));
        let service = Arc::new(NotificationService::new(platform.clone()));
        let sw = Arc::new(ServiceWorkerClient::new(platform.clone()));
        let panel = PwaStatusPanel::new(coordinator, service, sw);

        assert_eq!(panel.update_status(), UpdateStatus::NotControlled);
    }

    #[test]
    fn test_enable_action_grants_and_subscribes() {
        let platform = Platform::simulated(Utc::now());
        let panel = panel_over(&platform);
        platform
            .notifications
            .script_prompt_outcome(PermissionStatus::Granted);

        let status = smol::block_on(panel.request_notifications());
        assert_eq!(status, NotificationStatus::Enabled);
        assert!(platform.push.get_subscription().is_some());
    }
}

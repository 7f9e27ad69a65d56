//! Application shell
//!
//! Composition root: wires the platform, the PWA core, the widgets, and
//! the auth session together, and owns the teardown of everything it
//! subscribed.

use std::sync::{Arc, Mutex};

use messhub_platform::{ListenerGuard, Platform};
use messhub_pwa::ui::{
    InstallPrompt, InstallPromptView, NotificationPrompt, PwaStatusPanel, SettingsPanel,
};
use messhub_pwa::records;
use messhub_pwa::{NotificationService, PwaCoordinator, ServiceWorkerClient, SwInit};

use crate::auth::AuthSession;
use crate::screens::{route, AuthFlow, Route};

pub struct AppShell {
    pub platform: Platform,
    pub coordinator: Arc<PwaCoordinator>,
    pub sw: Arc<ServiceWorkerClient>,
    pub notifications: Arc<NotificationService>,
    pub auth: AuthSession,
    pub flow: Mutex<AuthFlow>,
    pub install_prompt: InstallPrompt,
    pub notification_prompt: NotificationPrompt,
    pub status: PwaStatusPanel,
    pub settings: SettingsPanel,
    update_banner: Arc<Mutex<bool>>,
    visit: u32,
    update_guard: Mutex<Option<ListenerGuard>>,
}

impl AppShell {
    /// Bring the whole shell up over one platform
    pub async fn initialize(platform: Platform) -> Self {
        let sw = Arc::new(ServiceWorkerClient::new(platform.clone()));
        match sw.initialize().await {
            SwInit::Registered | SwInit::AlreadyRegistered => {}
            outcome => tracing::warn!(?outcome, "starting without a service worker"),
        }

        let coordinator = Arc::new(PwaCoordinator::initialize(platform.clone()));
        let notifications = Arc::new(NotificationService::new(platform.clone()));
        let auth = AuthSession::new(platform.storage.clone(), platform.clock.clone());

        let visit = records::record_visit(&platform.storage, &platform.clock);
        tracing::debug!(visit, "visit recorded");

        // Surface the update banner whenever a new version is ready
        let update_banner = Arc::new(Mutex::new(sw.has_update_waiting()));
        let banner = update_banner.clone();
        let update_guard = sw.subscribe_to_updates(
            || tracing::debug!("update found"),
            move || {
                *banner.lock().unwrap() = true;
            },
            || tracing::debug!("no update available"),
        );

        let install_prompt = InstallPrompt::new(coordinator.clone());
        let notification_prompt =
            NotificationPrompt::new(platform.clone(), notifications.clone());
        let status = PwaStatusPanel::new(coordinator.clone(), notifications.clone(), sw.clone());
        let settings = SettingsPanel::new(platform.clone(), notifications.clone(), sw.clone());

        Self {
            platform,
            coordinator,
            sw,
            notifications,
            auth,
            flow: Mutex::new(AuthFlow::new()),
            install_prompt,
            notification_prompt,
            status,
            settings,
            update_banner,
            visit,
            update_guard: Mutex::new(Some(update_guard)),
        }
    }

    /// The active route for the current session
    pub fn route(&self) -> Route {
        route(&self.auth, &self.flow.lock().unwrap())
    }

    /// Which visit this session is
    pub fn visit(&self) -> u32 {
        self.visit
    }

    /// Whether to proactively surface the install banner this session
    pub fn nudge_install(&self) -> bool {
        records::install_nudge_ready(&self.platform.storage)
            && self.install_prompt.view() != InstallPromptView::Hidden
    }

    /// Whether the "new version available" banner is up
    pub fn update_banner_visible(&self) -> bool {
        *self.update_banner.lock().unwrap()
    }

    /// The banner's Refresh action; reloads the page
    pub async fn refresh_now(&self) {
        self.sw.force_update().await;
    }

    /// Detach every subscription this shell owns; idempotent
    pub fn teardown(&self) {
        if let Some(guard) = self.update_guard.lock().unwrap().take() {
            guard.cancel();
        }
        self.status.teardown();
        self.coordinator.teardown();
        self.sw.teardown();
    }
}

//! Service-worker lifecycle client
//!
//! Registers the app worker at its well-known path and tracks the update
//! lifecycle: a new version installing, installed-and-waiting, and taking
//! control of the page. Nothing here throws past the adapter boundary;
//! unsupported or failing environments degrade to no-ops.

use std::sync::{Arc, Mutex};

use messhub_platform::{ListenerGuard, Platform, SwEvent};

use crate::settings::WorkerMessage;

/// Well-known worker script path; must stay stable across deployments
pub const WORKER_SCRIPT_PATH: &str = "/sw.js";

/// Outcome of [`ServiceWorkerClient::initialize`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwInit {
    Registered,
    AlreadyRegistered,
    Unsupported,
    Failed,
}

#[derive(Debug, Default)]
struct ClientState {
    initialized: bool,
    update_waiting: bool,
    controlled: bool,
}

/// Client-side handle on the service-worker lifecycle
pub struct ServiceWorkerClient {
    platform: Platform,
    state: Arc<Mutex<ClientState>>,
    mirror_guard: Mutex<Option<ListenerGuard>>,
}

impl ServiceWorkerClient {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            state: Arc::new(Mutex::new(ClientState::default())),
            mirror_guard: Mutex::new(None),
        }
    }

    /// Register the worker script; idempotent
    pub async fn initialize(&self) -> SwInit {
        if !self.platform.sw.is_supported() {
            tracing::warn!("service workers are not supported in this environment");
            return SwInit::Unsupported;
        }
        if self.state.lock().unwrap().initialized {
            return SwInit::AlreadyRegistered;
        }

        match self.platform.sw.register(WORKER_SCRIPT_PATH) {
            Ok(_) => {
                {
                    let mut state = self.state.lock().unwrap();
                    state.initialized = true;
                    state.controlled = self.platform.sw.is_controlled();
                    state.update_waiting = self.platform.sw.has_waiting();
                }
                self.attach_mirror();
                tracing::info!(script = WORKER_SCRIPT_PATH, "service worker client ready");
                SwInit::Registered
            }
            Err(err) => {
                tracing::error!(%err, "service worker registration failed");
                SwInit::Failed
            }
        }
    }

    /// Keep the waiting/controlled mirrors in sync with host events
    fn attach_mirror(&self) {
        let mut slot = self.mirror_guard.lock().unwrap();
        if slot.is_some() {
            return;
        }

        let state = self.state.clone();
        *slot = Some(self.platform.sw.subscribe(move |event| {
            let mut state = state.lock().unwrap();
            match event {
                SwEvent::Waiting => state.update_waiting = true,
                SwEvent::ControllerChange => {
                    state.controlled = true;
                    state.update_waiting = false;
                }
                _ => {}
            }
        }));
    }

    /// Attach update hooks; the guard detaches all three
    pub fn subscribe_to_updates(
        &self,
        mut on_update_found: impl FnMut() + Send + 'static,
        mut on_update_ready: impl FnMut() + Send + 'static,
        mut on_no_update: impl FnMut() + Send + 'static,
    ) -> ListenerGuard {
        if !self.platform.sw.is_supported() {
            return ListenerGuard::detached();
        }

        self.platform.sw.subscribe(move |event| match event {
            SwEvent::UpdateFound => on_update_found(),
            SwEvent::Waiting => on_update_ready(),
            SwEvent::NoUpdate => on_no_update(),
            _ => {}
        })
    }

    /// Whether a new version is installed and waiting to take control
    pub fn has_update_waiting(&self) -> bool {
        self.state.lock().unwrap().update_waiting
    }

    /// Whether the page is controlled by a worker
    pub fn is_controlled(&self) -> bool {
        self.state.lock().unwrap().controlled
    }

    /// Activate the waiting worker and reload the page
    ///
    /// Full page reload; callers surface a confirmation first.
    pub async fn force_update(&self) {
        if !self.platform.sw.is_supported() || !self.state.lock().unwrap().initialized {
            tracing::warn!("force update ignored: no service worker client");
            return;
        }

        self.platform.sw.message_skip_waiting();
        self.platform.window.reload();
    }

    /// Ask the host for a newer worker version; `true` if one is now waiting
    pub async fn check_for_update(&self) -> bool {
        if !self.platform.sw.is_supported() {
            return false;
        }
        self.platform.sw.check_for_update()
    }

    /// Remove every registration
    pub async fn unregister_all(&self) -> bool {
        if !self.platform.sw.is_supported() {
            return false;
        }

        self.platform.sw.unregister_all();
        let mut state = self.state.lock().unwrap();
        state.initialized = false;
        state.update_waiting = false;
        state.controlled = false;
        true
    }

    /// Post a settings message to the active worker
    pub fn send_message(&self, message: &WorkerMessage) -> bool {
        if !self.platform.sw.is_supported() {
            return false;
        }

        let value = match serde_json::to_value(message) {
            Ok(value) => value,
            Err(err) => {
                tracing::error!(%err, "failed to encode worker message");
                return false;
            }
        };

        let delivered = self.platform.sw.post_message_to_active(value);
        if !delivered {
            tracing::warn!("no active service worker to receive message");
        }
        delivered
    }

    /// Detach the internal event mirror
    pub fn teardown(&self) {
        if let Some(guard) = self.mirror_guard.lock().unwrap().take() {
            guard.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn platform() -> Platform {
        Platform::simulated(Utc::now())
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let platform = platform();
        let client = ServiceWorkerClient::new(platform.clone());

        assert_eq!(smol::block_on(client.initialize()), SwInit::Registered);
        assert_eq!(
            smol::block_on(client.initialize()),
            SwInit::AlreadyRegistered
        );
        assert_eq!(platform.sw.get_registrations().len(), 1);
        assert!(client.is_controlled());
    }

    #[test]
    fn test_initialize_unsupported_is_a_noop() {
        let platform = platform();
        platform.sw.set_supported(false);
        let client = ServiceWorkerClient::new(platform.clone());

        assert_eq!(smol::block_on(client.initialize()), SwInit::Unsupported);
        assert!(!client.has_update_waiting());
        assert!(!client.is_controlled());
    }

    #[test]
    fn test_registration_failure_is_caught() {
        let platform = platform();
        platform.sw.fail_next_register();
        let client = ServiceWorkerClient::new(platform.clone());

        assert_eq!(smol::block_on(client.initialize()), SwInit::Failed);
        // A later attempt can still succeed
        assert_eq!(smol::block_on(client.initialize()), SwInit::Registered);
    }

    #[test]
    fn test_waiting_worker_flips_mirror() {
        let platform = platform();
        let client = ServiceWorkerClient::new(platform.clone());
        smol::block_on(client.initialize());
        assert!(!client.has_update_waiting());

        platform.sw.begin_update();
        platform.sw.complete_install();
        assert!(client.has_update_waiting());
    }

    #[test]
    fn test_force_update_skips_waiting_and_reloads_once() {
        let platform = platform();
        let client = ServiceWorkerClient::new(platform.clone());
        smol::block_on(client.initialize());
        platform.sw.begin_update();
        platform.sw.complete_install();

        smol::block_on(client.force_update());

        assert_eq!(platform.window.reload_count(), 1);
        assert!(!client.has_update_waiting());
        let messages = platform.sw.messages();
        assert_eq!(
            messages
                .iter()
                .filter(|m| m["type"] == "SKIP_WAITING")
                .count(),
            1
        );
    }

    #[test]
    fn test_update_subscription_triple() {
        let platform = platform();
        let client = ServiceWorkerClient::new(platform.clone());
        smol::block_on(client.initialize());

        let found = Arc::new(AtomicU32::new(0));
        let ready = Arc::new(AtomicU32::new(0));
        let none = Arc::new(AtomicU32::new(0));
        let (f, r, n) = (found.clone(), ready.clone(), none.clone());

        let guard = client.subscribe_to_updates(
            move || {
                f.fetch_add(1, Ordering::SeqCst);
            },
            move || {
                r.fetch_add(1, Ordering::SeqCst);
            },
            move || {
                n.fetch_add(1, Ordering::SeqCst);
            },
        );

        smol::block_on(client.check_for_update());
        assert_eq!(none.load(Ordering::SeqCst), 1);

        platform.sw.stage_remote_update();
        assert!(smol::block_on(client.check_for_update()));
        assert_eq!(found.load(Ordering::SeqCst), 1);
        assert_eq!(ready.load(Ordering::SeqCst), 1);

        guard.cancel();
        smol::block_on(client.check_for_update());
        assert_eq!(none.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_send_message_requires_active_worker() {
        let platform = platform();
        let client = ServiceWorkerClient::new(platform.clone());

        let message = WorkerMessage::UpdateCacheSettings {
            offline_enabled: false,
        };
        assert!(!client.send_message(&message));

        smol::block_on(client.initialize());
        assert!(client.send_message(&message));
        assert_eq!(
            platform.sw.messages().last().unwrap()["type"],
            "UPDATE_CACHE_SETTINGS"
        );
    }

    #[test]
    fn test_unregister_all_resets_state() {
        let platform = platform();
        let client = ServiceWorkerClient::new(platform.clone());
        smol::block_on(client.initialize());

        assert!(smol::block_on(client.unregister_all()));
        assert!(!client.is_controlled());
        assert_eq!(smol::block_on(client.initialize()), SwInit::Registered);
    }
}

//! Service-worker host
//!
//! Registration container with `installing`/`waiting`/`active` slots, a page
//! controller, update staging, a message outbox, and named caches.
//!
//! ## Lifecycle
//! 1. **Register**: the first worker for a scope installs, activates, and
//!    claims the page
//! 2. **Update**: a new version installs (`UpdateFound`), then waits
//!    (`Waiting`) until told to skip waiting
//! 3. **Skip waiting**: the waiting worker activates and takes control
//!    (`ControllerChange`)

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::listeners::{ListenerGuard, ListenerSet};

/// Service worker lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Installing,
    Installed,
    Activating,
    Activated,
    Redundant,
}

/// A service worker instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerInfo {
    pub id: u64,
    pub script_url: String,
    pub state: WorkerState,
}

/// A registration for one scope
#[derive(Debug, Clone)]
pub struct SwRegistration {
    pub scope: String,
    pub script_url: String,
    pub installing: Option<WorkerInfo>,
    pub waiting: Option<WorkerInfo>,
    pub active: Option<WorkerInfo>,
}

/// Lifecycle events observed by the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwEvent {
    /// A new worker version began installing
    UpdateFound,
    /// The new version is installed and waiting to take control
    Waiting,
    /// An update check found nothing new
    NoUpdate,
    /// A worker finished activating
    Activated,
    /// The page is now controlled by a (new) worker
    ControllerChange,
}

/// Registration failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SwHostError {
    #[error("service workers are not supported")]
    Unsupported,
    #[error("registration failed: {0}")]
    Registration(String),
}

#[derive(Debug)]
struct SwInner {
    supported: bool,
    registrations: HashMap<String, SwRegistration>,
    controller: Option<WorkerInfo>,
    staged_update: bool,
    messages: Vec<serde_json::Value>,
    caches: Vec<String>,
    next_id: u64,
    fail_next_register: bool,
}

/// Shared service-worker-host handle
#[derive(Clone)]
pub struct ServiceWorkerHost {
    inner: Arc<Mutex<SwInner>>,
    events: ListenerSet<SwEvent>,
}

impl Default for ServiceWorkerHost {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceWorkerHost {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SwInner {
                supported: true,
                registrations: HashMap::new(),
                controller: None,
                staged_update: false,
                messages: Vec::new(),
                caches: Vec::new(),
                next_id: 1,
                fail_next_register: false,
            })),
            events: ListenerSet::new(),
        }
    }

    /// Whether the serviceWorker API exists in this environment
    pub fn is_supported(&self) -> bool {
        self.inner.lock().unwrap().supported
    }

    pub fn set_supported(&self, supported: bool) {
        self.inner.lock().unwrap().supported = supported;
    }

    /// Make the next `register` call fail (environment setup)
    pub fn fail_next_register(&self) {
        self.inner.lock().unwrap().fail_next_register = true;
    }

    /// Subscribe to lifecycle events
    pub fn subscribe(&self, callback: impl FnMut(&SwEvent) + Send + 'static) -> ListenerGuard {
        self.events.subscribe(callback)
    }

    /// Register a worker script; reuses an existing registration for the
    /// same scope
    ///
    /// The first worker for a scope installs, activates, and claims the
    /// page, so the page is controlled from registration onward.
    pub fn register(&self, script_url: &str) -> Result<SwRegistration, SwHostError> {
        let registration = {
            let mut inner = self.inner.lock().unwrap();
            if !inner.supported {
                return Err(SwHostError::Unsupported);
            }
            if inner.fail_next_register {
                inner.fail_next_register = false;
                return Err(SwHostError::Registration(format!(
                    "failed to fetch {script_url}"
                )));
            }

            let scope = default_scope(script_url);
            if let Some(existing) = inner.registrations.get(&scope) {
                return Ok(existing.clone());
            }

            let id = inner.next_id;
            inner.next_id += 1;
            let worker = WorkerInfo {
                id,
                script_url: script_url.to_string(),
                state: WorkerState::Activated,
            };
            let registration = SwRegistration {
                scope: scope.clone(),
                script_url: script_url.to_string(),
                installing: None,
                waiting: None,
                active: Some(worker.clone()),
            };
            inner.registrations.insert(scope, registration.clone());
            inner.controller = Some(worker);
            tracing::info!(script = script_url, "service worker registered");
            registration
        };

        self.events.emit(&SwEvent::ControllerChange);
        Ok(registration)
    }

    /// Registration for the scope covering `url`, longest scope wins
    pub fn get_registration(&self, url: &str) -> Option<SwRegistration> {
        let inner = self.inner.lock().unwrap();
        inner
            .registrations
            .values()
            .filter(|reg| url.starts_with(&reg.scope))
            .max_by_key(|reg| reg.scope.len())
            .cloned()
    }

    /// All registrations
    pub fn get_registrations(&self) -> Vec<SwRegistration> {
        self.inner.lock().unwrap().registrations.values().cloned().collect()
    }

    /// Worker currently controlling the page
    pub fn controller(&self) -> Option<WorkerInfo> {
        self.inner.lock().unwrap().controller.clone()
    }

    pub fn is_controlled(&self) -> bool {
        self.inner.lock().unwrap().controller.is_some()
    }

    /// Whether any registration has a waiting worker
    pub fn has_waiting(&self) -> bool {
        self.inner
            .lock()
            .unwrap()
            .registrations
            .values()
            .any(|reg| reg.waiting.is_some())
    }

    /// A new worker version begins installing
    pub fn begin_update(&self) {
        let started = {
            let mut guard = self.inner.lock().unwrap();
            let inner = &mut *guard;
            let id = inner.next_id;
            if let Some(reg) = inner.registrations.values_mut().next() {
                reg.installing = Some(WorkerInfo {
                    id,
                    script_url: reg.script_url.clone(),
                    state: WorkerState::Installing,
                });
                inner.next_id += 1;
                true
            } else {
                false
            }
        };
        if started {
            self.events.emit(&SwEvent::UpdateFound);
        }
    }

    /// The installing worker finishes installing and starts waiting
    pub fn complete_install(&self) {
        let installed = {
            let mut inner = self.inner.lock().unwrap();
            let installing = inner
                .registrations
                .values_mut()
                .find_map(|reg| reg.installing.take().map(|w| (reg, w)));
            if let Some((reg, mut worker)) = installing {
                worker.state = WorkerState::Installed;
                reg.waiting = Some(worker);
                true
            } else {
                false
            }
        };
        if installed {
            self.events.emit(&SwEvent::Waiting);
        }
    }

    /// Stage a new version on the "server" for the next update check
    pub fn stage_remote_update(&self) {
        self.inner.lock().unwrap().staged_update = true;
    }

    /// Check for a newer version; emits `Waiting` or `NoUpdate`
    pub fn check_for_update(&self) -> bool {
        let staged = {
            let mut inner = self.inner.lock().unwrap();
            let staged = inner.staged_update && !inner.registrations.is_empty();
            inner.staged_update = false;
            staged
        };

        if staged {
            self.begin_update();
            self.complete_install();
            true
        } else {
            self.events.emit(&SwEvent::NoUpdate);
            false
        }
    }

    /// Tell the waiting worker to activate and take control
    pub fn message_skip_waiting(&self) {
        {
            let mut guard = self.inner.lock().unwrap();
            let inner = &mut *guard;
            inner
                .messages
                .push(serde_json::json!({ "type": "SKIP_WAITING" }));

            let waiting = inner
                .registrations
                .values_mut()
                .find_map(|reg| reg.waiting.take().map(|w| (reg, w)));
            let Some((reg, mut worker)) = waiting else {
                tracing::warn!("skip-waiting message with no waiting worker");
                return;
            };

            worker.state = WorkerState::Activated;
            if let Some(old) = reg.active.replace(worker.clone()) {
                tracing::debug!(old_id = old.id, new_id = worker.id, "worker replaced");
            }
            inner.controller = Some(worker);
        }
        self.events.emit(&SwEvent::Activated);
        self.events.emit(&SwEvent::ControllerChange);
    }

    /// Post a message to the active worker; `false` when there is none
    pub fn post_message_to_active(&self, message: serde_json::Value) -> bool {
        let mut inner = self.inner.lock().unwrap();
        let has_active = inner
            .registrations
            .values()
            .any(|reg| reg.active.is_some());
        if !has_active {
            return false;
        }
        inner.messages.push(message);
        true
    }

    /// Messages posted so far, oldest first
    pub fn messages(&self) -> Vec<serde_json::Value> {
        self.inner.lock().unwrap().messages.clone()
    }

    /// Remove every registration and release the controller
    pub fn unregister_all(&self) -> bool {
        let mut inner = self.inner.lock().unwrap();
        let had_any = !inner.registrations.is_empty();
        inner.registrations.clear();
        inner.controller = None;
        had_any
    }

    /// Open (create) a named cache
    pub fn open_cache(&self, name: &str) {
        let mut inner = self.inner.lock().unwrap();
        if !inner.caches.iter().any(|n| n == name) {
            inner.caches.push(name.to_string());
        }
    }

    /// Names of existing caches
    pub fn cache_names(&self) -> Vec<String> {
        self.inner.lock().unwrap().caches.clone()
    }

    /// Delete one cache; `true` if it existed
    pub fn delete_cache(&self, name: &str) -> bool {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.caches.len();
        inner.caches.retain(|n| n != name);
        inner.caches.len() != before
    }
}

fn default_scope(script_url: &str) -> String {
    match script_url.rfind('/') {
        Some(pos) => script_url[..=pos].to_string(),
        None => "/".to_string(),
    }
}

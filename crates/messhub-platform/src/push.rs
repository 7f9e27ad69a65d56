//! Push host
//!
//! Push subscription slot behind the service-worker registration. Subscribe
//! is idempotent; the subscription carries an opaque endpoint and key
//! material for the delivery server.

use std::sync::{Arc, Mutex};

use serde::Serialize;

/// Push subscription key material
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PushSubscriptionKeys {
    pub p256dh: String,
    pub auth: String,
}

/// An active push subscription
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PushSubscription {
    pub endpoint: String,
    pub expiration_time: Option<u64>,
    pub keys: PushSubscriptionKeys,
}

#[derive(Debug)]
struct PushInner {
    supported: bool,
    subscription: Option<PushSubscription>,
    next_id: u64,
}

/// Shared push-host handle
#[derive(Debug, Clone)]
pub struct PushHost {
    inner: Arc<Mutex<PushInner>>,
}

impl Default for PushHost {
    fn default() -> Self {
        Self::new()
    }
}

impl PushHost {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(PushInner {
                supported: true,
                subscription: None,
                next_id: 1,
            })),
        }
    }

    /// Whether the PushManager API exists in this environment
    pub fn is_supported(&self) -> bool {
        self.inner.lock().unwrap().supported
    }

    pub fn set_supported(&self, supported: bool) {
        self.inner.lock().unwrap().supported = supported;
    }

    /// Create a subscription, or return the existing one
    pub async fn subscribe(&self, application_server_key: &[u8]) -> Option<PushSubscription> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.supported {
            return None;
        }
        if application_server_key.is_empty() {
            tracing::warn!("push subscribe rejected: empty application server key");
            return None;
        }

        if let Some(existing) = &inner.subscription {
            return Some(existing.clone());
        }

        let id = inner.next_id;
        inner.next_id += 1;
        let subscription = PushSubscription {
            endpoint: format!("https://push.messhub.app/sub/{id}"),
            expiration_time: None,
            keys: PushSubscriptionKeys {
                p256dh: format!("p256dh-{id}"),
                auth: format!("auth-{id}"),
            },
        };
        inner.subscription = Some(subscription.clone());
        tracing::debug!(endpoint = %subscription.endpoint, "push subscription created");
        Some(subscription)
    }

    /// Current subscription, if any
    pub fn get_subscription(&self) -> Option<PushSubscription> {
        self.inner.lock().unwrap().subscription.clone()
    }

    /// Drop the current subscription; `true` if one was removed
    pub async fn unsubscribe(&self) -> bool {
        self.inner.lock().unwrap().subscription.take().is_some()
    }
}

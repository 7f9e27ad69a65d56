//! Listener plumbing
//!
//! Subscription registry used by every event-emitting platform surface.
//! Callbacks fire in registration order; cancellation is explicit and
//! idempotent.

use std::sync::{Arc, Mutex, Weak};

type Callback<E> = Arc<Mutex<Box<dyn FnMut(&E) + Send>>>;

/// A set of subscribed callbacks for one event feed
pub struct ListenerSet<E> {
    inner: Arc<Mutex<ListenerSetInner<E>>>,
}

struct ListenerSetInner<E> {
    listeners: Vec<(u64, Callback<E>)>,
    next_id: u64,
}

impl<E> Default for ListenerSet<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for ListenerSet<E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<E> ListenerSet<E> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(ListenerSetInner {
                listeners: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Attach a callback; the returned guard detaches it
    pub fn subscribe(&self, callback: impl FnMut(&E) + Send + 'static) -> ListenerGuard
    where
        E: 'static,
    {
        let id = {
            let mut inner = self.inner.lock().unwrap();
            let id = inner.next_id;
            inner.next_id += 1;
            inner
                .listeners
                .push((id, Arc::new(Mutex::new(Box::new(callback)))));
            id
        };

        let weak: Weak<Mutex<ListenerSetInner<E>>> = Arc::downgrade(&self.inner);
        ListenerGuard::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner
                    .lock()
                    .unwrap()
                    .listeners
                    .retain(|(lid, _)| *lid != id);
            }
        })
    }

    /// Invoke every attached callback, in registration order
    ///
    /// The registry lock is released before any callback runs, so listeners
    /// may subscribe or cancel re-entrantly.
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<Callback<E>> = {
            let inner = self.inner.lock().unwrap();
            inner.listeners.iter().map(|(_, cb)| cb.clone()).collect()
        };

        for callback in snapshot {
            let mut callback = callback.lock().unwrap();
            (*callback)(event);
        }
    }

    /// Number of currently attached callbacks
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Detaches a subscription when cancelled
///
/// Dropping the guard without calling [`ListenerGuard::cancel`] leaves the
/// listener attached, mirroring a lost unsubscribe function.
pub struct ListenerGuard {
    detach: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl ListenerGuard {
    fn new(detach: impl FnOnce() + Send + 'static) -> Self {
        Self {
            detach: Mutex::new(Some(Box::new(detach))),
        }
    }

    /// A guard with nothing to detach
    pub fn detached() -> Self {
        Self {
            detach: Mutex::new(None),
        }
    }

    /// Detach the listener; calling again is a no-op
    pub fn cancel(&self) {
        if let Some(detach) = self.detach.lock().unwrap().take() {
            detach();
        }
    }

    /// Whether the subscription is still attached
    pub fn is_active(&self) -> bool {
        self.detach.lock().unwrap().is_some()
    }
}

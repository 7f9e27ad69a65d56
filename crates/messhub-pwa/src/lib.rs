//! MessHub PWA core
//!
//! The lifecycle machinery behind the MessHub shell's install, update, and
//! notification behavior:
//!
//! - [`sw::ServiceWorkerClient`]: worker registration and the
//!   update-found / update-ready / controlling lifecycle
//! - [`notify::NotificationService`]: permission flow, push subscription,
//!   local notification display
//! - [`coordinator::PwaCoordinator`]: installability and standalone state
//!   for the whole app, with the one-shot install trigger
//! - [`ui`]: headless view-models for the install, notification, status,
//!   and settings widgets
//!
//! Platform capabilities arrive by injection as a
//! [`messhub_platform::Platform`]; nothing here reaches for ambient state.

pub mod coordinator;
pub mod notify;
pub mod records;
pub mod settings;
pub mod sw;
pub mod ui;

pub use coordinator::{PwaCoordinator, PwaSnapshot};
pub use notify::{
    LoggingEndpoint, NotificationService, NotifyError, PushEndpoint, Support, VAPID_PUBLIC_KEY,
};
pub use settings::{PwaSettings, WorkerMessage, SETTINGS_KEY};
pub use sw::{ServiceWorkerClient, SwInit, WORKER_SCRIPT_PATH};

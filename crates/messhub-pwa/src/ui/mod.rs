//! Presentation widgets
//!
//! Headless view-models over the PWA core: each computes what its widget
//! should render and exposes the actions the rendered controls issue.

mod install_prompt;
mod notification_prompt;
mod settings_panel;
mod status;

pub use install_prompt::{InstallPrompt, InstallPromptView};
pub use notification_prompt::NotificationPrompt;
pub use settings_panel::{NotificationToggle, SettingsPanel, REVOKE_HELP};
pub use status::{InstallStatus, NotificationStatus, PwaStatusPanel, UpdateStatus};

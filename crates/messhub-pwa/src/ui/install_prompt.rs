//! Install prompt banner
//!
//! Offers the native install action when a trigger is captured, or the
//! add-to-home-screen instructions on iOS. Never renders in standalone
//! mode; iOS dismissals are remembered for 14 days.

use std::sync::{Arc, Mutex};

use messhub_platform::Platform;

use crate::coordinator::PwaCoordinator;
use crate::records;

pub const TITLE: &str = "Install MessHub";
pub const NATIVE_BODY: &str = "Install MessHub for a better experience";
pub const IOS_BODY: &str = "To install, tap the share icon and select \"Add to Home Screen\"";

/// What the banner should currently render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallPromptView {
    Hidden,
    /// Banner with the Install Now action
    Native,
    /// Instructions only; installing is a manual gesture on iOS
    IosInstructions,
}

pub struct InstallPrompt {
    coordinator: Arc<PwaCoordinator>,
    platform: Platform,
    dismissed: Mutex<bool>,
}

impl InstallPrompt {
    pub fn new(coordinator: Arc<PwaCoordinator>) -> Self {
        let platform = coordinator.platform().clone();
        Self {
            coordinator,
            platform,
            dismissed: Mutex::new(false),
        }
    }

    pub fn view(&self) -> InstallPromptView {
        let snapshot = self.coordinator.snapshot();
        if snapshot.is_standalone || *self.dismissed.lock().unwrap() {
            return InstallPromptView::Hidden;
        }

        if self.platform.window.is_ios() {
            if records::ios_prompt_suppressed(&self.platform.storage, &self.platform.clock) {
                return InstallPromptView::Hidden;
            }
            return InstallPromptView::IosInstructions;
        }

        if snapshot.should_offer_install() {
            InstallPromptView::Native
        } else {
            InstallPromptView::Hidden
        }
    }

    /// The Install Now action
    pub async fn install(&self) -> bool {
        let installed = self.coordinator.show_install_prompt().await;
        if installed {
            tracing::info!("app was installed");
        }
        installed
    }

    /// Close the banner; on iOS this suppresses it for 14 days
    pub fn dismiss(&self) {
        if self.view() == InstallPromptView::IosInstructions {
            records::record_ios_dismissal(&self.platform.storage, &self.platform.clock);
        }
        *self.dismissed.lock().unwrap() = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use messhub_platform::window::IOS_USER_AGENT;
    use messhub_platform::{DisplayMode, InstallChoice};

    fn prompt_over(platform: &Platform) -> InstallPrompt {
        InstallPrompt::new(Arc::new(PwaCoordinator::initialize(platform.clone())))
    }

    #[test]
    fn test_fresh_environment_install_flow() {
        let platform = Platform::simulated(Utc::now());
        let prompt = prompt_over(&platform);
        assert_eq!(prompt.view(), InstallPromptView::Hidden);

        platform.install.emit(InstallChoice::Accepted);
        assert_eq!(prompt.view(), InstallPromptView::Native);

        assert!(smol::block_on(prompt.install()));
        // Trigger consumed: nothing to offer until a new signal
        assert_eq!(prompt.view(), InstallPromptView::Hidden);
        assert!(!smol::block_on(prompt.install()));
    }

    #[test]
    fn test_standalone_never_shows_install_ui() {
        let platform = Platform::simulated(Utc::now());
        let prompt = prompt_over(&platform);

        platform.install.emit(InstallChoice::Accepted);
        platform.display.set_mode(DisplayMode::Standalone);
        assert_eq!(prompt.view(), InstallPromptView::Hidden);

        // Same on iOS
        platform.window.set_user_agent(IOS_USER_AGENT);
        assert_eq!(prompt.view(), InstallPromptView::Hidden);
    }

    #[test]
    fn test_ios_dismissal_suppresses_for_fourteen_days() {
        let platform = Platform::simulated(Utc::now());
        platform.window.set_user_agent(IOS_USER_AGENT);

        let prompt = prompt_over(&platform);
        assert_eq!(prompt.view(), InstallPromptView::IosInstructions);

        prompt.dismiss();
        assert_eq!(prompt.view(), InstallPromptView::Hidden);

        // A fresh widget (new page load) still honors the stored record
        let reloaded = prompt_over(&platform);
        assert_eq!(reloaded.view(), InstallPromptView::Hidden);

        platform.clock.advance(Duration::days(15));
        assert_eq!(reloaded.view(), InstallPromptView::IosInstructions);
    }

    #[test]
    fn test_dismiss_hides_native_banner_without_record() {
        let platform = Platform::simulated(Utc::now());
        let coordinator = Arc::new(PwaCoordinator::initialize(platform.clone()));
        let prompt = InstallPrompt::new(coordinator.clone());
        platform.install.emit(InstallChoice::Accepted);

        prompt.dismiss();
        assert_eq!(prompt.view(), InstallPromptView::Hidden);

        // Non-iOS dismissal is session-local: no stored record, so a new
        // page load with a fresh signal shows the banner again
        coordinator.teardown();
        let reloaded = prompt_over(&platform);
        platform.install.emit(InstallChoice::Accepted);
        assert_eq!(reloaded.view(), InstallPromptView::Native);
    }
}

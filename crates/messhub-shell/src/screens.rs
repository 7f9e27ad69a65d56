//! Screen routing
//!
//! The authentication flow state machine and the role-gated dashboard
//! selection. Screens themselves are rendered elsewhere; this decides
//! which one is active and what flow state it carries.

use crate::auth::AuthSession;
use crate::roles::{can_access_role, UserRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthScreen {
    #[default]
    Welcome,
    Login,
    Register,
    ForgotPassword,
    OtpVerification,
    ResetPassword,
    Success,
}

/// State accumulated while moving through the auth flow
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthFlowState {
    pub email: Option<String>,
    pub otp: Option<String>,
    pub role: Option<UserRole>,
    pub reset_flow: bool,
    pub reset_success: bool,
    pub message: Option<String>,
}

/// Partial update merged into the flow state on navigation
#[derive(Debug, Clone, Default)]
pub struct AuthFlowPatch {
    pub email: Option<String>,
    pub otp: Option<String>,
    pub role: Option<UserRole>,
    pub reset_flow: Option<bool>,
    pub reset_success: Option<bool>,
    pub message: Option<String>,
}

/// The unauthenticated navigation state machine
#[derive(Debug, Default)]
pub struct AuthFlow {
    screen: AuthScreen,
    state: AuthFlowState,
}

impl AuthFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> AuthScreen {
        self.screen
    }

    pub fn state(&self) -> &AuthFlowState {
        &self.state
    }

    /// Move to a screen, merging any carried state
    pub fn navigate(&mut self, screen: AuthScreen, patch: AuthFlowPatch) {
        self.screen = screen;
        if let Some(email) = patch.email {
            self.state.email = Some(email);
        }
        if let Some(otp) = patch.otp {
            self.state.otp = Some(otp);
        }
        if let Some(role) = patch.role {
            self.state.role = Some(role);
        }
        if let Some(reset_flow) = patch.reset_flow {
            self.state.reset_flow = reset_flow;
        }
        if let Some(reset_success) = patch.reset_success {
            self.state.reset_success = reset_success;
        }
        if let Some(message) = patch.message {
            self.state.message = Some(message);
        }
    }
}

/// Role-gated dashboards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dashboard {
    User,
    MessOwner,
    Admin,
}

impl Dashboard {
    /// The role a dashboard is gated at
    pub fn required_role(&self) -> UserRole {
        match self {
            Dashboard::User => UserRole::User,
            Dashboard::MessOwner => UserRole::MessOwner,
            Dashboard::Admin => UserRole::ProjectAdmin,
        }
    }

    pub fn for_role(role: UserRole) -> Self {
        match role {
            UserRole::User => Dashboard::User,
            UserRole::MessOwner => Dashboard::MessOwner,
            UserRole::ProjectAdmin => Dashboard::Admin,
        }
    }
}

/// Where the app currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Auth(AuthScreen),
    Dashboard(Dashboard),
}

/// Resolve the active route for the session
pub fn route(session: &AuthSession, flow: &AuthFlow) -> Route {
    match session.current_user() {
        Some(user) => {
            let dashboard = Dashboard::for_role(user.role);
            // The gate cannot fail for the user's own dashboard, but keep
            // the check: routing must never outrank the session
            if can_access_role(user.role, dashboard.required_role()) {
                Route::Dashboard(dashboard)
            } else {
                Route::Auth(AuthScreen::Welcome)
            }
        }
        None => Route::Auth(flow.screen()),
    }
}

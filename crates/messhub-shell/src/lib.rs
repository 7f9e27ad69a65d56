//! MessHub application shell
//!
//! The client-side shell of the MessHub mess-management app: mock
//! authentication, role-gated screen routing, and the wiring that hangs
//! the PWA core off a platform.
//!
//! # Features
//! - Mock auth with a storage-persisted session via [`auth::AuthSession`]
//! - Role hierarchy and permissions via [`roles`]
//! - Auth-flow and dashboard routing via [`screens`]
//! - One composition root with a full teardown via [`shell::AppShell`]

pub mod auth;
pub mod roles;
pub mod screens;
pub mod shell;

pub use auth::{AuthSession, User, UserUpdate, SESSION_KEY};
pub use roles::{can_access_role, has_permission, UserRole};
pub use screens::{AuthFlow, AuthFlowPatch, AuthFlowState, AuthScreen, Dashboard, Route};
pub use shell::AppShell;

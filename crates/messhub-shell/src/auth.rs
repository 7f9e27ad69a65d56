//! Mock authentication
//!
//! In-memory user directory with a session persisted in local storage.
//! There is no backend; any known email with a long-enough password
//! signs in.

use std::sync::Mutex;

use messhub_platform::{Clock, LocalStorage};
use serde::{Deserialize, Serialize};

use crate::roles::UserRole;

/// Local-storage key holding the signed-in user
pub const SESSION_KEY: &str = "user";

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
}

/// Profile fields a signed-in user may change
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
}

fn mock_directory() -> Vec<User> {
    vec![
        User {
            id: "1".into(),
            name: "John Doe".into(),
            email: "user@example.com".into(),
            role: UserRole::User,
            avatar: None,
            created_at: "2024-01-15".into(),
            last_login: Some("2024-01-20".into()),
        },
        User {
            id: "2".into(),
            name: "Sarah Kitchen".into(),
            email: "owner@example.com".into(),
            role: UserRole::MessOwner,
            avatar: None,
            created_at: "2024-01-10".into(),
            last_login: Some("2024-01-20".into()),
        },
        User {
            id: "3".into(),
            name: "Admin User".into(),
            email: "admin@example.com".into(),
            role: UserRole::ProjectAdmin,
            avatar: None,
            created_at: "2024-01-01".into(),
            last_login: Some("2024-01-20".into()),
        },
    ]
}

pub struct AuthSession {
    storage: LocalStorage,
    clock: Clock,
    user: Mutex<Option<User>>,
}

impl AuthSession {
    /// Restore any stored session
    pub fn new(storage: LocalStorage, clock: Clock) -> Self {
        let user = storage
            .get_item(SESSION_KEY)
            .ok()
            .flatten()
            .and_then(|raw| match serde_json::from_str(&raw) {
                Ok(user) => Some(user),
                Err(err) => {
                    tracing::warn!(%err, "discarding unreadable stored session");
                    None
                }
            });

        if user.is_some() {
            tracing::info!("session restored from storage");
        }

        Self {
            storage,
            clock,
            user: Mutex::new(user),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.lock().unwrap().is_some()
    }

    pub fn current_user(&self) -> Option<User> {
        self.user.lock().unwrap().clone()
    }

    /// Sign in against the mock directory
    pub async fn login(&self, email: &str, password: &str) -> bool {
        let Some(mut user) = mock_directory().into_iter().find(|u| u.email == email) else {
            return false;
        };
        if password.len() < MIN_PASSWORD_LEN {
            return false;
        }

        user.last_login = Some(self.clock.now().format("%Y-%m-%d").to_string());
        self.persist(&user);
        tracing::info!(email, role = user.role.display_name(), "signed in");
        *self.user.lock().unwrap() = Some(user);
        true
    }

    pub fn logout(&self) {
        *self.user.lock().unwrap() = None;
        if self.storage.remove_item(SESSION_KEY).is_err() {
            tracing::debug!("storage unavailable, stored session not cleared");
        }
        tracing::info!("signed out");
    }

    /// Merge profile changes into the signed-in user
    pub fn update_user(&self, update: UserUpdate) -> bool {
        let mut slot = self.user.lock().unwrap();
        let Some(user) = slot.as_mut() else {
            return false;
        };

        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(avatar) = update.avatar {
            user.avatar = Some(avatar);
        }

        let user = user.clone();
        drop(slot);
        self.persist(&user);
        true
    }

    fn persist(&self, user: &User) {
        let raw = match serde_json::to_string(user) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::error!(%err, "failed to encode session");
                return;
            }
        };
        if self.storage.set_item(SESSION_KEY, &raw).is_err() {
            tracing::debug!("storage unavailable, session not persisted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> (LocalStorage, Clock) {
        (
            LocalStorage::new(),
            Clock::fixed("2026-02-01T12:00:00Z".parse().unwrap()),
        )
    }

    #[test]
    fn test_login_known_email_and_password_length() {
        let (storage, clock) = env();
        let auth = AuthSession::new(storage.clone(), clock);

        assert!(!smol::block_on(auth.login("nobody@example.com", "secret1")));
        assert!(!smol::block_on(auth.login("user@example.com", "short")));
        assert!(smol::block_on(auth.login("user@example.com", "secret1")));

        let user = auth.current_user().unwrap();
        assert_eq!(user.role, UserRole::User);
        assert_eq!(user.last_login.as_deref(), Some("2026-02-01"));
        assert!(storage.get_item(SESSION_KEY).unwrap().is_some());
    }

    #[test]
    fn test_session_restores_across_instances() {
        let (storage, clock) = env();
        {
            let auth = AuthSession::new(storage.clone(), clock.clone());
            assert!(smol::block_on(auth.login("owner@example.com", "secret1")));
        }

        let restored = AuthSession::new(storage.clone(), clock.clone());
        assert!(restored.is_authenticated());
        assert_eq!(
            restored.current_user().unwrap().role,
            UserRole::MessOwner
        );

        restored.logout();
        assert!(storage.get_item(SESSION_KEY).unwrap().is_none());
        let after_logout = AuthSession::new(storage, clock);
        assert!(!after_logout.is_authenticated());
    }

    #[test]
    fn test_update_user_merges_and_persists() {
        let (storage, clock) = env();
        let auth = AuthSession::new(storage.clone(), clock);

        assert!(!auth.update_user(UserUpdate::default()));

        smol::block_on(auth.login("user@example.com", "secret1"));
        assert!(auth.update_user(UserUpdate {
            name: Some("John D.".into()),
            avatar: Some("/avatars/john.png".into()),
            ..UserUpdate::default()
        }));

        let user = auth.current_user().unwrap();
        assert_eq!(user.name, "John D.");
        assert_eq!(user.email, "user@example.com");
        assert_eq!(user.avatar.as_deref(), Some("/avatars/john.png"));

        let raw = storage.get_item(SESSION_KEY).unwrap().unwrap();
        assert!(raw.contains("John D."));
    }

    #[test]
    fn test_unavailable_storage_is_not_fatal() {
        let (storage, clock) = env();
        storage.set_available(false);

        let auth = AuthSession::new(storage, clock);
        assert!(smol::block_on(auth.login("user@example.com", "secret1")));
        assert!(auth.is_authenticated());
        auth.logout();
        assert!(!auth.is_authenticated());
    }
}

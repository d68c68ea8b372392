#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Explicit dashboard session lifecycle.
//!
//! Sessions are issued at login against configured mock accounts,
//! carried as an explicit object with an expiry, and cleared at logout.
//! This is deliberately not a security model (credentials are a
//! configured allow-list, not verified identities), but the lifecycle is
//! real: an expired session reads back as absent everywhere.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use uuid::Uuid;

/// Errors from session operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The email/password pair matched no configured account.
    #[error("invalid credentials")]
    InvalidCredentials,
}

/// A configured mock account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Login email.
    pub email: String,
    /// Login password (plain text, mock accounts only).
    pub password: String,
}

/// An issued dashboard session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Unique session ID.
    pub id: Uuid,
    /// Account email.
    pub email: String,
    /// Display name, derived from the email local part.
    pub name: String,
    /// When the session was issued.
    pub issued_at: DateTime<Utc>,
    /// When the session stops being valid.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session has expired as of `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Issues, validates, and clears the single active dashboard session.
pub struct SessionManager {
    ttl: Duration,
    accounts: Vec<Account>,
    current: Mutex<Option<Session>>,
}

impl SessionManager {
    /// Creates a manager issuing sessions valid for `ttl_minutes`.
    #[must_use]
    pub fn new(ttl_minutes: i64, accounts: Vec<Account>) -> Self {
        Self {
            ttl: Duration::minutes(ttl_minutes),
            accounts,
            current: Mutex::new(None),
        }
    }

    /// Verifies the credentials and issues a fresh session, replacing
    /// any existing one.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] when the pair matches no
    /// configured account.
    ///
    /// # Panics
    ///
    /// Panics if the session mutex is poisoned.
    pub fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let account = self
            .accounts
            .iter()
            .find(|account| account.email == email && account.password == password)
            .ok_or(AuthError::InvalidCredentials)?;

        let issued_at = Utc::now();
        let name = account
            .email
            .split('@')
            .next()
            .unwrap_or(account.email.as_str())
            .to_string();

        let session = Session {
            id: Uuid::new_v4(),
            email: account.email.clone(),
            name,
            issued_at,
            expires_at: issued_at + self.ttl,
        };

        *self.current.lock().expect("session mutex poisoned") = Some(session.clone());
        Ok(session)
    }

    /// Returns the active session, or `None` when there is none or it
    /// has expired (expired sessions are cleared on read).
    ///
    /// # Panics
    ///
    /// Panics if the session mutex is poisoned.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        let mut slot = self.current.lock().expect("session mutex poisoned");
        match slot.as_ref() {
            Some(session) if session.is_expired_at(Utc::now()) => {
                *slot = None;
                None
            }
            other => other.cloned(),
        }
    }

    /// Clears the active session, if any.
    ///
    /// # Panics
    ///
    /// Panics if the session mutex is poisoned.
    pub fn logout(&self) {
        *self.current.lock().expect("session mutex poisoned") = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(ttl_minutes: i64) -> SessionManager {
        SessionManager::new(
            ttl_minutes,
            vec![Account {
                email: "ranger@wildguard.dev".to_string(),
                password: "letmein".to_string(),
            }],
        )
    }

    #[test]
    fn login_issues_session_with_derived_name() {
        let sessions = manager(30);
        let session = sessions.login("ranger@wildguard.dev", "letmein").unwrap();
        assert_eq!(session.name, "ranger");
        assert_eq!(session.expires_at - session.issued_at, Duration::minutes(30));
        assert_eq!(sessions.current().unwrap().id, session.id);
    }

    #[test]
    fn wrong_credentials_are_rejected() {
        let sessions = manager(30);
        assert!(matches!(
            sessions.login("ranger@wildguard.dev", "nope"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            sessions.login("intruder@wildguard.dev", "letmein"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(sessions.current().is_none());
    }

    #[test]
    fn logout_clears_session() {
        let sessions = manager(30);
        sessions.login("ranger@wildguard.dev", "letmein").unwrap();
        sessions.logout();
        assert!(sessions.current().is_none());
    }

    #[test]
    fn expired_session_reads_as_absent() {
        let sessions = manager(0);
        sessions.login("ranger@wildguard.dev", "letmein").unwrap();
        assert!(sessions.current().is_none());
        // Reading an expired session clears it for good.
        assert!(sessions.current().is_none());
    }

    #[test]
    fn relogin_replaces_session() {
        let sessions = manager(30);
        let first = sessions.login("ranger@wildguard.dev", "letmein").unwrap();
        let second = sessions.login("ranger@wildguard.dev", "letmein").unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(sessions.current().unwrap().id, second.id);
    }
}

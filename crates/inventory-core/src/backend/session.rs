//! Session Types
//!
//! Signed-in principal, tokens and where they are kept between page loads.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Seconds before expiry at which a token is treated as expired
const EXPIRY_MARGIN_SECS: i64 = 30;

/// Email and password for a password sign-in
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Authenticated principal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Tokens of a signed-in session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Unix seconds
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: SessionUser,
}

impl Session {
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at
            .is_some_and(|expires_at| now >= expires_at - EXPIRY_MARGIN_SECS)
    }
}

/// Persistence for the current session (browser storage in the web app)
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Option<Session>;

    /// Store the session, or forget it when `None`
    fn save(&self, session: Option<&Session>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials::new("ops@example.com", "hunter2");
        let printed = format!("{creds:?}");
        assert!(printed.contains("ops@example.com"));
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn test_expiry_margin() {
        let session = Session {
            access_token: "t".to_string(),
            refresh_token: None,
            expires_at: Some(1_000),
            user: SessionUser { id: "u1".to_string(), email: None },
        };
        assert!(!session.is_expired(900));
        assert!(session.is_expired(980));
        assert!(!Session { expires_at: None, ..session }.is_expired(i64::MAX));
    }
}

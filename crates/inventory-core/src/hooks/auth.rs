//! Auth Hook
//!
//! Signed-in email and admin flag of the current session. The admin flag
//! comes from the role table; any failure there leaves the session
//! without admin rights.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::cell::StateCell;
use super::prompt::{CredentialField, CredentialPrompt};
use crate::backend::{AuthBackend, Credentials};
use crate::domain::{DomainError, DomainResult};

/// The only role value granting write access
pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    email: Option<String>,
    is_admin: bool,
    /// Session check or sign-in in flight
    checking: bool,
    error: Option<String>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthState {
    /// Unknown session, check pending
    pub fn new() -> Self {
        Self {
            email: None,
            is_admin: false,
            checking: true,
            error: None,
        }
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn is_checking(&self) -> bool {
        self.checking
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Admin with a known email: may add, edit and delete
    pub fn can_manage(&self) -> bool {
        self.is_admin && self.email.is_some()
    }

    fn signed_in(&mut self, email: String, is_admin: bool) {
        self.email = Some(email);
        self.is_admin = is_admin;
        self.checking = false;
        self.error = None;
    }

    fn signed_out(&mut self) {
        self.email = None;
        self.is_admin = false;
        self.checking = false;
    }
}

/// Session operations over the auth state
pub struct AuthHook<S, B: ?Sized> {
    state: S,
    backend: Arc<B>,
}

impl<S: Clone, B: ?Sized> Clone for AuthHook<S, B> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<S, B> AuthHook<S, B>
where
    S: StateCell<AuthState>,
    B: AuthBackend + ?Sized,
{
    pub fn new(state: S, backend: Arc<B>) -> Self {
        Self { state, backend }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn dismiss_error(&self) {
        self.state.update_state(|s| s.error = None);
    }

    /// Whether `email` holds the admin role. Lookup failures mean no.
    async fn lookup_admin(&self, email: &str) -> bool {
        match self.backend.role_for(email).await {
            Ok(role) => {
                debug!(%email, ?role, "Role lookup");
                role.as_deref() == Some(ADMIN_ROLE)
            }
            Err(err) => {
                warn!(%email, error = %err, "Role lookup failed, continuing without admin rights");
                false
            }
        }
    }

    /// Re-derive email and admin flag from the current session
    pub async fn refresh(&self) -> DomainResult<()> {
        self.state.update_state(|s| s.checking = true);

        let user = match self.backend.current_user().await {
            Ok(user) => user,
            Err(err) => {
                warn!(error = %err, "Could not read current session");
                let message = err.to_string();
                self.state.update_state(|s| {
                    s.signed_out();
                    s.error = Some(message);
                });
                return Err(err.into());
            }
        };

        match user.and_then(|user| user.email) {
            Some(email) => {
                let is_admin = self.lookup_admin(&email).await;
                info!(%email, is_admin, "Session active");
                self.state.update_state(|s| s.signed_in(email, is_admin));
            }
            None => {
                debug!("No active session");
                self.state.update_state(AuthState::signed_out);
            }
        }
        Ok(())
    }

    /// Password sign-in. Omitted credentials are asked for through `prompt`.
    pub async fn sign_in(
        &self,
        email: Option<String>,
        password: Option<String>,
        prompt: &dyn CredentialPrompt,
    ) -> DomainResult<()> {
        let email = email
            .filter(|e| !e.trim().is_empty())
            .or_else(|| prompt.ask(CredentialField::Email))
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());
        let password = match &email {
            Some(_) => password
                .filter(|p| !p.is_empty())
                .or_else(|| prompt.ask(CredentialField::Password))
                .filter(|p| !p.is_empty()),
            None => None,
        };

        let (Some(email), Some(password)) = (email, password) else {
            let err = DomainError::InvalidInput("email and password are required".to_string());
            self.state.update_state(|s| s.error = Some(err.to_string()));
            return Err(err);
        };

        self.state.update_state(|s| s.checking = true);
        let credentials = Credentials::new(email, password);
        let user = match self.backend.sign_in(&credentials).await {
            Ok(user) => user,
            Err(err) => {
                warn!(email = %credentials.email, error = %err, "Login failed");
                let message = format!("Login failed: {err}");
                self.state.update_state(|s| {
                    s.checking = false;
                    s.error = Some(message);
                });
                return Err(err.into());
            }
        };

        let email = user.email.unwrap_or(credentials.email);
        let is_admin = self.lookup_admin(&email).await;
        info!(%email, is_admin, "Signed in");
        self.state.update_state(|s| s.signed_in(email, is_admin));
        Ok(())
    }

    /// End the session. Local state is reset even if the backend call fails.
    pub async fn sign_out(&self) -> DomainResult<()> {
        let result = self.backend.sign_out().await;
        self.state.update_state(AuthState::signed_out);

        match result {
            Ok(()) => {
                info!("Signed out");
                self.state.update_state(|s| s.error = None);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Sign-out call failed; local session cleared");
                let message = err.to_string();
                self.state.update_state(|s| s.error = Some(message));
                Err(err.into())
            }
        }
    }
}

//! Browser Integrations
//!
//! `window.prompt` credential prompts and localStorage session persistence.

use inventory_core::{CredentialField, CredentialPrompt, Session, SessionStore};
use tracing::warn;
use web_sys::Storage;

/// Asks for missing credentials with `window.prompt`
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserPrompt;

impl CredentialPrompt for BrowserPrompt {
    fn ask(&self, field: CredentialField) -> Option<String> {
        web_sys::window()?
            .prompt_with_message(field.prompt_text())
            .ok()
            .flatten()
    }
}

fn local_storage() -> Option<Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

/// Keeps the session as JSON under one localStorage key
#[derive(Debug, Clone, Copy)]
pub struct LocalSessionStore {
    key: &'static str,
}

impl LocalSessionStore {
    pub fn new(key: &'static str) -> Self {
        Self { key }
    }
}

impl SessionStore for LocalSessionStore {
    fn load(&self) -> Option<Session> {
        let raw = local_storage()?.get_item(self.key).ok().flatten()?;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(err) => {
                warn!(key = self.key, error = %err, "Discarding unreadable stored session");
                None
            }
        }
    }

    fn save(&self, session: Option<&Session>) {
        let Some(storage) = local_storage() else {
            warn!("localStorage unavailable, session not persisted");
            return;
        };

        let result = match session {
            Some(session) => match serde_json::to_string(session) {
                Ok(raw) => storage.set_item(self.key, &raw),
                Err(err) => {
                    warn!(error = %err, "Could not encode session");
                    return;
                }
            },
            None => storage.remove_item(self.key),
        };
        if let Err(err) = result {
            warn!(key = self.key, error = ?err, "Could not write session to localStorage");
        }
    }
}

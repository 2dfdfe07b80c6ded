//! Interactive Prompts
//!
//! Presentation-independent questions the hooks ask the user.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialField {
    Email,
    Password,
}

impl CredentialField {
    pub fn prompt_text(self) -> &'static str {
        match self {
            CredentialField::Email => "Enter your email",
            CredentialField::Password => "Enter your password",
        }
    }
}

/// Asks for a credential the caller did not supply.
/// `None` means the user dismissed the prompt.
pub trait CredentialPrompt {
    fn ask(&self, field: CredentialField) -> Option<String>;
}

/// Yes/no confirmation before a destructive action
pub trait ConfirmPrompt {
    fn confirm(&self, message: &str) -> bool;
}

/// Confirmation already collected by the view (e.g. an inline confirm button)
#[derive(Debug, Clone, Copy, Default)]
pub struct Confirmed;

impl ConfirmPrompt for Confirmed {
    fn confirm(&self, _message: &str) -> bool {
        true
    }
}

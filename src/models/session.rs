//! Per-run session state
//!
//! Holds the bearer token and the authenticated user's identifier.

use super::responses::Identifier;

/// Authentication state for a single run
///
/// Created empty at run start. Only the authentication and profile steps
/// mutate it; every other call borrows it to pick up the bearer token.
#[derive(Clone, Debug, Default)]
pub struct Session {
    token: Option<String>,
    user_id: Option<Identifier>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bearer token, if authentication has succeeded
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    #[cfg(test)]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Identifier reported by the profile endpoint
    pub fn user_id(&self) -> Option<&Identifier> {
        self.user_id.as_ref()
    }

    pub fn set_user_id(&mut self, id: Identifier) {
        self.user_id = Some(id);
    }
}

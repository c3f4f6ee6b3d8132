use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::warn;

use crate::models::{AuthResponse, User};

use super::SessionStore;

/// Storage key for the bearer credential
pub const TOKEN_KEY: &str = "token";

/// Storage key for the serialized current user
pub const USER_KEY: &str = "user";

/// Whether the client believes it holds a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Authenticated,
    Anonymous,
}

/// Handle over the persisted session (credential + cached user record).
///
/// Expiry is not tracked locally; the server tells us with a 401.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl Session {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Stored bearer token. Blank values count as absent.
    pub fn token(&self) -> Result<Option<String>> {
        Ok(self
            .store
            .get(TOKEN_KEY)?
            .filter(|t| !t.trim().is_empty()))
    }

    /// Cached user record. A record that no longer parses is treated as absent.
    pub fn user(&self) -> Result<Option<User>> {
        let Some(raw) = self.store.get(USER_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable cached user record");
                Ok(None)
            }
        }
    }

    pub fn state(&self) -> Result<AuthState> {
        Ok(if self.token()?.is_some() {
            AuthState::Authenticated
        } else {
            AuthState::Anonymous
        })
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state(), Ok(AuthState::Authenticated))
    }

    /// Persist a credential and user record.
    pub fn save(&self, token: &str, user: &User) -> Result<()> {
        let user_json = serde_json::to_string(user).context("Failed to serialize user")?;
        self.store.set(TOKEN_KEY, token)?;
        self.store.set(USER_KEY, &user_json)?;
        Ok(())
    }

    /// Start a session from a login / registration / verification response.
    ///
    /// Returns `false` when the response carries no token (e.g. registration
    /// that still needs OTP verification); nothing is written in that case.
    pub fn begin(&self, response: &AuthResponse) -> Result<bool> {
        let Some(token) = response.token.as_deref().filter(|t| !t.is_empty()) else {
            return Ok(false);
        };
        self.store.set(TOKEN_KEY, token)?;
        match response.user {
            Some(ref user) => {
                let user_json = serde_json::to_string(user).context("Failed to serialize user")?;
                self.store.set(USER_KEY, &user_json)?;
            }
            None => self.store.remove(USER_KEY)?,
        }
        Ok(true)
    }

    /// Replace the cached user record, e.g. after a profile update.
    pub fn update_user(&self, user: &User) -> Result<()> {
        let user_json = serde_json::to_string(user).context("Failed to serialize user")?;
        self.store.set(USER_KEY, &user_json)
    }

    /// Remove credential and user. Safe to call repeatedly.
    ///
    /// Both keys are attempted even if the first removal fails; the first
    /// error is returned.
    pub fn clear(&self) -> Result<()> {
        let token = self.store.remove(TOKEN_KEY);
        let user = self.store.remove(USER_KEY);
        token.and(user)
    }
}

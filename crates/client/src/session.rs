//! Bearer-token session over the persisted scope.
//!
//! Losing a session is a normal, frequent occurrence in this
//! application's model, so everything here degrades to "guest": a
//! missing or unreadable token simply means unauthenticated. Storage
//! failures are logged, never propagated - the session must not take the
//! storefront down.

use std::fmt;
use std::sync::Arc;

use secrecy::SecretString;

use crate::api::types::User;
use crate::store::{KeyValueScope, keys};

/// The current authentication state, shared between the API client and
/// the cart service. Cheaply cloneable.
#[derive(Clone)]
pub struct Session {
    scope: Arc<dyn KeyValueScope>,
}

impl Session {
    /// Create a session over the given persisted scope.
    #[must_use]
    pub fn new(scope: Arc<dyn KeyValueScope>) -> Self {
        Self { scope }
    }

    /// The bearer token, if a credential is present.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        match self.scope.get(keys::AUTH_TOKEN) {
            Ok(token) => token.map(SecretString::from),
            Err(e) => {
                tracing::warn!("failed to read session token: {e}");
                None
            }
        }
    }

    /// Whether a session credential is present. Absence implies guest
    /// treatment (empty cart), not an error.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// The signed-in user, if present and readable.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        let raw = match self.scope.get(keys::USER) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!("failed to read stored user: {e}");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("stored user record is unreadable: {e}");
                None
            }
        }
    }

    /// Store a fresh credential and user record.
    pub fn sign_in(&self, token: &str, user: &User) {
        if let Err(e) = self.scope.set(keys::AUTH_TOKEN, token) {
            tracing::warn!("failed to persist session token: {e}");
        }
        match serde_json::to_string(user) {
            Ok(raw) => {
                if let Err(e) = self.scope.set(keys::USER, &raw) {
                    tracing::warn!("failed to persist user record: {e}");
                }
            }
            Err(e) => tracing::warn!("failed to encode user record: {e}"),
        }
    }

    /// Drop the credential, the user record, and the persisted cart
    /// mirror, so no stale cart survives a session change.
    pub fn sign_out(&self) {
        for key in [keys::AUTH_TOKEN, keys::USER, keys::CART_ITEMS] {
            if let Err(e) = self.scope.delete(key) {
                tracing::warn!("failed to clear {key} on sign-out: {e}");
            }
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field(
                "token",
                &self.token().map(|_| "[REDACTED]").unwrap_or("<none>"),
            )
            .field("user", &self.current_user().map(|u| u.username))
            .finish()
    }
}

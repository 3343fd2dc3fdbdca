//! Bearer token and role marker for the signed-in account.

use std::sync::{Arc, PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};
use tracing::warn;

use vitrina_core::UserRole;

use crate::store::{ClientStore, StoreError};

/// Store key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Store key holding the role of the signed-in account.
pub const ROLE_KEY: &str = "userRole";

/// Authentication state shared by every request of one [`ApiClient`].
///
/// The token is cached in memory and mirrored to the client store. Reads
/// fall back to the store when the cache is empty and repopulate it.
///
/// [`ApiClient`]: crate::ApiClient
#[derive(Debug)]
pub struct Session {
    cached: RwLock<Option<SecretString>>,
    store: Arc<dyn ClientStore>,
}

impl Session {
    #[must_use]
    pub fn new(store: Arc<dyn ClientStore>) -> Self {
        Self {
            cached: RwLock::new(None),
            store,
        }
    }

    /// The underlying client store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn ClientStore> {
        &self.store
    }

    /// Replace or clear the token in both the cache and the store. An empty
    /// token clears it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store write fails. The cache is updated
    /// either way.
    pub fn set_token(&self, token: Option<SecretString>) -> Result<(), StoreError> {
        let token = token.filter(|t| !t.expose_secret().is_empty());
        let stored = match &token {
            Some(t) => self.store.set(TOKEN_KEY, t.expose_secret()),
            None => self.store.remove(TOKEN_KEY),
        };
        *self.cached.write().unwrap_or_else(PoisonError::into_inner) = token;
        stored
    }

    /// The current token, if any.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        if let Some(token) = self
            .cached
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Some(token);
        }

        let token = self
            .store
            .get(TOKEN_KEY)
            .filter(|t| !t.is_empty())
            .map(SecretString::from)?;
        *self.cached.write().unwrap_or_else(PoisonError::into_inner) = Some(token.clone());
        Some(token)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Record the role of the signed-in account.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store write fails.
    pub fn set_role(&self, role: Option<UserRole>) -> Result<(), StoreError> {
        match role {
            Some(role) => self.store.set(ROLE_KEY, role.as_str()),
            None => self.store.remove(ROLE_KEY),
        }
    }

    /// The recorded role. An unrecognized marker reads as no role.
    #[must_use]
    pub fn role(&self) -> Option<UserRole> {
        let raw = self.store.get(ROLE_KEY)?;
        match raw.parse() {
            Ok(role) => Some(role),
            Err(e) => {
                warn!(error = %e, "Ignoring unrecognized role marker");
                None
            }
        }
    }

    /// Whether a token is held and the role marker is `admin`.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_authenticated() && self.role() == Some(UserRole::Admin)
    }

    /// Forget the token and the role marker.
    ///
    /// # Errors
    ///
    /// Returns the first [`StoreError`] encountered; both keys are still
    /// attempted.
    pub fn clear(&self) -> Result<(), StoreError> {
        let token = self.set_token(None);
        let role = self.set_role(None);
        token.and(role)
    }
}

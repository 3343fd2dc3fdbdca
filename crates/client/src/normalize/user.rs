//! User and authentication payload normalizers.

use secrecy::SecretString;
use serde_json::Value;

use vitrina_core::User;

use super::{Fields, Normalize, NormalizeError, keys};

impl Normalize for User {
    const ENTITY: &'static str = "user";

    fn normalize(raw: &Value) -> Result<Self, NormalizeError> {
        let f = Fields::new(Self::ENTITY, raw)?;
        Ok(Self {
            id: f.id(keys::ID)?,
            email: f.string(keys::EMAIL)?,
            name: f.optional_string(keys::NAME)?.unwrap_or_default(),
            role: f.parsed(keys::ROLE)?,
            created_at: f.optional_timestamp(keys::CREATED_AT)?,
        })
    }
}

/// Body of a successful login or register call.
#[derive(Debug, Clone)]
pub struct AuthPayload {
    pub user: User,
    /// Bearer token issued by the backend.
    pub token: SecretString,
}

impl Normalize for AuthPayload {
    const ENTITY: &'static str = "auth";

    fn normalize(raw: &Value) -> Result<Self, NormalizeError> {
        let f = Fields::new(Self::ENTITY, raw)?;
        let token = f.string(keys::TOKEN)?;
        if token.is_empty() {
            return Err(NormalizeError::InvalidField {
                entity: Self::ENTITY,
                field: "token",
                reason: "empty token".to_string(),
            });
        }
        let user = f
            .nested(keys::USER)?
            .ok_or(NormalizeError::MissingField {
                entity: Self::ENTITY,
                field: "user",
            })?;
        Ok(Self {
            user,
            token: SecretString::from(token),
        })
    }
}

/// Normalize a raw user payload.
///
/// # Errors
///
/// Returns [`NormalizeError`] if a required field is missing or the role is
/// not recognized.
pub fn normalize_user(raw: &Value) -> Result<User, NormalizeError> {
    User::normalize(raw)
}

/// Normalize a login or register response.
///
/// # Errors
///
/// Returns [`NormalizeError`] if the token or the user is missing or invalid.
pub fn normalize_auth_payload(raw: &Value) -> Result<AuthPayload, NormalizeError> {
    AuthPayload::normalize(raw)
}

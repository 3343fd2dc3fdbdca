//! Authentication and user operations.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument, warn};

use vitrina_core::User;

use super::client::Call;
use super::{ApiClient, GatewayError, Outcome};
use crate::normalize::{AuthPayload, Normalize, first_defined, keys};

/// Registration form.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub email: String,
    pub password: SecretString,
    pub name: String,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

impl ApiClient {
    /// Sign in and persist the issued token and role marker.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] if the backend is unavailable, fails, or the
    /// session cannot be persisted.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Outcome<User>, GatewayError> {
        let call = Call::post(&["auth", "login"]).json(&Credentials {
            email,
            password: password.expose_secret(),
            name: None,
        })?;
        let outcome = self.fetch_one::<AuthPayload>(call).await?;
        self.start_session(outcome)
    }

    /// Create an account and sign in as it.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] if the backend is unavailable, fails, or the
    /// session cannot be persisted.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: &RegisterInput) -> Result<Outcome<User>, GatewayError> {
        let call = Call::post(&["auth", "register"]).json(&Credentials {
            email: &input.email,
            password: input.password.expose_secret(),
            name: Some(&input.name),
        })?;
        let outcome = self.fetch_one::<AuthPayload>(call).await?;
        self.start_session(outcome)
    }

    fn start_session(&self, outcome: Outcome<AuthPayload>) -> Result<Outcome<User>, GatewayError> {
        let payload = match outcome {
            Outcome::Ok(payload) => payload,
            Outcome::Rejected(rejection) => return Ok(Outcome::Rejected(rejection)),
        };
        let session = self.session();
        session.set_token(Some(payload.token))?;
        session.set_role(Some(payload.user.role))?;
        info!(user_id = %payload.user.id, role = %payload.user.role, "Signed in");
        Ok(Outcome::Ok(payload.user))
    }

    /// The account the held token belongs to.
    ///
    /// Accepts both a bare user object and one wrapped as `{"user": {...}}`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] if the backend is unavailable or fails.
    #[instrument(skip(self))]
    pub async fn current_user(&self) -> Result<Outcome<User>, GatewayError> {
        self.fetch_with(Call::get(&["auth", "me"]), |body| User::normalize(unwrap_user(body)))
            .await
    }

    /// Forget the token and role marker. No backend call is made.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Store`] if the store could not be updated.
    pub fn logout(&self) -> Result<(), GatewayError> {
        self.session().clear()?;
        info!("Signed out");
        Ok(())
    }

    /// All accounts, for the admin console.
    ///
    /// Never fails: any error or rejection yields an empty list.
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Vec<User> {
        match self.fetch_list::<User>(Call::get(&["users"])).await {
            Ok(Outcome::Ok(users)) => users,
            Ok(Outcome::Rejected(rejection)) => {
                warn!(status = rejection.status, message = %rejection.message, "User listing rejected");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "User listing not available");
                Vec::new()
            }
        }
    }
}

/// Unwrap `{"user": {...}}` if present.
fn unwrap_user(body: &Value) -> &Value {
    body.as_object()
        .and_then(|obj| first_defined(obj, keys::USER))
        .filter(|v| v.is_object())
        .unwrap_or(body)
}

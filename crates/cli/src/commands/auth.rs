//! Sign-in state commands.

use secrecy::SecretString;
use serde_json::json;

use vitrina_client::{ApiClient, RegisterInput};

use super::{CommandError, accepted, print_json};

/// Sign in and persist the token.
pub async fn login(api: &ApiClient, email: &str, password: String) -> Result<(), CommandError> {
    let password = SecretString::from(password);
    let user = accepted(api.login(email, &password).await?)?;
    print_json(&user)
}

/// Create an account and sign in as it.
pub async fn register(
    api: &ApiClient,
    email: String,
    password: String,
    name: String,
) -> Result<(), CommandError> {
    let input = RegisterInput {
        email,
        password: SecretString::from(password),
        name,
    };
    let user = accepted(api.register(&input).await?)?;
    print_json(&user)
}

pub fn logout(api: &ApiClient) -> Result<(), CommandError> {
    api.logout()?;
    print_json(&json!({ "signedIn": false }))
}

/// Show the account behind the held token.
pub async fn me(api: &ApiClient) -> Result<(), CommandError> {
    if !api.is_authenticated() {
        return Err(CommandError::NotSignedIn);
    }
    let user = accepted(api.current_user().await?)?;
    print_json(&user)
}

/// Show local sign-in state without calling the backend.
pub fn status(api: &ApiClient) -> Result<(), CommandError> {
    let session = api.session();
    print_json(&json!({
        "signedIn": session.is_authenticated(),
        "role": session.role().map(|r| r.as_str()),
        "admin": session.is_admin(),
    }))
}

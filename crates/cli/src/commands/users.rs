//! Account listing.

use vitrina_client::ApiClient;

use super::{CommandError, print_json};

pub async fn list(api: &ApiClient) -> Result<(), CommandError> {
    print_json(&api.list_users().await)
}

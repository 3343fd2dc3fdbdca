//! Landing page commands.

use vitrina_client::ApiClient;
use vitrina_core::{LandingSectionPatch, SectionId, SectionKind};

use super::{CommandError, accepted, print_json};

/// Page-level fields to change; absent fields are kept.
#[derive(Debug, Default)]
pub struct PageChanges {
    pub company_name: Option<String>,
    pub company_description: Option<String>,
    pub logo: Option<String>,
}

/// Show the landing page, falling back to placeholder content.
pub async fn show(api: &ApiClient, visible_only: bool) -> Result<(), CommandError> {
    let page = accepted(api.landing_page_or_placeholder().await?)?;
    if visible_only {
        return print_json(&page.visible_sections());
    }
    print_json(&page)
}

pub async fn update_page(api: &ApiClient, changes: PageChanges) -> Result<(), CommandError> {
    let mut page = accepted(api.get_landing_page().await?)?;
    if let Some(name) = changes.company_name {
        page.company_name = name;
    }
    if changes.company_description.is_some() {
        page.company_description = changes.company_description;
    }
    if changes.logo.is_some() {
        page.logo = changes.logo;
    }
    let saved = accepted(api.update_landing_page(&page).await?)?;
    print_json(&saved)
}

/// Append a new section at the end of the page.
pub async fn add_section(
    api: &ApiClient,
    kind: SectionKind,
    patch: LandingSectionPatch,
) -> Result<(), CommandError> {
    let mut page = accepted(api.get_landing_page().await?)?;
    let id = page.add_draft_section(kind);
    page.update_section(&id, patch);
    let draft = page
        .sections
        .iter()
        .find(|s| s.id == id)
        .ok_or_else(|| CommandError::InvalidArgument(format!("draft section {id} vanished")))?;
    let saved = accepted(api.save_landing_section(draft).await?)?;
    print_json(&saved)
}

pub async fn edit_section(
    api: &ApiClient,
    id: String,
    patch: LandingSectionPatch,
) -> Result<(), CommandError> {
    let saved = accepted(api.update_landing_section(&SectionId::from(id), &patch).await?)?;
    print_json(&saved)
}

pub async fn delete_section(api: &ApiClient, id: String) -> Result<(), CommandError> {
    let id = SectionId::from(id);
    if id.is_draft() {
        return Err(CommandError::InvalidArgument(format!("{id} was never saved")));
    }
    accepted(api.delete_landing_section(&id).await?)?;
    print_json(&serde_json::json!({ "deleted": id }))
}

//! Landing page content operations.

use tracing::{debug, instrument};

use vitrina_core::{LandingPageData, LandingSection, LandingSectionPatch, SectionId};

use super::client::Call;
use super::{ApiClient, GatewayError, Outcome};

impl ApiClient {
    /// # Errors
    ///
    /// Returns [`GatewayError`] if the backend is unavailable or fails.
    #[instrument(skip(self))]
    pub async fn get_landing_page(&self) -> Result<Outcome<LandingPageData>, GatewayError> {
        self.fetch_one(Call::get(&["landing"])).await
    }

    /// The landing page, or placeholder content when the backend is
    /// unavailable.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] for server-side failures only.
    #[instrument(skip(self))]
    pub async fn landing_page_or_placeholder(
        &self,
    ) -> Result<Outcome<LandingPageData>, GatewayError> {
        match self.get_landing_page().await {
            Err(e) if e.is_unavailable() => {
                debug!("Backend unavailable, using placeholder landing content");
                Ok(Outcome::Ok(LandingPageData::placeholder()))
            }
            other => other,
        }
    }

    /// Replace the page-level fields and sections.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] if the backend is unavailable or fails.
    #[instrument(skip(self, page), fields(sections = page.sections.len()))]
    pub async fn update_landing_page(
        &self,
        page: &LandingPageData,
    ) -> Result<Outcome<LandingPageData>, GatewayError> {
        self.fetch_one(Call::put(&["landing"]).json(page)?).await
    }

    /// Persist a new section. Draft ids are never sent.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] if the backend is unavailable or fails.
    #[instrument(skip(self, patch))]
    pub async fn create_landing_section(
        &self,
        patch: &LandingSectionPatch,
    ) -> Result<Outcome<LandingSection>, GatewayError> {
        self.fetch_one(Call::post(&["landing", "sections"]).json(patch)?)
            .await
    }

    /// # Errors
    ///
    /// Returns [`GatewayError`] if the backend is unavailable or fails.
    #[instrument(skip(self, patch))]
    pub async fn update_landing_section(
        &self,
        id: &SectionId,
        patch: &LandingSectionPatch,
    ) -> Result<Outcome<LandingSection>, GatewayError> {
        self.fetch_one(Call::put(&["landing", "sections", id.as_str()]).json(patch)?)
            .await
    }

    /// # Errors
    ///
    /// Returns [`GatewayError`] if the backend is unavailable or fails.
    #[instrument(skip(self))]
    pub async fn delete_landing_section(
        &self,
        id: &SectionId,
    ) -> Result<Outcome<()>, GatewayError> {
        self.fetch_unit(Call::delete(&["landing", "sections", id.as_str()]))
            .await
    }

    /// Save one edited section: drafts are created, persisted sections
    /// updated.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] if the backend is unavailable or fails.
    #[instrument(skip(self, section), fields(section_id = %section.id))]
    pub async fn save_landing_section(
        &self,
        section: &LandingSection,
    ) -> Result<Outcome<LandingSection>, GatewayError> {
        let patch = section.to_patch();
        if section.id.is_draft() {
            self.create_landing_section(&patch).await
        } else {
            self.update_landing_section(&section.id, &patch).await
        }
    }
}

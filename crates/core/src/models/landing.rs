//! Landing page content and the section editor state.

use serde::{Deserialize, Serialize};

use crate::types::{SectionId, SectionKind};

/// One block of the landing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandingSection {
    pub id: SectionId,
    #[serde(rename = "type")]
    pub kind: SectionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Sort key. Values need not be contiguous.
    pub order: i64,
    pub visible: bool,
}

/// Partial update of a landing section.
///
/// Used both as the request body for section create/update calls and to edit
/// sections locally before saving.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandingSectionPatch {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<SectionKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

impl LandingSection {
    /// Apply every field present in `patch`.
    pub fn apply(&mut self, patch: LandingSectionPatch) {
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(title) = patch.title {
            self.title = Some(title);
        }
        if let Some(content) = patch.content {
            self.content = Some(content);
        }
        if let Some(image) = patch.image {
            self.image = Some(image);
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
        if let Some(visible) = patch.visible {
            self.visible = visible;
        }
    }

    /// Convert into a patch carrying every field, for create calls.
    #[must_use]
    pub fn to_patch(&self) -> LandingSectionPatch {
        LandingSectionPatch {
            kind: Some(self.kind),
            title: self.title.clone(),
            content: self.content.clone(),
            image: self.image.clone(),
            order: Some(self.order),
            visible: Some(self.visible),
        }
    }
}

/// Everything shown on the public landing page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandingPageData {
    pub company_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default)]
    pub sections: Vec<LandingSection>,
}

impl LandingPageData {
    /// All sections ordered by their sort key.
    ///
    /// The sort is stable, so sections sharing an `order` keep the sequence
    /// the backend returned them in.
    #[must_use]
    pub fn ordered_sections(&self) -> Vec<&LandingSection> {
        let mut sections: Vec<&LandingSection> = self.sections.iter().collect();
        sections.sort_by_key(|s| s.order);
        sections
    }

    /// Visible sections in display order.
    #[must_use]
    pub fn visible_sections(&self) -> Vec<&LandingSection> {
        self.ordered_sections()
            .into_iter()
            .filter(|s| s.visible)
            .collect()
    }

    /// Append an unsaved section at the end of the page.
    ///
    /// The section gets a transient draft id and `order = len + 1`; it only
    /// receives a persisted id once the backend creates it.
    pub fn add_draft_section(&mut self, kind: SectionKind) -> SectionId {
        let id = SectionId::draft();
        let order = i64::try_from(self.sections.len()).map_or(i64::MAX, |len| len + 1);
        self.sections.push(LandingSection {
            id: id.clone(),
            kind,
            title: Some(String::new()),
            content: Some(String::new()),
            image: None,
            order,
            visible: true,
        });
        id
    }

    /// Apply a patch to the section with `id`. Returns `false` if no such section.
    pub fn update_section(&mut self, id: &SectionId, patch: LandingSectionPatch) -> bool {
        match self.sections.iter_mut().find(|s| &s.id == id) {
            Some(section) => {
                section.apply(patch);
                true
            }
            None => false,
        }
    }

    /// Remove the section with `id`, returning it if present.
    pub fn remove_section(&mut self, id: &SectionId) -> Option<LandingSection> {
        let index = self.sections.iter().position(|s| &s.id == id)?;
        Some(self.sections.remove(index))
    }

    /// Content shown when the backend is not reachable.
    #[must_use]
    pub fn placeholder() -> Self {
        let section = |id: &str, kind, title: &str, content: &str, order| LandingSection {
            id: SectionId::new(id),
            kind,
            title: Some(title.to_owned()),
            content: Some(content.to_owned()),
            image: None,
            order,
            visible: true,
        };

        Self {
            company_name: "Mi Tienda".to_owned(),
            company_description: Some(
                "Productos de calidad con entrega a domicilio.".to_owned(),
            ),
            logo: None,
            sections: vec![
                section(
                    "placeholder-hero",
                    SectionKind::Hero,
                    "Bienvenido a nuestra tienda",
                    "Descubre nuestro catálogo de productos.",
                    1,
                ),
                section(
                    "placeholder-about",
                    SectionKind::About,
                    "Sobre nosotros",
                    "Somos un equipo dedicado a ofrecerte lo mejor.",
                    2,
                ),
                section(
                    "placeholder-contact",
                    SectionKind::Contact,
                    "Contacto",
                    "Escríbenos y te responderemos a la brevedad.",
                    3,
                ),
            ],
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn section(id: &str, order: i64, visible: bool) -> LandingSection {
        LandingSection {
            id: SectionId::new(id),
            kind: SectionKind::About,
            title: None,
            content: None,
            image: None,
            order,
            visible,
        }
    }

    fn ids(sections: &[&LandingSection]) -> Vec<String> {
        sections.iter().map(|s| s.id.to_string()).collect()
    }

    #[test]
    fn test_ordering_is_stable_for_ties() {
        let data = LandingPageData {
            sections: vec![
                section("a", 5, true),
                section("b", 1, true),
                section("c", 5, true),
                section("d", -2, true),
            ],
            ..Default::default()
        };
        assert_eq!(ids(&data.ordered_sections()), vec!["d", "b", "a", "c"]);
    }

    #[test]
    fn test_visible_sections_filters_hidden() {
        let data = LandingPageData {
            sections: vec![section("a", 2, true), section("b", 1, false)],
            ..Default::default()
        };
        assert_eq!(ids(&data.visible_sections()), vec!["a"]);
    }

    #[test]
    fn test_draft_section_lifecycle() {
        let mut data = LandingPageData::placeholder();
        let before = data.sections.len();
        let id = data.add_draft_section(SectionKind::Features);

        assert!(id.is_draft());
        let added = data.sections.last().unwrap();
        assert_eq!(added.order, i64::try_from(before).unwrap() + 1);
        assert!(added.visible);

        let patched = data.update_section(
            &id,
            LandingSectionPatch {
                title: Some("Novedades".to_string()),
                visible: Some(false),
                ..Default::default()
            },
        );
        assert!(patched);
        assert!(!data.visible_sections().iter().any(|s| s.id == id));

        assert!(data.remove_section(&id).is_some());
        assert_eq!(data.sections.len(), before);
        assert!(!data.update_section(&id, LandingSectionPatch::default()));
    }

    #[test]
    fn test_patch_serializes_type_key() {
        let patch = LandingSectionPatch {
            kind: Some(SectionKind::Contact),
            order: Some(0),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            serde_json::json!({"type": "contact", "order": 0})
        );
    }
}

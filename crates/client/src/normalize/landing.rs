//! Landing page normalizers.

use serde_json::Value;

use vitrina_core::{LandingPageData, LandingSection};

use super::{Fields, Normalize, NormalizeError, keys};

impl Normalize for LandingSection {
    const ENTITY: &'static str = "landing section";

    fn normalize(raw: &Value) -> Result<Self, NormalizeError> {
        let f = Fields::new(Self::ENTITY, raw)?;
        Ok(Self {
            id: f.id(keys::ID)?,
            kind: f.parsed(keys::TYPE)?,
            title: f.optional_string(keys::TITLE)?,
            content: f.optional_string(keys::CONTENT)?,
            image: f.optional_string(keys::IMAGE)?,
            order: f.first_integer_or_zero(keys::ORDER),
            visible: f.bool_or(keys::VISIBLE, true)?,
        })
    }
}

impl Normalize for LandingPageData {
    const ENTITY: &'static str = "landing page";

    fn normalize(raw: &Value) -> Result<Self, NormalizeError> {
        let f = Fields::new(Self::ENTITY, raw)?;
        Ok(Self {
            company_name: f.optional_string(keys::COMPANY_NAME)?.unwrap_or_default(),
            company_description: f.optional_string(keys::COMPANY_DESCRIPTION)?,
            logo: f.optional_string(keys::LOGO)?,
            sections: f.nested_list(keys::SECTIONS)?,
        })
    }
}

/// Normalize a raw landing section.
///
/// # Errors
///
/// Returns [`NormalizeError`] if the id is missing or the section type is
/// not recognized.
pub fn normalize_landing_section(raw: &Value) -> Result<LandingSection, NormalizeError> {
    LandingSection::normalize(raw)
}

/// Normalize the landing page document and all of its sections.
///
/// # Errors
///
/// Returns [`NormalizeError`] if the payload is not an object or a section
/// is invalid.
pub fn normalize_landing_page(raw: &Value) -> Result<LandingPageData, NormalizeError> {
    LandingPageData::normalize(raw)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use vitrina_core::SectionKind;

    use super::*;

    #[test]
    fn test_visible_defaults_to_true() {
        let section = normalize_landing_section(&json!({"ID": "s1", "Type": "hero"})).unwrap();
        assert!(section.visible);
        assert_eq!(section.order, 0);
        assert_eq!(section.kind, SectionKind::Hero);
        assert_eq!(section.title, None);
    }

    #[test]
    fn test_explicit_false_and_zero_preserved() {
        let section = normalize_landing_section(&json!({
            "id": "s1", "type": "about", "order": 0, "Order": 5, "visible": false, "Visible": true
        }))
        .unwrap();
        assert!(!section.visible);
        assert_eq!(section.order, 0);
    }

    #[test]
    fn test_page_defaults() {
        let page = normalize_landing_page(&json!({})).unwrap();
        assert_eq!(page, LandingPageData::default());

        let page = normalize_landing_page(&json!({"CompanyName": "Acme", "Sections": null})).unwrap();
        assert_eq!(page.company_name, "Acme");
        assert!(page.sections.is_empty());
    }

    #[test]
    fn test_page_sections_ordered_for_display() {
        let page = normalize_landing_page(&json!({
            "company_name": "Acme",
            "sections": [
                {"ID": "b", "Type": "about", "Order": 2},
                {"ID": "a", "Type": "hero", "Order": 1, "Visible": false},
                {"ID": "c", "Type": "contact", "Order": 3}
            ]
        }))
        .unwrap();
        let visible: Vec<_> = page.visible_sections().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(visible, vec!["b", "c"]);
    }

    #[test]
    fn test_idempotence() {
        let raw = json!({
            "CompanyName": "Acme",
            "Logo": "/logo.svg",
            "Sections": [{"ID": 9, "Type": "features", "Title": "Why us", "Order": 4, "Visible": false}]
        });
        let once = normalize_landing_page(&raw).unwrap();
        let twice = normalize_landing_page(&serde_json::to_value(&once).unwrap()).unwrap();
        assert_eq!(once, twice);
    }
}

//! Category domain types and write payload.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use vitrine_core::{BoutiqueId, CategoryId};

use super::validation::{TextField, ValidationErrors, WriteMode};

const NAME: TextField = TextField::required("name", Some(100));
const DESCRIPTION: TextField = TextField::optional("description", None);

/// A product category inside one boutique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
    pub boutique_id: BoutiqueId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated category values ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    pub description: String,
}

/// Category payload as sent by a vendor.
///
/// A `boutique` key is accepted and ignored: the boutique always comes
/// from the session.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryInput {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl CategoryInput {
    /// Validate the payload against the write mode.
    ///
    /// # Errors
    ///
    /// Returns every field error found.
    pub fn validate(self, mode: WriteMode<'_, Category>) -> Result<CategoryDraft, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let name = NAME.check(
            &mut errors,
            self.name,
            mode.fallback().map(|c| c.name.as_str()),
        );
        let description = DESCRIPTION.check(
            &mut errors,
            self.description,
            mode.current().map(|c| c.description.as_str()),
        );

        match (name, description) {
            (Some(name), Some(description)) if errors.is_empty() => {
                Ok(CategoryDraft { name, description })
            }
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn category() -> Category {
        Category {
            id: CategoryId::new(4),
            name: "Robes".to_owned(),
            description: "Robes de soirée".to_owned(),
            boutique_id: BoutiqueId::new(1),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn input(json: serde_json::Value) -> CategoryInput {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_create_requires_name() {
        let errors = input(serde_json::json!({"description": "x"}))
            .validate(WriteMode::Create)
            .unwrap_err();
        assert_eq!(errors.messages("name"), ["This field is required."]);
    }

    #[test]
    fn test_create_ignores_boutique_key() {
        let draft = input(serde_json::json!({"name": "Bijoux", "boutique": 99}))
            .validate(WriteMode::Create)
            .unwrap();
        assert_eq!(draft.name, "Bijoux");
        assert_eq!(draft.description, "");
    }

    #[test]
    fn test_replace_keeps_absent_description() {
        let current = category();
        let draft = input(serde_json::json!({"name": "Tenues"}))
            .validate(WriteMode::Replace(&current))
            .unwrap();
        assert_eq!(draft.name, "Tenues");
        assert_eq!(draft.description, "Robes de soirée");
    }

    #[test]
    fn test_replace_requires_name() {
        let current = category();
        assert!(
            input(serde_json::json!({"description": "x"}))
                .validate(WriteMode::Replace(&current))
                .is_err()
        );
    }

    #[test]
    fn test_patch_keeps_absent_name() {
        let current = category();
        let draft = input(serde_json::json!({"description": "Nouveautés"}))
            .validate(WriteMode::Patch(&current))
            .unwrap();
        assert_eq!(draft.name, "Robes");
        assert_eq!(draft.description, "Nouveautés");
    }
}

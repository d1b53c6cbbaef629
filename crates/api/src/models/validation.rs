//! Field-level validation for write payloads.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Message for a required field that is absent.
pub const REQUIRED: &str = "This field is required.";

/// Message for a required text field that is empty after trimming.
pub const BLANK: &str = "This field may not be blank.";

/// Field name to error messages, serialized as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    /// An error set holding a single message.
    #[must_use]
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.add(field, message);
        errors
    }

    /// Record a message against a field.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_owned())
            .or_default()
            .push(message.into());
    }

    /// Whether no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for one field.
    #[must_use]
    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }

    /// Names of the fields that failed.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid fields: ")?;
        for (i, field) in self.fields().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(field)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// How a payload is applied to a record.
///
/// Create and replace (`PUT`) require every required field; patch (`PATCH`)
/// keeps the current value of absent fields. Optional fields that are absent
/// keep their current value whenever there is one.
#[derive(Debug)]
pub enum WriteMode<'a, T> {
    /// New record.
    Create,
    /// Full update of an existing record.
    Replace(&'a T),
    /// Partial update of an existing record.
    Patch(&'a T),
}

impl<T> Clone for WriteMode<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for WriteMode<'_, T> {}

impl<'a, T> WriteMode<'a, T> {
    /// The record being updated, if any.
    #[must_use]
    pub const fn current(&self) -> Option<&'a T> {
        match self {
            Self::Create => None,
            Self::Replace(current) | Self::Patch(current) => Some(current),
        }
    }

    /// The record whose values stand in for absent required fields.
    #[must_use]
    pub const fn fallback(&self) -> Option<&'a T> {
        match self {
            Self::Patch(current) => Some(current),
            Self::Create | Self::Replace(_) => None,
        }
    }
}

/// Rules for a text field.
#[derive(Debug, Clone, Copy)]
pub struct TextField {
    name: &'static str,
    max_length: Option<usize>,
    allow_blank: bool,
}

impl TextField {
    /// A field that must be present and non-blank.
    #[must_use]
    pub const fn required(name: &'static str, max_length: Option<usize>) -> Self {
        Self {
            name,
            max_length,
            allow_blank: false,
        }
    }

    /// A field that may be absent or blank.
    #[must_use]
    pub const fn optional(name: &'static str, max_length: Option<usize>) -> Self {
        Self {
            name,
            max_length,
            allow_blank: true,
        }
    }

    /// Trim and check a submitted value.
    ///
    /// An absent value resolves to `fallback`; an absent value with no
    /// fallback is an error for required fields and empty for optional ones.
    pub fn check(
        &self,
        errors: &mut ValidationErrors,
        value: Option<String>,
        fallback: Option<&str>,
    ) -> Option<String> {
        let Some(value) = value else {
            return match fallback {
                Some(current) => Some(current.to_owned()),
                None if self.allow_blank => Some(String::new()),
                None => {
                    errors.add(self.name, REQUIRED);
                    None
                }
            };
        };

        let value = value.trim();
        if value.is_empty() && !self.allow_blank {
            errors.add(self.name, BLANK);
            return None;
        }
        if let Some(max) = self.max_length
            && value.chars().count() > max
        {
            errors.add(
                self.name,
                format!("Ensure this field has no more than {max} characters."),
            );
            return None;
        }
        Some(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_field_absent() {
        let mut errors = ValidationErrors::default();
        let field = TextField::required("title", Some(10));
        assert_eq!(field.check(&mut errors, None, None), None);
        assert_eq!(errors.messages("title"), [REQUIRED]);
    }

    #[test]
    fn test_required_field_blank() {
        let mut errors = ValidationErrors::default();
        let field = TextField::required("title", None);
        assert_eq!(field.check(&mut errors, Some("   ".into()), None), None);
        assert_eq!(errors.messages("title"), [BLANK]);
    }

    #[test]
    fn test_fallback_used_when_absent() {
        let mut errors = ValidationErrors::default();
        let field = TextField::required("title", None);
        assert_eq!(
            field.check(&mut errors, None, Some("current")),
            Some("current".to_owned())
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_value_is_trimmed_and_length_checked() {
        let mut errors = ValidationErrors::default();
        let field = TextField::required("name", Some(5));
        assert_eq!(
            field.check(&mut errors, Some("  robe ".into()), None),
            Some("robe".to_owned())
        );
        assert_eq!(field.check(&mut errors, Some("boubous".into()), None), None);
        assert_eq!(
            errors.messages("name"),
            ["Ensure this field has no more than 5 characters."]
        );
    }

    #[test]
    fn test_optional_field_defaults_to_empty() {
        let mut errors = ValidationErrors::default();
        let field = TextField::optional("description", None);
        assert_eq!(field.check(&mut errors, None, None), Some(String::new()));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_errors_serialize_as_object() {
        let mut errors = ValidationErrors::single("price", "bad");
        errors.add("stock", "worse");
        let json = serde_json::to_value(&errors).unwrap_or_default();
        assert_eq!(json, serde_json::json!({"price": ["bad"], "stock": ["worse"]}));
        assert_eq!(errors.to_string(), "invalid fields: price, stock");
    }
}

//! Storefront content commands: company profile and home page slides.

use thiserror::Error;
use vitrine_api::db::{CompanyProfileRepository, RepositoryError, SliderRepository};
use vitrine_api::models::{CompanyProfileDraft, NewSlider};
use vitrine_core::Email;

use super::{ConnectError, connect};

/// Errors that can occur while editing storefront content.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("{0} cannot be empty")]
    Empty(&'static str),

    #[error("{0} must be at most {1} characters")]
    TooLong(&'static str, usize),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

fn required(field: &'static str, value: String) -> Result<String, ContentError> {
    let value = value.trim().to_owned();
    if value.is_empty() {
        return Err(ContentError::Empty(field));
    }
    Ok(value)
}

fn bounded(field: &'static str, value: String, max: usize) -> Result<String, ContentError> {
    let value = required(field, value)?;
    if value.chars().count() > max {
        return Err(ContentError::TooLong(field, max));
    }
    Ok(value)
}

/// Create the company profile, or update the first one.
pub async fn set_company(
    name: String,
    whatsapp_number: String,
    address: String,
    email: Option<&str>,
    logo: Option<String>,
) -> Result<(), ContentError> {
    let draft = CompanyProfileDraft {
        name: bounded("name", name, 200)?,
        whatsapp_number: bounded("whatsapp", whatsapp_number, 20)?,
        address: required("address", address)?,
        email: email
            .map(Email::parse)
            .transpose()
            .map_err(|e| ContentError::InvalidEmail(e.to_string()))?,
        logo: logo
            .filter(|l| !l.trim().is_empty())
            .map(|l| bounded("logo", l, 255))
            .transpose()?,
    };

    let pool = connect().await?;
    let profile = CompanyProfileRepository::new(&pool).save_first(&draft).await?;

    tracing::info!("Company profile saved (ID: {})", profile.id);
    Ok(())
}

/// Add a home page slide.
pub async fn add_slider(
    title: String,
    description: String,
    image: String,
    order: u32,
) -> Result<(), ContentError> {
    let slider = NewSlider {
        image: bounded("image", image, 255)?,
        title: bounded("title", title, 200)?,
        description: required("description", description)?,
        order,
    };

    let pool = connect().await?;
    let slider = SliderRepository::new(&pool).create(&slider).await?;

    tracing::info!("Slide added: {} (ID: {}, order: {})", slider.title, slider.id, slider.order);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims() {
        assert_eq!(required("name", "  Vitrine ".to_owned()).unwrap(), "Vitrine");
        assert!(matches!(
            required("address", "   ".to_owned()),
            Err(ContentError::Empty("address"))
        ));
    }

    #[test]
    fn test_bounded_length() {
        assert_eq!(bounded("whatsapp", "+221770000000".to_owned(), 20).unwrap(), "+221770000000");
        assert!(matches!(
            bounded("whatsapp", "1".repeat(21), 20),
            Err(ContentError::TooLong("whatsapp", 20))
        ));
    }
}

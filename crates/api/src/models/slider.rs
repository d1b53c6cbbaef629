//! Home page slider.

use chrono::{DateTime, Utc};

use vitrine_core::SliderId;

/// A home page slide. Slides are shown in ascending `order`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slider {
    pub id: SliderId,
    pub image: String,
    pub title: String,
    pub description: String,
    pub order: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for a new slide.
#[derive(Debug, Clone)]
pub struct NewSlider {
    pub image: String,
    pub title: String,
    pub description: String,
    pub order: u32,
}

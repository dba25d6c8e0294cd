//! Form validation.
//!
//! Campground and review input arrives as raw strings; these checks run
//! before any CDN upload, geocoding call or query.

use serde::Deserialize;
use thiserror::Error;

use yelpcamp_core::{Price, Rating};

/// A rejected form field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} {problem}")]
pub struct ValidationError {
    /// Human-readable field label.
    pub field: &'static str,
    /// What is wrong with it.
    pub problem: String,
}

impl ValidationError {
    fn new(field: &'static str, problem: impl Into<String>) -> Self {
        Self {
            field,
            problem: problem.into(),
        }
    }
}

/// Raw campground form fields, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CampgroundForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub description: String,
    /// CDN filenames ticked for removal on the edit form.
    #[serde(default, rename = "deleteImages")]
    pub delete_images: Vec<String>,
}

/// Campground fields that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidCampground {
    pub title: String,
    pub location: String,
    pub price: Price,
    pub description: String,
}

impl CampgroundForm {
    /// Check every field and return the cleaned values.
    ///
    /// # Errors
    ///
    /// Returns the first field that fails.
    pub fn validate(&self) -> Result<ValidCampground, ValidationError> {
        let title = required_text("Title", &self.title)?;
        let location = required_text("Location", &self.location)?;
        let price_raw = required_text("Price", &self.price)?;
        let price = Price::parse(&price_raw).map_err(|e| ValidationError::new("Price", e.to_string()))?;
        let description = required_text("Description", &self.description)?;

        for filename in &self.delete_images {
            reject_html("Image", filename)?;
        }

        Ok(ValidCampground {
            title,
            location,
            price,
            description,
        })
    }
}

/// Raw review form fields, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewForm {
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub body: String,
}

/// Review fields that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidReview {
    pub rating: Rating,
    pub body: String,
}

impl ReviewForm {
    /// Check every field and return the cleaned values.
    ///
    /// # Errors
    ///
    /// Returns the first field that fails.
    pub fn validate(&self) -> Result<ValidReview, ValidationError> {
        let rating_raw = required_text("Rating", &self.rating)?;
        let rating = rating_raw
            .parse::<i64>()
            .map_err(|_| ValidationError::new("Rating", "must be a whole number"))
            .and_then(|n| Rating::new(n).map_err(|e| ValidationError::new("Rating", e.to_string())))?;
        let body = required_text("Review", &self.body)?;

        Ok(ValidReview { rating, body })
    }
}

/// Trim a required field and reject empty or markup-bearing input.
fn required_text(field: &'static str, raw: &str) -> Result<String, ValidationError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    reject_html(field, value)?;
    Ok(value.to_string())
}

fn reject_html(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if contains_html(value) {
        return Err(ValidationError::new(field, "must not include HTML!"));
    }
    Ok(())
}

/// Whether `s` contains something a browser would parse as a tag,
/// comment or processing instruction.
#[must_use]
pub fn contains_html(s: &str) -> bool {
    s.as_bytes()
        .windows(2)
        .any(|w| matches!(w, [b'<', next] if next.is_ascii_alphabetic() || matches!(next, b'/' | b'!' | b'?')))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn campground_form() -> CampgroundForm {
        CampgroundForm {
            title: "  Misty Hollow ".to_string(),
            location: "Moab, Utah".to_string(),
            price: "12.50".to_string(),
            description: "Quiet sites by the river.".to_string(),
            delete_images: Vec::new(),
        }
    }

    #[test]
    fn test_contains_html() {
        assert!(contains_html("<script>alert(1)</script>"));
        assert!(contains_html("hi </b>"));
        assert!(contains_html("<!-- x -->"));
        assert!(contains_html("<img src=x onerror=y>"));
        assert!(!contains_html("3 < 5 and 5 > 3"));
        assert!(!contains_html("<3 this place"));
        assert!(!contains_html("Fish & Chips"));
    }

    #[test]
    fn test_campground_form_valid() {
        let valid = campground_form().validate().unwrap();
        assert_eq!(valid.title, "Misty Hollow");
        assert_eq!(valid.price.to_string(), "$12.50");
    }

    #[test]
    fn test_campground_form_requires_fields() {
        let mut form = campground_form();
        form.location = "   ".to_string();
        let err = form.validate().unwrap_err();
        assert_eq!(err.to_string(), "Location is required");
    }

    #[test]
    fn test_campground_form_rejects_html() {
        let mut form = campground_form();
        form.description = "<b>bold</b> claims".to_string();
        let err = form.validate().unwrap_err();
        assert_eq!(err.to_string(), "Description must not include HTML!");
    }

    #[test]
    fn test_campground_form_rejects_bad_price() {
        let mut form = campground_form();
        form.price = "-3".to_string();
        assert_eq!(form.validate().unwrap_err().field, "Price");

        form.price = "cheap".to_string();
        assert_eq!(form.validate().unwrap_err().field, "Price");

        form.price = "100000000".to_string();
        let err = form.validate().unwrap_err();
        assert_eq!(err.field, "Price");
        assert!(err.to_string().contains("99999999.99"));
    }

    #[test]
    fn test_review_form() {
        let form = ReviewForm {
            rating: "4".to_string(),
            body: "Great views".to_string(),
        };
        let valid = form.validate().unwrap();
        assert_eq!(valid.rating.value(), 4);

        let form = ReviewForm {
            rating: "6".to_string(),
            body: "Too good".to_string(),
        };
        assert_eq!(form.validate().unwrap_err().field, "Rating");

        let form = ReviewForm {
            rating: "3".to_string(),
            body: String::new(),
        };
        assert_eq!(form.validate().unwrap_err().to_string(), "Review is required");
    }
}

//! Campground domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use yelpcamp_core::{CampgroundId, GeoPoint, ImageId, Price, UserId, Username};

/// Width of the thumbnails shown on the edit form.
const THUMBNAIL_WIDTH: u32 = 200;

/// The public face of a user attached to content they authored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorSummary {
    pub id: UserId,
    pub username: Username,
}

/// An image stored on the CDN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampgroundImage {
    pub id: ImageId,
    /// Delivery URL.
    pub url: String,
    /// CDN public id, used to destroy the asset.
    pub filename: String,
}

impl CampgroundImage {
    /// Delivery URL with an on-the-fly resize transformation.
    ///
    /// Cloudinary applies transformations placed directly after `/upload`.
    /// URLs from other hosts are returned unchanged.
    #[must_use]
    pub fn thumbnail(&self) -> String {
        self.url
            .replacen("/upload/", &format!("/upload/w_{THUMBNAIL_WIDTH}/"), 1)
    }
}

/// A campground listing.
#[derive(Debug, Clone)]
pub struct Campground {
    pub id: CampgroundId,
    pub title: String,
    pub description: String,
    pub price: Price,
    pub location: String,
    pub geometry: GeoPoint,
    pub images: Vec<CampgroundImage>,
    pub author: AuthorSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Campground {
    /// Whether `user_id` may edit or delete this listing.
    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.author.id == user_id
    }

    /// First image, used as the cover on the listing page.
    #[must_use]
    pub fn cover_image(&self) -> Option<&CampgroundImage> {
        self.images.first()
    }

    /// Description cut to `max_chars` characters for cards and map popups.
    #[must_use]
    pub fn excerpt(&self, max_chars: usize) -> String {
        let mut chars = self.description.chars();
        let head: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{}...", head.trim_end())
        } else {
            head
        }
    }
}

/// An image the CDN accepted, not yet attached to a campground.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewImage {
    pub url: String,
    pub filename: String,
}

/// Validated input for creating a campground.
#[derive(Debug, Clone)]
pub struct NewCampground {
    pub title: String,
    pub description: String,
    pub price: Price,
    pub location: String,
    pub geometry: GeoPoint,
    pub images: Vec<NewImage>,
}

/// Validated input for editing a campground's fields.
#[derive(Debug, Clone)]
pub struct CampgroundUpdate {
    pub title: String,
    pub description: String,
    pub price: Price,
    pub location: String,
    pub geometry: GeoPoint,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn campground(description: &str) -> Campground {
        Campground {
            id: CampgroundId::new(1),
            title: "Misty Creek".to_string(),
            description: description.to_string(),
            price: Price::from_dollars(15),
            location: "Denver, Colorado".to_string(),
            geometry: GeoPoint::new(-104.99, 39.74).unwrap(),
            images: Vec::new(),
            author: AuthorSummary {
                id: UserId::new(9),
                username: Username::parse("ansq").unwrap(),
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_thumbnail_inserts_width_transformation() {
        let image = CampgroundImage {
            id: ImageId::new(1),
            url: "https://res.cloudinary.com/demo/image/upload/v1/YelpCamp/abc.jpg".to_string(),
            filename: "YelpCamp/abc".to_string(),
        };
        assert_eq!(
            image.thumbnail(),
            "https://res.cloudinary.com/demo/image/upload/w_200/v1/YelpCamp/abc.jpg"
        );
    }

    #[test]
    fn test_thumbnail_leaves_foreign_urls_alone() {
        let image = CampgroundImage {
            id: ImageId::new(1),
            url: "https://images.unsplash.com/photo-1".to_string(),
            filename: "unsplash".to_string(),
        };
        assert_eq!(image.thumbnail(), image.url);
    }

    #[test]
    fn test_is_owned_by() {
        let camp = campground("x");
        assert!(camp.is_owned_by(UserId::new(9)));
        assert!(!camp.is_owned_by(UserId::new(10)));
    }

    #[test]
    fn test_excerpt() {
        assert_eq!(campground("short").excerpt(20), "short");
        assert_eq!(campground("a long description").excerpt(6), "a long...");
    }
}

//! Review domain types.

use chrono::{DateTime, Utc};

use yelpcamp_core::{CampgroundId, Rating, ReviewId};

use super::AuthorSummary;

/// A review left on a campground.
#[derive(Debug, Clone)]
pub struct Review {
    pub id: ReviewId,
    pub campground_id: CampgroundId,
    pub author: AuthorSummary,
    pub body: String,
    pub rating: Rating,
    pub created_at: DateTime<Utc>,
}

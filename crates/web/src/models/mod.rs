//! Domain models for the campground site.
//!
//! These are validated domain objects, separate from the row types the
//! repositories decode into.

pub mod campground;
pub mod review;
pub mod session;
pub mod user;

pub use campground::{
    AuthorSummary, Campground, CampgroundImage, CampgroundUpdate, NewCampground, NewImage,
};
pub use review::Review;
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;

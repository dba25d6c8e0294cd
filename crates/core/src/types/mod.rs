//! Core types for YelpCamp.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod geo;
pub mod id;
pub mod price;
pub mod rating;
pub mod username;

pub use email::{Email, EmailError};
pub use geo::{GeoError, GeoPoint};
pub use id::*;
pub use price::{Price, PriceError};
pub use rating::{Rating, RatingError};
pub use username::{Username, UsernameError};

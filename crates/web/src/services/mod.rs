//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Password registration and login (Argon2id)
//! - `images` - Cloudinary upload and destroy
//! - `geocoding` - Mapbox forward geocoding with an in-process cache
//! - `validation` - Campground and review form checks

pub mod auth;
pub mod geocoding;
pub mod images;
pub mod validation;

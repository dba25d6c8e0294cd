//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use yelpcamp_core::{Email, UserId, Username};

/// A registered user.
///
/// The password hash never leaves the repository layer, so this type is
/// safe to serialize in debug responses.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Sign-in handle.
    pub username: Username,
    /// Contact email.
    pub email: Email,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

//! Seed the database with demo campgrounds.
//!
//! Every existing campground is deleted first (reviews and images go with
//! them). The author must already exist; create one with `yc-cli user create`.

use yelpcamp_core::Username;
use yelpcamp_web::db::UserRepository;
use yelpcamp_web::seeds::{generate_campgrounds, seed_campgrounds};

use super::connect;

/// Replace all campgrounds with `count` generated ones owned by `author`.
///
/// # Errors
///
/// Returns an error if the author is unknown or any database write fails.
/// Nothing is changed on failure.
pub async fn campgrounds(author: &str, count: usize) -> Result<(), Box<dyn std::error::Error>> {
    let username = Username::parse(author)?;
    let pool = connect().await?;

    let user = UserRepository::new(&pool)
        .get_by_username(&username)
        .await?
        .ok_or_else(|| format!("No user named {username}"))?;

    let campgrounds = generate_campgrounds(&mut rand::rng(), count)?;

    tracing::info!(author = %username, count, "Seeding campgrounds");
    let deleted = seed_campgrounds(&pool, user.id, &campgrounds).await?;

    tracing::info!(deleted, inserted = campgrounds.len(), "Seeding complete!");
    Ok(())
}

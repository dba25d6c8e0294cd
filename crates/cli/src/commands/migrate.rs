//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! yc-cli migrate
//! ```
//!
//! Migrations live in `crates/web/migrations/` and are embedded in the
//! binary at build time.

use yelpcamp_web::db::MIGRATOR;

use super::connect;

/// Apply every pending migration.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    MIGRATOR.run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}

//! User account commands.
//!
//! # Usage
//!
//! ```bash
//! yc-cli user create -u colt -e colt@example.com -p 'correct horse battery'
//! ```

use yelpcamp_web::services::auth::AuthService;

use super::connect;

/// Create an account with the same rules as the registration form.
///
/// # Errors
///
/// Returns an error if the input is rejected (bad username or email, short
/// password, taken username or email) or the database is unreachable.
pub async fn create(
    username: &str,
    email: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let pool = connect().await?;

    let user = AuthService::new(&pool)
        .register(username, email, password)
        .await?;

    tracing::info!(user_id = %user.id, username = %user.username, "User created");
    Ok(())
}

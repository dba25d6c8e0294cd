//! Development-only helpers. Never mounted in production.

use axum::{Json, extract::State};
use rand::distr::{Alphanumeric, SampleString};
use serde::Serialize;

use crate::error::AppError;
use crate::models::User;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// A throwaway account and the password it was created with.
#[derive(Debug, Serialize)]
pub struct FakeUser {
    pub user: User,
    pub password: String,
}

/// Register a random throwaway account for poking at the site locally.
pub async fn fake_user(State(state): State<AppState>) -> Result<Json<FakeUser>, AppError> {
    let (username, email, password) = {
        let mut rng = rand::rng();
        let tag = Alphanumeric.sample_string(&mut rng, 8).to_lowercase();
        let username = format!("camper_{tag}");
        let email = format!("{username}@example.com");
        (username, email, Alphanumeric.sample_string(&mut rng, 16))
    };

    let user = AuthService::new(state.pool())
        .register(&username, &email, &password)
        .await?;
    tracing::info!(user_id = %user.id, %username, "Created throwaway user");

    Ok(Json(FakeUser { user, password }))
}

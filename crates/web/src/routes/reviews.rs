//! Review route handlers.

use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use yelpcamp_core::{CampgroundId, ReviewId};

use super::campgrounds::{CAMPGROUND_NOT_FOUND, PERMISSION_DENIED, parse_id};
use crate::db::{RepositoryError, ReviewRepository};
use crate::error::AppError;
use crate::middleware::{RequireAuth, flash_error, flash_success};
use crate::services::validation::ReviewForm;
use crate::state::AppState;

/// Post a review on a campground.
#[instrument(skip(user, state, session, form), fields(user_id = %user.id))]
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Path(raw_id): Path<String>,
    Form(form): Form<ReviewForm>,
) -> Result<Response, AppError> {
    let Some(campground_id) = parse_id::<CampgroundId>(&raw_id) else {
        return Ok(campground_missing(&session).await);
    };

    let review = form.validate()?;

    match ReviewRepository::new(state.pool())
        .create(campground_id, user.id, &review.body, review.rating)
        .await
    {
        Ok(review_id) => {
            tracing::info!(%campground_id, %review_id, "Review created");
        }
        Err(RepositoryError::NotFound) => return Ok(campground_missing(&session).await),
        Err(e) => return Err(e.into()),
    }

    flash_success(&session, "Created new review!").await;
    Ok(Redirect::to(&format!("/campgrounds/{campground_id}")).into_response())
}

/// Delete a review. Only its author may do this.
#[instrument(skip(user, state, session), fields(user_id = %user.id))]
pub async fn delete(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Path((raw_id, raw_review_id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let Some(campground_id) = parse_id::<CampgroundId>(&raw_id) else {
        return Ok(campground_missing(&session).await);
    };
    let back = Redirect::to(&format!("/campgrounds/{campground_id}")).into_response();

    let repo = ReviewRepository::new(state.pool());
    let author = match parse_id::<ReviewId>(&raw_review_id) {
        Some(review_id) => repo
            .author_of(campground_id, review_id)
            .await?
            .map(|author| (review_id, author)),
        None => None,
    };

    let Some((review_id, author)) = author else {
        flash_error(&session, "Cannot find that review!").await;
        return Ok(back);
    };
    if author != user.id {
        flash_error(&session, PERMISSION_DENIED).await;
        return Ok(back);
    }

    repo.delete(campground_id, review_id).await?;
    tracing::info!(%campground_id, %review_id, "Review deleted");

    flash_success(&session, "Successfully deleted review").await;
    Ok(back)
}

async fn campground_missing(session: &Session) -> Response {
    flash_error(session, CAMPGROUND_NOT_FOUND).await;
    Redirect::to("/campgrounds").into_response()
}

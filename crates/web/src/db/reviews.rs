//! Review repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use yelpcamp_core::{CampgroundId, Rating, ReviewId, UserId, Username};

use super::{RepositoryError, classify};
use crate::models::{AuthorSummary, Review};

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: ReviewId,
    campground_id: CampgroundId,
    body: String,
    rating: Rating,
    created_at: DateTime<Utc>,
    author_id: UserId,
    author_username: String,
}

impl TryFrom<ReviewRow> for Review {
    type Error = RepositoryError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        let username = Username::parse(&row.author_username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            campground_id: row.campground_id,
            author: AuthorSummary {
                id: row.author_id,
                username,
            },
            body: row.body,
            rating: row.rating,
            created_at: row.created_at,
        })
    }
}

/// Repository for review database operations.
pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepository<'a> {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Reviews on a campground in the order they were written.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_campground(
        &self,
        campground_id: CampgroundId,
    ) -> Result<Vec<Review>, RepositoryError> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            r"
            SELECT r.id, r.campground_id, r.body, r.rating, r.created_at,
                   r.author_id, u.username AS author_username
            FROM yelpcamp.reviews r
            JOIN yelpcamp.users u ON u.id = r.author_id
            WHERE r.campground_id = $1
            ORDER BY r.created_at, r.id
            ",
        )
        .bind(campground_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Review::try_from).collect()
    }

    /// Add a review to a campground.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the campground (or author)
    /// no longer exists.
    pub async fn create(
        &self,
        campground_id: CampgroundId,
        author: UserId,
        body: &str,
        rating: Rating,
    ) -> Result<ReviewId, RepositoryError> {
        let id = sqlx::query_scalar::<_, ReviewId>(
            r"
            INSERT INTO yelpcamp.reviews (campground_id, author_id, body, rating)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            ",
        )
        .bind(campground_id)
        .bind(author)
        .bind(body)
        .bind(rating)
        .fetch_one(self.pool)
        .await
        .map_err(classify)?;

        Ok(id)
    }

    /// Author of a review, if it exists on the given campground.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn author_of(
        &self,
        campground_id: CampgroundId,
        review_id: ReviewId,
    ) -> Result<Option<UserId>, RepositoryError> {
        let author = sqlx::query_scalar::<_, UserId>(
            "SELECT author_id FROM yelpcamp.reviews WHERE id = $1 AND campground_id = $2",
        )
        .bind(review_id)
        .bind(campground_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(author)
    }

    /// Delete a review from a campground.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such review is on the campground.
    pub async fn delete(
        &self,
        campground_id: CampgroundId,
        review_id: ReviewId,
    ) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("DELETE FROM yelpcamp.reviews WHERE id = $1 AND campground_id = $2")
                .bind(review_id)
                .bind(campground_id)
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

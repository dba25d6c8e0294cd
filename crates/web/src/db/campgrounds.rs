//! Campground repository for database operations.
//!
//! Images are stored in their own table and stitched back onto each
//! campground after the main query.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use yelpcamp_core::{CampgroundId, GeoPoint, ImageId, Price, UserId, Username};

use super::{RepositoryError, classify};
use crate::models::{
    AuthorSummary, Campground, CampgroundImage, CampgroundUpdate, NewCampground, NewImage,
};

const SELECT_CAMPGROUND: &str = r"
    SELECT c.id, c.title, c.description, c.price, c.location,
           c.longitude, c.latitude, c.created_at, c.updated_at,
           c.author_id, u.username AS author_username
    FROM yelpcamp.campgrounds c
    JOIN yelpcamp.users u ON u.id = c.author_id
";

#[derive(sqlx::FromRow)]
struct CampgroundRow {
    id: CampgroundId,
    title: String,
    description: String,
    price: Price,
    location: String,
    longitude: f64,
    latitude: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    author_id: UserId,
    author_username: String,
}

#[derive(sqlx::FromRow)]
struct ImageRow {
    id: ImageId,
    campground_id: CampgroundId,
    url: String,
    filename: String,
}

impl CampgroundRow {
    fn into_campground(self, images: Vec<CampgroundImage>) -> Result<Campground, RepositoryError> {
        let geometry = GeoPoint::new(self.longitude, self.latitude).map_err(|e| {
            RepositoryError::DataCorruption(format!("campground {}: {e}", self.id))
        })?;
        let username = Username::parse(&self.author_username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;

        Ok(Campground {
            id: self.id,
            title: self.title,
            description: self.description,
            price: self.price,
            location: self.location,
            geometry,
            images,
            author: AuthorSummary {
                id: self.author_id,
                username,
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Repository for campground database operations.
pub struct CampgroundRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CampgroundRepository<'a> {
    /// Create a new campground repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every campground, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(&self) -> Result<Vec<Campground>, RepositoryError> {
        let rows = sqlx::query_as::<_, CampgroundRow>(&format!(
            "{SELECT_CAMPGROUND} ORDER BY c.created_at DESC, c.id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        let ids: Vec<i32> = rows.iter().map(|r| r.id.as_i32()).collect();
        let mut images = self.images_for(&ids).await?;

        rows.into_iter()
            .map(|row| {
                let imgs = images.remove(&row.id).unwrap_or_default();
                row.into_campground(imgs)
            })
            .collect()
    }

    /// Get a campground by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get(&self, id: CampgroundId) -> Result<Option<Campground>, RepositoryError> {
        let row = sqlx::query_as::<_, CampgroundRow>(&format!("{SELECT_CAMPGROUND} WHERE c.id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let images = self
            .images_for(&[id.as_i32()])
            .await?
            .remove(&id)
            .unwrap_or_default();

        row.into_campground(images).map(Some)
    }

    /// Get the author of a campground without loading the rest of it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn author_of(&self, id: CampgroundId) -> Result<Option<UserId>, RepositoryError> {
        let author = sqlx::query_scalar::<_, UserId>(
            "SELECT author_id FROM yelpcamp.campgrounds WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(author)
    }

    /// Create a campground and its images in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the author does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        author: UserId,
        campground: &NewCampground,
    ) -> Result<CampgroundId, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let id = insert_campground(&mut tx, author, campground).await?;
        tx.commit().await?;
        Ok(id)
    }

    /// Update a campground's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the campground doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: CampgroundId,
        update: &CampgroundUpdate,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE yelpcamp.campgrounds
            SET title = $1, description = $2, price = $3, location = $4,
                longitude = $5, latitude = $6, updated_at = NOW()
            WHERE id = $7
            ",
        )
        .bind(&update.title)
        .bind(&update.description)
        .bind(update.price)
        .bind(&update.location)
        .bind(update.geometry.longitude())
        .bind(update.geometry.latitude())
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Append images after the campground's existing ones.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the campground doesn't exist.
    pub async fn add_images(
        &self,
        id: CampgroundId,
        images: &[NewImage],
    ) -> Result<(), RepositoryError> {
        if images.is_empty() {
            return Ok(());
        }
        let mut tx = self.pool.begin().await?;
        insert_images(&mut tx, id, images).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Detach images by CDN filename, returning the filenames actually removed.
    ///
    /// Filenames that don't belong to this campground are ignored.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove_images(
        &self,
        id: CampgroundId,
        filenames: &[String],
    ) -> Result<Vec<String>, RepositoryError> {
        if filenames.is_empty() {
            return Ok(Vec::new());
        }

        let removed = sqlx::query_scalar::<_, String>(
            r"
            DELETE FROM yelpcamp.campground_images
            WHERE campground_id = $1 AND filename = ANY($2)
            RETURNING filename
            ",
        )
        .bind(id)
        .bind(filenames)
        .fetch_all(self.pool)
        .await?;

        Ok(removed)
    }

    /// Delete a campground along with its reviews and image rows.
    ///
    /// Returns the CDN filenames of the deleted images, or `None` if the
    /// campground didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn delete(&self, id: CampgroundId) -> Result<Option<Vec<String>>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let filenames = sqlx::query_scalar::<_, String>(
            "SELECT filename FROM yelpcamp.campground_images WHERE campground_id = $1",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        // Reviews and images cascade
        let result = sqlx::query("DELETE FROM yelpcamp.campgrounds WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        tx.commit().await?;
        Ok(Some(filenames))
    }

    async fn images_for(
        &self,
        ids: &[i32],
    ) -> Result<HashMap<CampgroundId, Vec<CampgroundImage>>, RepositoryError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, ImageRow>(
            r"
            SELECT id, campground_id, url, filename
            FROM yelpcamp.campground_images
            WHERE campground_id = ANY($1)
            ORDER BY position, id
            ",
        )
        .bind(ids)
        .fetch_all(self.pool)
        .await?;

        let mut grouped: HashMap<CampgroundId, Vec<CampgroundImage>> = HashMap::new();
        for row in rows {
            grouped
                .entry(row.campground_id)
                .or_default()
                .push(CampgroundImage {
                    id: row.id,
                    url: row.url,
                    filename: row.filename,
                });
        }
        Ok(grouped)
    }
}

/// Insert a campground and its images on an open connection.
///
/// Shared by [`CampgroundRepository::create`] and the seeder so both run
/// inside a caller-owned transaction.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the author does not exist.
pub async fn insert_campground(
    conn: &mut PgConnection,
    author: UserId,
    campground: &NewCampground,
) -> Result<CampgroundId, RepositoryError> {
    let id = sqlx::query_scalar::<_, CampgroundId>(
        r"
        INSERT INTO yelpcamp.campgrounds
            (author_id, title, description, price, location, longitude, latitude)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id
        ",
    )
    .bind(author)
    .bind(&campground.title)
    .bind(&campground.description)
    .bind(campground.price)
    .bind(&campground.location)
    .bind(campground.geometry.longitude())
    .bind(campground.geometry.latitude())
    .fetch_one(&mut *conn)
    .await
    .map_err(classify)?;

    insert_images(conn, id, &campground.images).await?;

    Ok(id)
}

/// Delete every campground (and, by cascade, their images and reviews).
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn delete_all(conn: &mut PgConnection) -> Result<u64, RepositoryError> {
    let result = sqlx::query("DELETE FROM yelpcamp.campgrounds")
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

async fn insert_images(
    conn: &mut PgConnection,
    id: CampgroundId,
    images: &[NewImage],
) -> Result<(), RepositoryError> {
    for image in images {
        sqlx::query(
            r"
            INSERT INTO yelpcamp.campground_images (campground_id, url, filename, position)
            VALUES (
                $1, $2, $3,
                (SELECT COALESCE(MAX(position) + 1, 0)
                 FROM yelpcamp.campground_images WHERE campground_id = $1)
            )
            ",
        )
        .bind(id)
        .bind(&image.url)
        .bind(&image.filename)
        .execute(&mut *conn)
        .await
        .map_err(classify)?;
    }
    Ok(())
}

//! Seeder tests against a live `PostgreSQL`.
//!
//! Seeding replaces every campground, so these run in their own test binary
//! and take [`SEED_LOCK`] to stay out of each other's way.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use rand::SeedableRng;
use rand::rngs::StdRng;
use sqlx::PgPool;
use tokio::sync::Mutex;

use yelpcamp_core::UserId;
use yelpcamp_web::db::RepositoryError;
use yelpcamp_web::seeds::{DEFAULT_SEED_COUNT, generate_campgrounds, seed_campgrounds};
use yelpcamp_web::services::auth::AuthService;

use common::{migrated_pool, unique_username};

static SEED_LOCK: Mutex<()> = Mutex::const_new(());

async fn campground_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM yelpcamp.campgrounds")
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn seed_author(pool: &PgPool) -> UserId {
    let username = unique_username("seeder");
    AuthService::new(pool)
        .register(&username, &format!("{username}@example.com"), "seed password")
        .await
        .unwrap()
        .id
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_seed_inserts_default_count() {
    let _guard = SEED_LOCK.lock().await;
    let pool = migrated_pool().await;
    let author = seed_author(&pool).await;

    let campgrounds =
        generate_campgrounds(&mut StdRng::seed_from_u64(11), DEFAULT_SEED_COUNT).unwrap();
    seed_campgrounds(&pool, author, &campgrounds).await.unwrap();
    assert_eq!(campground_count(&pool).await, 200);

    let images: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM yelpcamp.campground_images")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(images, 400);

    // A second run replaces rather than appends
    let deleted = seed_campgrounds(&pool, author, &campgrounds[..5])
        .await
        .unwrap();
    assert_eq!(deleted, 200);
    assert_eq!(campground_count(&pool).await, 5);
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_failed_seed_keeps_existing_campgrounds() {
    let _guard = SEED_LOCK.lock().await;
    let pool = migrated_pool().await;
    let author = seed_author(&pool).await;

    let campgrounds = generate_campgrounds(&mut StdRng::seed_from_u64(5), 3).unwrap();
    seed_campgrounds(&pool, author, &campgrounds).await.unwrap();
    assert_eq!(campground_count(&pool).await, 3);

    let missing_author = UserId::new(i32::MAX);
    let result = seed_campgrounds(&pool, missing_author, &campgrounds).await;
    assert!(matches!(result, Err(RepositoryError::NotFound)));
    assert_eq!(campground_count(&pool).await, 3);
}

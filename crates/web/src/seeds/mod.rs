//! Demo data for a fresh database.
//!
//! [`generate_campgrounds`] is pure over the supplied RNG; [`seed_campgrounds`]
//! replaces every campground in one transaction.

mod cities;

use rand::Rng;
use rand::seq::IndexedRandom;
use sqlx::PgPool;

use yelpcamp_core::{GeoError, GeoPoint, Price, UserId};

pub use cities::{CITIES, City};

use crate::db::RepositoryError;
use crate::db::campgrounds::{delete_all, insert_campground};
use crate::models::{NewCampground, NewImage};

/// Number of campgrounds seeded when no count is given.
pub const DEFAULT_SEED_COUNT: usize = 200;

pub const DESCRIPTORS: &[&str] = &[
    "Forest",
    "Ancient",
    "Petrified",
    "Roaring",
    "Cascade",
    "Tumbling",
    "Silent",
    "Redwood",
    "Bullfrog",
    "Maple",
    "Misty",
    "Elk",
    "Grizzly",
    "Ocean",
    "Sea",
    "Sky",
    "Dusty",
    "Diamond",
];

pub const PLACES: &[&str] = &[
    "Flats",
    "Village",
    "Canyon",
    "Pond",
    "Group Camp",
    "Horse Camp",
    "Ghost Town",
    "Camp",
    "Dispersed Camp",
    "Backcountry",
    "River",
    "Creek",
    "Creekside",
    "Bay",
    "Spring",
    "Bayshore",
    "Sands",
    "Mule Camp",
    "Hunting Camp",
    "Cliffs",
    "Hollow",
];

const DESCRIPTION: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. \
Sed auctor, ex a consectetur tincidunt, ipsum justo ullamcorper ligula, at mollis nunc \
justo vel mauris. Nulla facilisi. Sed vel tortor sed velit ornare tincidunt.";

/// Every seeded campground shows these two photos.
const IMAGES: [(&str, &str); 2] = [
    (
        "https://res.cloudinary.com/dyq8h16eb/image/upload/v1751385104/YelpCamp/ybr7as0yzecpav4dtkcq.jpg",
        "YelpCamp/ybr7as0yzecpav4dtkcq",
    ),
    (
        "https://res.cloudinary.com/dyq8h16eb/image/upload/v1751385104/YelpCamp/qjcddrhsjtgmgkix3gov.jpg",
        "YelpCamp/qjcddrhsjtgmgkix3gov",
    ),
];

/// Price range in whole dollars, upper bound exclusive.
const PRICE_DOLLARS: std::ops::Range<u32> = 10..30;

/// Generate `count` campgrounds placed in random cities.
///
/// # Errors
///
/// Returns `GeoError` if a city's coordinates are out of range.
pub fn generate_campgrounds<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
) -> Result<Vec<NewCampground>, GeoError> {
    (0..count).map(|_| generate_one(&mut *rng)).collect()
}

fn generate_one<R: Rng + ?Sized>(rng: &mut R) -> Result<NewCampground, GeoError> {
    #[allow(clippy::indexing_slicing)] // index drawn from 0..len
    let city = &CITIES[rng.random_range(0..CITIES.len())];
    let descriptor = DESCRIPTORS.choose(rng).copied().unwrap_or("Forest");
    let place = PLACES.choose(rng).copied().unwrap_or("Camp");

    Ok(NewCampground {
        title: format!("{descriptor} {place}"),
        description: DESCRIPTION.to_owned(),
        price: Price::from_dollars(rng.random_range(PRICE_DOLLARS)),
        location: format!("{}, {}", city.city, city.state),
        geometry: GeoPoint::new(city.longitude, city.latitude)?,
        images: IMAGES
            .iter()
            .map(|(url, filename)| NewImage {
                url: (*url).to_owned(),
                filename: (*filename).to_owned(),
            })
            .collect(),
    })
}

/// Delete every campground and insert `campgrounds` authored by `author`.
///
/// Runs in a single transaction; the first failed insert rolls back the whole
/// run, including the delete. Returns the number of campgrounds deleted.
///
/// # Errors
///
/// Returns `RepositoryError` if any statement fails.
pub async fn seed_campgrounds(
    pool: &PgPool,
    author: UserId,
    campgrounds: &[NewCampground],
) -> Result<u64, RepositoryError> {
    let mut tx = pool.begin().await?;

    let deleted = delete_all(&mut tx).await?;
    for campground in campgrounds {
        insert_campground(&mut tx, author, campground).await?;
    }

    tx.commit().await?;
    tracing::info!(deleted, inserted = campgrounds.len(), "Seeded campgrounds");
    Ok(deleted)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_generates_requested_count() {
        let mut rng = StdRng::seed_from_u64(7);
        let campgrounds = generate_campgrounds(&mut rng, DEFAULT_SEED_COUNT).unwrap();
        assert_eq!(campgrounds.len(), 200);
    }

    #[test]
    fn test_generation_is_deterministic_for_a_seed() {
        let a = generate_campgrounds(&mut StdRng::seed_from_u64(42), 20).unwrap();
        let b = generate_campgrounds(&mut StdRng::seed_from_u64(42), 20).unwrap();
        let titles = |c: &[NewCampground]| c.iter().map(|c| c.title.clone()).collect::<Vec<_>>();
        assert_eq!(titles(&a), titles(&b));
    }

    #[test]
    fn test_generated_fields_follow_the_lists() {
        let mut rng = StdRng::seed_from_u64(3);
        for campground in generate_campgrounds(&mut rng, 100).unwrap() {
            let amount = campground.price.amount();
            assert!(amount >= Decimal::from(10) && amount < Decimal::from(30));
            assert_eq!(amount.fract(), Decimal::ZERO);

            assert!(
                DESCRIPTORS
                    .iter()
                    .any(|d| campground.title.starts_with(&format!("{d} ")))
            );
            assert!(
                PLACES
                    .iter()
                    .any(|p| campground.title.ends_with(&format!(" {p}")))
            );

            let city = CITIES
                .iter()
                .find(|c| campground.location == format!("{}, {}", c.city, c.state))
                .unwrap();
            assert_eq!(campground.geometry.coordinates(), [
                city.longitude,
                city.latitude
            ]);

            assert_eq!(campground.images.len(), 2);
            assert_eq!(campground.description, DESCRIPTION);
        }
    }

    #[test]
    fn test_every_city_has_valid_coordinates() {
        for city in CITIES {
            assert!(
                GeoPoint::new(city.longitude, city.latitude).is_ok(),
                "{}",
                city.city
            );
        }
    }

    #[test]
    fn test_zero_count_is_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generate_campgrounds(&mut rng, 0).unwrap().is_empty());
    }
}

//! Campground route handlers.
//!
//! Create and update arrive as multipart forms so images can ride along.
//! Edit, update and delete are limited to the campground's author.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use yelpcamp_core::{CampgroundId, UserId};

use crate::db::CampgroundRepository;
use crate::db::ReviewRepository;
use crate::error::{AppError, add_breadcrumb};
use crate::filters;
use crate::middleware::{PageContext, RequireAuth, flash_error, flash_success};
use crate::models::{Campground, CampgroundUpdate, NewCampground, Review};
use crate::services::images::UploadFile;
use crate::services::validation::CampgroundForm;
use crate::state::AppState;

/// Flash shown when a campground id matches nothing.
pub const CAMPGROUND_NOT_FOUND: &str = "Cannot find that campground!";

/// Flash shown when someone other than the author tries to change a listing.
pub const PERMISSION_DENIED: &str = "You do not have permission to do that!";

/// Characters of description shown on index cards.
const EXCERPT_CHARS: usize = 160;

// =============================================================================
// Templates
// =============================================================================

/// Campground index template.
#[derive(Template, WebTemplate)]
#[template(path = "campgrounds/index.html")]
pub struct IndexTemplate {
    pub ctx: PageContext,
    pub campgrounds: Vec<Campground>,
    pub excerpt_chars: usize,
    /// GeoJSON `FeatureCollection` for the cluster map, safe to inline.
    pub map_data: String,
}

/// New campground form template.
#[derive(Template, WebTemplate)]
#[template(path = "campgrounds/new.html")]
pub struct NewTemplate {
    pub ctx: PageContext,
}

/// Campground detail template.
#[derive(Template, WebTemplate)]
#[template(path = "campgrounds/show.html")]
pub struct ShowTemplate {
    pub ctx: PageContext,
    pub campground: Campground,
    pub reviews: Vec<Review>,
    /// GeoJSON `Feature` for the detail map, safe to inline.
    pub map_data: String,
}

/// Edit campground form template.
#[derive(Template, WebTemplate)]
#[template(path = "campgrounds/edit.html")]
pub struct EditTemplate {
    pub ctx: PageContext,
    pub campground: Campground,
}

// =============================================================================
// Map data
// =============================================================================

#[derive(Serialize)]
struct MapFeature<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    geometry: &'a yelpcamp_core::GeoPoint,
    properties: MapProperties<'a>,
}

#[derive(Serialize)]
struct MapProperties<'a> {
    id: CampgroundId,
    title: &'a str,
    location: &'a str,
    url: String,
}

#[derive(Serialize)]
struct MapFeatureCollection<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    features: Vec<MapFeature<'a>>,
}

impl<'a> From<&'a Campground> for MapFeature<'a> {
    fn from(campground: &'a Campground) -> Self {
        Self {
            kind: "Feature",
            geometry: &campground.geometry,
            properties: MapProperties {
                id: campground.id,
                title: &campground.title,
                location: &campground.location,
                url: format!("/campgrounds/{}", campground.id),
            },
        }
    }
}

/// Serialize `value` for embedding inside a `<script>` element.
///
/// `<`, `>` and `&` are written as unicode escapes so the payload can never
/// close the script tag.
fn script_json(value: &impl Serialize) -> Result<String, AppError> {
    let json = serde_json::to_string(value)
        .map_err(|e| AppError::Internal(format!("map data serialization: {e}")))?;
    Ok(json
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}

// =============================================================================
// Handlers
// =============================================================================

/// List every campground with a cluster map.
#[instrument(skip(state, ctx))]
pub async fn index(State(state): State<AppState>, ctx: PageContext) -> Result<Response, AppError> {
    let campgrounds = CampgroundRepository::new(state.pool()).list().await?;

    let map_data = script_json(&MapFeatureCollection {
        kind: "FeatureCollection",
        features: campgrounds.iter().map(MapFeature::from).collect(),
    })?;

    Ok(IndexTemplate {
        ctx,
        campgrounds,
        excerpt_chars: EXCERPT_CHARS,
        map_data,
    }
    .into_response())
}

/// Show the new campground form.
pub async fn new_page(RequireAuth(_user): RequireAuth, ctx: PageContext) -> impl IntoResponse {
    NewTemplate { ctx }
}

/// Create a campground from the multipart form.
///
/// The form is validated and the location geocoded before any image is
/// uploaded. If the insert fails the uploaded images are destroyed.
#[instrument(skip(user, state, session, multipart), fields(user_id = %user.id))]
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let (form, files) = read_campground_form(multipart).await?;
    let valid = form.validate()?;
    let geometry = state.geocoder().forward(&valid.location).await?;
    let images = state.images().upload_all(&files).await?;

    let new = NewCampground {
        title: valid.title,
        description: valid.description,
        price: valid.price,
        location: valid.location,
        geometry,
        images,
    };

    let id = match CampgroundRepository::new(state.pool())
        .create(user.id, &new)
        .await
    {
        Ok(id) => id,
        Err(e) => {
            let filenames: Vec<String> = new.images.iter().map(|i| i.filename.clone()).collect();
            state.images().destroy_all_best_effort(&filenames).await;
            return Err(e.into());
        }
    };

    let id_str = id.to_string();
    add_breadcrumb("campground", "Created campground", &[("campground_id", id_str.as_str())]);
    tracing::info!(campground_id = %id, images = new.images.len(), "Campground created");

    flash_success(&session, "Successfully made a new campground!").await;
    Ok(Redirect::to(&format!("/campgrounds/{id}")).into_response())
}

/// Show a campground with its reviews and map.
#[instrument(skip(state, ctx, session))]
pub async fn show(
    State(state): State<AppState>,
    ctx: PageContext,
    session: Session,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let found = match parse_id(&raw_id) {
        Some(id) => CampgroundRepository::new(state.pool()).get(id).await?,
        None => None,
    };
    let Some(campground) = found else {
        flash_error(&session, CAMPGROUND_NOT_FOUND).await;
        return Ok(Redirect::to("/campgrounds").into_response());
    };

    let reviews = ReviewRepository::new(state.pool())
        .list_for_campground(campground.id)
        .await?;
    let map_data = script_json(&MapFeature::from(&campground))?;

    Ok(ShowTemplate {
        ctx,
        campground,
        reviews,
        map_data,
    }
    .into_response())
}

/// Show the edit form to the campground's author.
#[instrument(skip(user, state, ctx, session), fields(user_id = %user.id))]
pub async fn edit_page(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    ctx: PageContext,
    session: Session,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let found = match parse_id(&raw_id) {
        Some(id) => CampgroundRepository::new(state.pool()).get(id).await?,
        None => None,
    };
    let Some(campground) = found else {
        flash_error(&session, CAMPGROUND_NOT_FOUND).await;
        return Ok(Redirect::to("/campgrounds").into_response());
    };

    if let Some(denied) = deny_unless_owner(&session, &campground, user.id).await {
        return Ok(denied);
    }

    Ok(EditTemplate { ctx, campground }.into_response())
}

/// Apply the edit form: fields, new images and ticked image removals.
#[instrument(skip(user, state, session, multipart), fields(user_id = %user.id))]
pub async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Path(raw_id): Path<String>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let repo = CampgroundRepository::new(state.pool());

    let found = match parse_id(&raw_id) {
        Some(id) => repo.get(id).await?,
        None => None,
    };
    let Some(existing) = found else {
        flash_error(&session, CAMPGROUND_NOT_FOUND).await;
        return Ok(Redirect::to("/campgrounds").into_response());
    };
    if let Some(denied) = deny_unless_owner(&session, &existing, user.id).await {
        return Ok(denied);
    }

    let (form, files) = read_campground_form(multipart).await?;
    let valid = form.validate()?;

    let geometry = if valid.location == existing.location {
        existing.geometry
    } else {
        state.geocoder().forward(&valid.location).await?
    };

    let images = state.images().upload_all(&files).await?;

    let update = CampgroundUpdate {
        title: valid.title,
        description: valid.description,
        price: valid.price,
        location: valid.location,
        geometry,
    };
    let saved = match repo.update(existing.id, &update).await {
        Ok(()) => repo.add_images(existing.id, &images).await,
        Err(e) => Err(e),
    };
    if let Err(e) = saved {
        let filenames: Vec<String> = images.iter().map(|i| i.filename.clone()).collect();
        state.images().destroy_all_best_effort(&filenames).await;
        return Err(e.into());
    }

    let removed = repo.remove_images(existing.id, &form.delete_images).await?;
    state.images().destroy_all_best_effort(&removed).await;

    tracing::info!(
        campground_id = %existing.id,
        added = images.len(),
        removed = removed.len(),
        "Campground updated"
    );

    flash_success(&session, "Successfully updated campground!").await;
    Ok(Redirect::to(&format!("/campgrounds/{}", existing.id)).into_response())
}

/// Delete a campground, its reviews and its CDN images.
#[instrument(skip(user, state, session), fields(user_id = %user.id))]
pub async fn delete(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let repo = CampgroundRepository::new(state.pool());

    let author = match parse_id(&raw_id) {
        Some(id) => repo.author_of(id).await?.map(|author| (id, author)),
        None => None,
    };
    let Some((id, author)) = author else {
        flash_error(&session, CAMPGROUND_NOT_FOUND).await;
        return Ok(Redirect::to("/campgrounds").into_response());
    };
    if author != user.id {
        flash_error(&session, PERMISSION_DENIED).await;
        return Ok(Redirect::to(&format!("/campgrounds/{id}")).into_response());
    }

    if let Some(filenames) = repo.delete(id).await? {
        state.images().destroy_all_best_effort(&filenames).await;
        tracing::info!(campground_id = %id, "Campground deleted");
    }

    flash_success(&session, "Successfully deleted campground").await;
    Ok(Redirect::to("/campgrounds").into_response())
}

// =============================================================================
// Helpers
// =============================================================================

/// Parse a path id; anything that isn't a positive integer matches nothing.
pub(crate) fn parse_id<T: From<i32>>(raw: &str) -> Option<T> {
    raw.parse::<i32>().ok().filter(|id| *id > 0).map(T::from)
}

async fn deny_unless_owner(
    session: &Session,
    campground: &Campground,
    user_id: UserId,
) -> Option<Response> {
    if campground.is_owned_by(user_id) {
        return None;
    }
    flash_error(session, PERMISSION_DENIED).await;
    Some(Redirect::to(&format!("/campgrounds/{}", campground.id)).into_response())
}

/// Split a multipart campground form into its text fields and image files.
///
/// File inputs submitted without a selection arrive as empty parts and are
/// skipped.
async fn read_campground_form(
    mut multipart: Multipart,
) -> Result<(CampgroundForm, Vec<UploadFile>), AppError> {
    let mut form = CampgroundForm::default();
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "image" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().map(ToString::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            if !file_name.is_empty() && !bytes.is_empty() {
                files.push(UploadFile {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        match name.as_str() {
            "title" => form.title = value,
            "location" => form.location = value,
            "price" => form.price = value,
            "description" => form.description = value,
            "deleteImages" | "deleteImages[]" => form.delete_images.push(value),
            other => tracing::debug!(field = other, "Ignoring unknown form field"),
        }
    }

    Ok((form, files))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use yelpcamp_core::{GeoPoint, Price, Username};

    use super::*;
    use crate::models::AuthorSummary;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id::<CampgroundId>("42"), Some(CampgroundId::new(42)));
        assert_eq!(parse_id::<CampgroundId>("0"), None);
        assert_eq!(parse_id::<CampgroundId>("-1"), None);
        assert_eq!(parse_id::<CampgroundId>("5f9a"), None);
        assert_eq!(parse_id::<CampgroundId>("99999999999"), None);
    }

    #[test]
    fn test_script_json_cannot_close_script_tag() {
        let json = script_json(&serde_json::json!({"title": "</script><script>x()"})).unwrap();
        assert!(!json.contains("</script>"));
        assert!(json.contains("\\u003c/script\\u003e"));
        let back: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back["title"], "</script><script>x()");
    }

    #[test]
    fn test_map_feature_shape() {
        let campground = Campground {
            id: CampgroundId::new(7),
            title: "Elk Flats".to_string(),
            description: "Open meadow".to_string(),
            price: Price::from_dollars(20),
            location: "Estes Park, Colorado".to_string(),
            geometry: GeoPoint::new(-105.52, 40.37).unwrap(),
            images: Vec::new(),
            author: AuthorSummary {
                id: UserId::new(1),
                username: Username::parse("ranger").unwrap(),
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let value: serde_json::Value =
            serde_json::from_str(&script_json(&MapFeature::from(&campground)).unwrap()).unwrap();
        assert_eq!(value["type"], "Feature");
        assert_eq!(value["geometry"]["type"], "Point");
        assert_eq!(value["geometry"]["coordinates"][0], -105.52);
        assert_eq!(value["properties"]["url"], "/campgrounds/7");
    }
}

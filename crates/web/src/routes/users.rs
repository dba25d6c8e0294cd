//! Registration, login and logout.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{
    PageContext, clear_current_user, flash_error, flash_success, set_current_user, take_return_to,
};
use crate::models::{CurrentUser, User};
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "users/login.html")]
pub struct LoginTemplate {
    pub ctx: PageContext,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "users/register.html")]
pub struct RegisterTemplate {
    pub ctx: PageContext,
    pub min_password_length: usize,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the registration page.
pub async fn register_page(ctx: PageContext) -> impl IntoResponse {
    RegisterTemplate {
        ctx,
        min_password_length: crate::services::auth::MIN_PASSWORD_LENGTH,
    }
}

/// Create an account and sign the new user in.
///
/// Rejected input (taken username, short password, ...) is flashed back on
/// the registration page.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let result = AuthService::new(state.pool())
        .register(&form.username, &form.email, &form.password)
        .await;

    let user = match result {
        Ok(user) => user,
        Err(e) if e.is_user_error() => {
            tracing::info!(error = %e, "Registration rejected");
            flash_error(&session, e.to_string()).await;
            return Ok(Redirect::to("/register").into_response());
        }
        Err(e) => return Err(e.into()),
    };

    sign_in(&session, &user).await?;
    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    flash_success(&session, "Welcome to Yelp Camp!").await;
    Ok(Redirect::to("/campgrounds").into_response())
}

/// Display the login page.
pub async fn login_page(ctx: PageContext) -> impl IntoResponse {
    LoginTemplate { ctx }
}

/// Check credentials and sign in, returning to the page that required it.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let user = match AuthService::new(state.pool())
        .login(&form.username, &form.password)
        .await
    {
        Ok(user) => user,
        Err(AuthError::InvalidCredentials) => {
            tracing::info!("Login failed");
            flash_error(&session, AuthError::InvalidCredentials.to_string()).await;
            return Ok(Redirect::to("/login").into_response());
        }
        Err(e) => return Err(e.into()),
    };

    // Read before sign_in cycles the session id
    let return_to = take_return_to(&session).await;
    sign_in(&session, &user).await?;
    tracing::info!(user_id = %user.id, "User logged in");

    flash_success(&session, "Welcome back!").await;
    Ok(Redirect::to(&return_to).into_response())
}

/// Sign out.
pub async fn logout(session: Session) -> Result<Response, AppError> {
    clear_current_user(&session).await?;
    clear_sentry_user();

    flash_success(&session, "Goodbye!").await;
    Ok(Redirect::to("/campgrounds").into_response())
}

async fn sign_in(session: &Session, user: &User) -> Result<(), AppError> {
    set_current_user(session, &CurrentUser::from(user)).await?;
    set_sentry_user(&user.id, user.username.as_str());
    Ok(())
}

//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] yelpcamp_core::EmailError),

    /// Invalid username format.
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] yelpcamp_core::UsernameError),

    /// Invalid credentials (wrong password or user not found).
    #[error("Password or username is incorrect")]
    InvalidCredentials,

    /// The username is registered to someone else.
    #[error("A user with the given username is already registered")]
    UsernameTaken,

    /// The email is registered to someone else.
    #[error("A user with the given email is already registered")]
    EmailTaken,

    /// Password too weak or invalid.
    #[error("{0}")]
    WeakPassword(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

impl AuthError {
    /// Whether the failure was caused by what the user typed.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        !matches!(self, Self::Repository(_) | Self::PasswordHash)
    }
}

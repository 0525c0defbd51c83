//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! PANTRY_USER_PASSWORD=... pantry-cli user create -u alice
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string
//! - `PANTRY_USER_PASSWORD` - Password for the new user (kept out of shell history)

use pantry_core::{UserId, Username, UsernameError};
use pantry_storefront::db::{RepositoryError, UserRepository};
use pantry_storefront::services::{AuthError, AuthService};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Environment variable holding the new user's password.
const PASSWORD_ENV: &str = "PANTRY_USER_PASSWORD";

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Could not connect.
    #[error("Database connection error: {0}")]
    Connect(String),

    /// Invalid username.
    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    /// User already exists.
    #[error("User already exists: {0}")]
    UserExists(String),

    /// Lookup failed.
    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Registration failed.
    #[error("{0}")]
    Auth(#[from] AuthError),
}

/// Create a new user.
///
/// # Returns
///
/// The ID of the created user.
///
/// # Errors
///
/// Returns `UserError` if the password is missing, the username is invalid or
/// taken, or the database is unreachable.
pub async fn create_user(username: &str) -> Result<UserId, UserError> {
    let password = std::env::var(PASSWORD_ENV)
        .map(SecretString::from)
        .map_err(|_| UserError::MissingEnvVar(PASSWORD_ENV))?;

    let parsed = Username::parse(username)?;

    let pool = super::connect()
        .await
        .map_err(|e| UserError::Connect(e.to_string()))?;

    if UserRepository::new(&pool).exists(&parsed).await? {
        return Err(UserError::UserExists(username.to_owned()));
    }

    tracing::info!("Creating user: {}", parsed);
    let user = AuthService::new(&pool)
        .register(parsed.as_str(), password.expose_secret())
        .await?;

    Ok(user.id)
}

//! Authentication route handlers.
//!
//! Registration, password login, logout and "who am I". Login stores a
//! `CurrentUser` in the session; every other protected handler reads it back
//! through `RequireAuth`.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use pantry_core::{UserId, Username};

use crate::error::Result;
use crate::extract::AppJson;
use crate::middleware::{RequireAuth, clear_current_user, set_current_user};
use crate::models::{CurrentUser, User};
use crate::services::AuthService;
use crate::state::AppState;

/// Username and password, as sent to `/register` and `/login`.
///
/// Deliberately not `Debug`, so the password never reaches a log line.
#[derive(Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Public view of a user.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub username: Username,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

impl From<CurrentUser> for UserResponse {
    fn from(user: CurrentUser) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

/// Response carrying a message and the affected user.
#[derive(Debug, Serialize)]
pub struct UserMessageResponse {
    pub message: &'static str,
    pub user: UserResponse,
}

/// Plain message response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Register a new user.
#[tracing::instrument(skip(state, credentials))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(credentials): AppJson<Credentials>,
) -> Result<(StatusCode, Json<UserMessageResponse>)> {
    let user = AuthService::new(state.pool())
        .register(&credentials.username, &credentials.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UserMessageResponse {
            message: "User registered successfully",
            user: user.into(),
        }),
    ))
}

/// Log in and start a session.
#[tracing::instrument(skip(state, session, credentials))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    AppJson(credentials): AppJson<Credentials>,
) -> Result<Json<UserMessageResponse>> {
    let user = AuthService::new(state.pool())
        .login(&credentials.username, &credentials.password)
        .await
        .inspect_err(|_| tracing::info!("Login failed"))?;

    let current = CurrentUser {
        id: user.id,
        username: user.username,
    };
    set_current_user(&session, &current).await?;

    tracing::info!(user_id = %current.id, "User logged in");

    Ok(Json(UserMessageResponse {
        message: "Logged in successfully",
        user: current.into(),
    }))
}

/// End the caller's session.
pub async fn logout(RequireAuth(user): RequireAuth, session: Session) -> Result<Json<MessageResponse>> {
    clear_current_user(&session).await?;

    tracing::info!(user_id = %user.id, "User logged out");

    Ok(Json(MessageResponse {
        message: "Logged out successfully",
    }))
}

/// Return the logged-in user.
pub async fn current_user(RequireAuth(user): RequireAuth) -> Json<UserResponse> {
    Json(user.into())
}

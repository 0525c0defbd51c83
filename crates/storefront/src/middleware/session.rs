//! Session middleware configuration.
//!
//! Sessions live in an in-memory store and vanish on restart. The cookie
//! only carries the session ID, signed with a key derived from
//! `STOREFRONT_SESSION_SECRET`, so a forged or altered cookie is ignored.

use secrecy::ExposeSecret;
use thiserror::Error;
use tower_sessions::cookie::{Key, SameSite, time::Duration};
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "pantry_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Session layer type used by the router.
pub type SessionLayer = SessionManagerLayer<MemoryStore, SignedCookie>;

/// Error building the session layer.
#[derive(Debug, Error)]
pub enum SessionConfigError {
    #[error("session secret is too short to derive a signing key")]
    WeakKey,
}

/// Create the session layer with an in-memory store and signed cookies.
///
/// # Errors
///
/// Returns `SessionConfigError::WeakKey` if the secret is shorter than the
/// 64 bytes the signing key requires.
pub fn create_session_layer(config: &StorefrontConfig) -> Result<SessionLayer, SessionConfigError> {
    let key = Key::try_from(config.session_secret.expose_secret().as_bytes())
        .map_err(|_| SessionConfigError::WeakKey)?;

    let layer = SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(SESSION_EXPIRY_SECONDS)))
        .with_secure(config.secure_cookies())
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key);

    Ok(layer)
}

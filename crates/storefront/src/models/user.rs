//! User domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};

use pantry_core::{UserId, Username};

/// A registered shopper.
///
/// The password hash is deliberately not part of this type; it is only ever
/// read by the credential check in the auth service.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login name (unique, case-sensitive).
    pub username: Username,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
}

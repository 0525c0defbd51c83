//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Credential store: registration and password login (Argon2id)
//! - `catalog` - Product creation and lookup
//! - `cart` - Cart ledger: merge-on-insert add and per-user listing
//!
//! Services borrow the connection pool for the duration of a request and
//! validate input into `pantry_core` types before any repository call.

pub mod auth;
pub mod cart;
pub mod catalog;

pub use auth::{AuthError, AuthService};
pub use cart::{CartError, CartService};
pub use catalog::{CatalogError, CatalogService};

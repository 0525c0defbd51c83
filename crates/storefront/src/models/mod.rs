//! Domain models for storefront.
//!
//! These are plain records returned by the repositories; serialization to
//! the wire happens in the route handlers' response types.

pub mod cart;
pub mod product;
pub mod session;
pub mod user;

pub use cart::{CartLine, CartLineView};
pub use product::Product;
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;

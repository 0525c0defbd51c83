//! Core types for Pantry.
//!
//! This module provides type-safe wrappers for the domain concepts that are
//! validated at the HTTP boundary.

pub mod id;
pub mod price;
pub mod product_name;
pub mod quantity;
pub mod username;

pub use id::*;
pub use price::{Price, PriceError};
pub use product_name::{ProductName, ProductNameError};
pub use quantity::{Quantity, QuantityError};
pub use username::{Username, UsernameError};

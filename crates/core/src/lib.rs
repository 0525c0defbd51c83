//! Pantry Core - Shared domain types.
//!
//! This crate provides the types shared by every Pantry component:
//! - `storefront` - JSON HTTP backend (catalog, cart, sessions)
//! - `cli` - Command-line tools for migrations, seeding and user management
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access, no HTTP. Everything that crosses the HTTP boundary is parsed into
//! one of these types before it reaches a repository.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, usernames, product names,
//!   prices and cart quantities

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

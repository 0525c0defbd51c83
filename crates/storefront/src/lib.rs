//! Pantry storefront library.
//!
//! JSON backend for a small shop: a product catalog, per-user carts that
//! merge repeated adds into one line, and password login with server-side
//! sessions. The binary in `main.rs` wires this up with Sentry and tracing;
//! integration tests drive `routes::app` directly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

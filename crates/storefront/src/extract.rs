//! Request extractors whose rejections are JSON `AppError`s.
//!
//! axum's own `Json` and `Path` reject with plain-text bodies and, for a
//! missing content type, 415. These wrappers turn every malformed body or
//! path parameter into `400 {"error": ...}`.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Typed path parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

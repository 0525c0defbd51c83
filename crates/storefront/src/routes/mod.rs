//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//! GET  /health/ready               - Readiness check (database)
//!
//! # Auth
//! POST /register                   - Create an account
//! POST /login                      - Start a session
//! POST /logout                     - End the session (requires auth)
//! GET  /current_user               - Logged-in user (requires auth)
//!
//! # Catalog
//! GET  /products                   - Product listing
//! POST /add_product                - Add a product
//! GET  /product/{id}               - Product detail
//!
//! # Cart (requires auth)
//! GET  /cart                       - The caller's cart
//! POST /add_to_cart/{product_id}   - Add to cart, merging quantities
//! ```

pub mod auth;
pub mod cart;
pub mod health;
pub mod products;

use axum::{
    Router,
    extract::Request,
    http::{HeaderValue, Method, header},
    middleware::from_fn,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::StorefrontConfig;
use crate::error::AppError;
use crate::middleware::{SessionConfigError, create_session_layer, request_id_middleware};
use crate::state::AppState;

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Health
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        // Auth
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/current_user", get(auth::current_user))
        // Catalog
        .route("/products", get(products::index))
        .route("/add_product", post(products::create))
        .route("/product/{id}", get(products::show))
        // Cart
        .route("/cart", get(cart::show))
        .route("/add_to_cart/{product_id}", post(cart::add))
        .fallback(not_found)
}

/// JSON 404 for unknown routes.
async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

/// Build the application router with its middleware stack.
///
/// Sentry layers are added by the binary on top of this.
///
/// # Errors
///
/// Returns `SessionConfigError` if the session signing key cannot be built.
pub fn app(state: AppState) -> Result<Router, SessionConfigError> {
    let session_layer = create_session_layer(state.config())?;
    let cors_layer = cors_layer(state.config());

    let router = routes()
        .layer(session_layer)
        .layer(cors_layer)
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state);

    Ok(router)
}

/// CORS for a single browser origin, with cookies.
///
/// Without a configured origin no CORS headers are sent and browsers keep
/// the API same-origin.
fn cors_layer(config: &StorefrontConfig) -> CorsLayer {
    let Some(origin) = config.cors_origin.as_deref() else {
        return CorsLayer::new();
    };

    match HeaderValue::from_str(origin) {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true),
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring invalid CORS origin");
            CorsLayer::new()
        }
    }
}

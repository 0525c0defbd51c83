//! CLI command implementations.

pub mod migrate;
pub mod seed;
pub mod user;

use pantry_storefront::{config::StorefrontConfig, db};
use sqlx::PgPool;

/// Connect to the storefront database named by the environment.
async fn connect() -> Result<PgPool, Box<dyn std::error::Error>> {
    let database_url = StorefrontConfig::database_url_from_env()?;

    tracing::info!("Connecting to storefront database...");
    Ok(db::create_pool(&database_url).await?)
}

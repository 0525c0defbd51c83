//! Seed the catalog.
//!
//! Products go through `CatalogService`, so the same name and price rules
//! apply as for `POST /add_product`. Seeding is not idempotent: product names
//! are not unique and running twice adds every product twice.

use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{error, info};

use pantry_storefront::services::CatalogService;

/// Demo catalog used when no file is given.
const DEMO_PRODUCTS: &[(&str, &str)] = &[
    ("Widget", "9.99"),
    ("Gadget", "24.50"),
    ("Sprocket", "3.75"),
    ("Gizmo", "129.00"),
    ("Doohickey", "0.99"),
];

/// One product entry in a seed file.
#[derive(Debug, Deserialize)]
pub struct SeedProduct {
    pub name: String,
    pub price: Decimal,
}

/// Seed products from a JSON file, or the demo catalog if `file_path` is `None`.
///
/// The file is parsed in full before anything is inserted.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, the database is
/// unreachable, or any product fails validation.
pub async fn products(file_path: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let products = match file_path {
        Some(file_path) => load_file(Path::new(file_path)).await?,
        None => demo_products()?,
    };

    info!(count = products.len(), "Parsed products");

    let pool = super::connect().await?;
    let catalog = CatalogService::new(&pool);

    let mut inserted = 0_usize;
    let mut failed = 0_usize;
    for product in &products {
        match catalog.add(&product.name, product.price).await {
            Ok(created) => {
                inserted += 1;
                info!(id = %created.id, name = %created.name, price = %created.price, "Inserted");
            }
            Err(e) => {
                failed += 1;
                error!(name = %product.name, "Skipped: {e}");
            }
        }
    }

    info!("Seeding complete!");
    info!("  Products inserted: {inserted}");

    if failed > 0 {
        return Err(format!("{failed} products failed to insert").into());
    }

    Ok(())
}

async fn load_file(path: &Path) -> Result<Vec<SeedProduct>, Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("File not found: {}", path.display()).into());
    }

    info!(path = %path.display(), "Loading products from file");

    let content = tokio::fs::read_to_string(path).await?;
    Ok(parse_products(&content)?)
}

fn parse_products(content: &str) -> Result<Vec<SeedProduct>, serde_json::Error> {
    serde_json::from_str(content)
}

fn demo_products() -> Result<Vec<SeedProduct>, rust_decimal::Error> {
    DEMO_PRODUCTS
        .iter()
        .map(|(name, price)| {
            Ok(SeedProduct {
                name: (*name).to_string(),
                price: Decimal::from_str(price)?,
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pantry_core::{Price, ProductName};

    use super::*;

    #[test]
    fn test_demo_products_are_valid() {
        for product in demo_products().unwrap() {
            assert!(ProductName::parse(&product.name).is_ok(), "{}", product.name);
            assert!(Price::new(product.price).is_ok(), "{}", product.price);
        }
    }

    #[test]
    fn test_parse_products() {
        let products =
            parse_products(r#"[{"name": "Widget", "price": 9.99}, {"name": "Nut", "price": "0.10"}]"#)
                .unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].price, Decimal::from_str("9.99").unwrap());
        assert_eq!(products[1].name, "Nut");
    }

    #[test]
    fn test_parse_products_rejects_missing_price() {
        assert!(parse_products(r#"[{"name": "Widget"}]"#).is_err());
    }
}

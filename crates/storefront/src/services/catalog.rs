//! Catalog service.
//!
//! Validates product input into `ProductName` and `Price` before anything
//! reaches the database. Duplicate names are allowed.

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

use pantry_core::{Price, PriceError, ProductId, ProductName, ProductNameError};

use crate::db::{ProductRepository, RepositoryError};
use crate::models::Product;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Name empty, blank or too long.
    #[error("invalid product name: {0}")]
    InvalidName(#[from] ProductNameError),

    /// Price negative, too precise or too large.
    #[error("invalid price: {0}")]
    InvalidPrice(#[from] PriceError),

    /// No product with this ID.
    #[error("product {0} not found")]
    NotFound(ProductId),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Catalog service.
pub struct CatalogService<'a> {
    products: ProductRepository<'a>,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            products: ProductRepository::new(pool),
        }
    }

    /// Add a product to the catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidName` or `CatalogError::InvalidPrice` for
    /// bad input, `CatalogError::Repository` if the insert fails.
    pub async fn add(&self, name: &str, price: Decimal) -> Result<Product, CatalogError> {
        let name = ProductName::parse(name)?;
        let price = Price::new(price)?;

        let product = self.products.create(&name, price).await?;

        tracing::info!(product_id = %product.id, "Product added");
        Ok(product)
    }

    /// List every product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.list().await?)
    }

    /// Get a single product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if there is no such product.
    pub async fn get(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.products
            .get(id)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use sqlx::postgres::PgPoolOptions;

    use super::*;

    fn lazy_pool() -> PgPool {
        PgPoolOptions::new()
            .connect_lazy("postgres://localhost/pantry_unreachable")
            .unwrap()
    }

    #[tokio::test]
    async fn test_add_rejects_empty_name() {
        let pool = lazy_pool();
        let result = CatalogService::new(&pool)
            .add("   ", Decimal::from_str("9.99").unwrap())
            .await;
        assert!(matches!(
            result,
            Err(CatalogError::InvalidName(ProductNameError::Empty))
        ));
    }

    #[tokio::test]
    async fn test_add_rejects_negative_price() {
        let pool = lazy_pool();
        let result = CatalogService::new(&pool)
            .add("Widget", Decimal::from_str("-1").unwrap())
            .await;
        assert!(matches!(
            result,
            Err(CatalogError::InvalidPrice(PriceError::Negative))
        ));
    }
}

//! Catalog product.

use chrono::{DateTime, Utc};

use pantry_core::{Price, ProductId, ProductName};

/// A purchasable product.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: ProductId,
    pub name: ProductName,
    pub price: Price,
    pub created_at: DateTime<Utc>,
}

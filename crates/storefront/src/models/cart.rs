//! Cart ledger types.

use chrono::{DateTime, Utc};

use pantry_core::{CartItemId, Price, ProductId, ProductName, Quantity, UserId};

/// A single line in a user's cart.
///
/// There is at most one line per (user, product); adding the same product
/// again increases `quantity` instead of creating a second line.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub id: CartItemId,
    /// Owner of the line.
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: Quantity,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A cart line joined with the product it references.
#[derive(Debug, Clone)]
pub struct CartLineView {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub quantity: Quantity,
    pub name: ProductName,
    pub price: Price,
}

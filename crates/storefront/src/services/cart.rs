//! Cart ledger service.
//!
//! Every entry point takes the owner's `UserId` as its first argument. Route
//! handlers obtain it from the authenticated session (`RequireAuth`), never
//! from the request path or body, so a user can only see and change their
//! own cart.

use sqlx::PgPool;
use thiserror::Error;

use pantry_core::{ProductId, Quantity, QuantityError, UserId};

use crate::db::{CartRepository, RepositoryError};
use crate::models::{CartLine, CartLineView};

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Zero, negative, or a merged total that overflows.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(#[from] QuantityError),

    /// The product to add does not exist.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(RepositoryError),
}

/// Cart ledger service.
pub struct CartService<'a> {
    cart: CartRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            cart: CartRepository::new(pool),
        }
    }

    /// Add a product to the user's cart, merging with an existing line.
    ///
    /// A missing `quantity` means one unit.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` if the quantity is below 1 or the
    /// merged total overflows.
    /// Returns `CartError::ProductNotFound` if the product does not exist; no
    /// line is created.
    pub async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: Option<i64>,
    ) -> Result<CartLine, CartError> {
        let quantity = quantity.map_or(Ok(Quantity::ONE), Quantity::new)?;

        let line = self
            .cart
            .add(user_id, product_id, quantity)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => CartError::ProductNotFound(product_id),
                RepositoryError::OutOfRange(_) => {
                    CartError::InvalidQuantity(QuantityError::TooLarge { max: Quantity::MAX })
                }
                other => CartError::Repository(other),
            })?;

        tracing::info!(
            user_id = %user_id,
            product_id = %product_id,
            quantity = %line.quantity,
            "Cart line updated"
        );
        Ok(line)
    }

    /// List the user's cart with product names and prices.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the query fails.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<CartLineView>, CartError> {
        self.cart
            .list_for_user(user_id)
            .await
            .map_err(CartError::Repository)
    }
}

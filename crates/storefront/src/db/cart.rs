//! Cart ledger repository.
//!
//! # Merge-on-insert
//!
//! Adding a product to a cart either creates the (user, product) line or
//! increments the existing one. The look-up and the write run in one
//! transaction that first takes `pg_advisory_xact_lock(user_id, product_id)`,
//! so two concurrent adds for the same pair are applied one after the other:
//! neither can observe "no line" while the other is inserting, and no
//! increment is lost. The lock is released on commit or rollback. The
//! `UNIQUE (user_id, product_id)` constraint backs this up.
//!
//! Every query takes the owning `UserId` as a parameter; there is no way to
//! read or write a line without naming its owner.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, instrument};

use pantry_core::{CartItemId, Price, ProductId, ProductName, Quantity, UserId};

use super::{RepositoryError, map_unique_violation};
use crate::models::{CartLine, CartLineView};

#[derive(sqlx::FromRow)]
struct CartLineRow {
    id: CartItemId,
    user_id: UserId,
    product_id: ProductId,
    quantity: Quantity,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CartLineRow> for CartLine {
    fn from(row: CartLineRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            product_id: row.product_id,
            quantity: row.quantity,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CartLineViewRow {
    id: CartItemId,
    product_id: ProductId,
    quantity: Quantity,
    name: String,
    price: Price,
}

impl TryFrom<CartLineViewRow> for CartLineView {
    type Error = RepositoryError;

    fn try_from(row: CartLineViewRow) -> Result<Self, Self::Error> {
        let name = ProductName::parse(&row.name).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid product name in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            product_id: row.product_id,
            quantity: row.quantity,
            name,
            price: row.price,
        })
    }
}

/// Repository for cart line operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Add `quantity` units of a product to a user's cart.
    ///
    /// Creates the line if the user has none for this product, otherwise
    /// increments the existing line. Returns the line with its final quantity.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist
    /// (nothing is written).
    /// Returns `RepositoryError::OutOfRange` if the merged quantity overflows.
    /// Returns `RepositoryError::Database` for other database errors; the
    /// transaction is rolled back.
    #[instrument(skip(self), fields(user_id = %user_id, product_id = %product_id))]
    pub async fn add(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: Quantity,
    ) -> Result<CartLine, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let (product_exists,): (bool,) = sqlx::query_as(
            r"
            SELECT EXISTS(SELECT 1 FROM pantry.product WHERE id = $1)
            ",
        )
        .bind(product_id)
        .fetch_one(&mut *tx)
        .await?;

        if !product_exists {
            return Err(RepositoryError::NotFound);
        }

        // Held until the transaction ends.
        sqlx::query("SELECT pg_advisory_xact_lock($1, $2)")
            .bind(user_id)
            .bind(product_id)
            .execute(&mut *tx)
            .await?;

        let existing: Option<CartLineRow> = sqlx::query_as(
            r"
            SELECT id, user_id, product_id, quantity, created_at, updated_at
            FROM pantry.cart_item
            WHERE user_id = $1 AND product_id = $2
            FOR UPDATE
            ",
        )
        .bind(user_id)
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?;

        let row: CartLineRow = match existing {
            Some(line) => {
                let merged = line
                    .quantity
                    .checked_add(quantity)
                    .map_err(|e| RepositoryError::OutOfRange(e.to_string()))?;

                debug!(
                    previous = %line.quantity,
                    added = %quantity,
                    merged = %merged,
                    "Merging into existing cart line"
                );

                sqlx::query_as(
                    r"
                    UPDATE pantry.cart_item
                    SET quantity = $1, updated_at = NOW()
                    WHERE id = $2 AND user_id = $3
                    RETURNING id, user_id, product_id, quantity, created_at, updated_at
                    ",
                )
                .bind(merged)
                .bind(line.id)
                .bind(user_id)
                .fetch_one(&mut *tx)
                .await?
            }
            None => {
                debug!(added = %quantity, "Creating cart line");

                sqlx::query_as(
                    r"
                    INSERT INTO pantry.cart_item (user_id, product_id, quantity)
                    VALUES ($1, $2, $3)
                    RETURNING id, user_id, product_id, quantity, created_at, updated_at
                    ",
                )
                .bind(user_id)
                .bind(product_id)
                .bind(quantity)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| map_unique_violation(e, "cart line"))?
            }
        };

        tx.commit().await?;

        Ok(CartLine::from(row))
    }

    /// List a user's cart lines joined with product name and price.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<CartLineView>, RepositoryError> {
        let rows: Vec<CartLineViewRow> = sqlx::query_as(
            r"
            SELECT c.id, c.product_id, c.quantity, p.name, p.price
            FROM pantry.cart_item c
            JOIN pantry.product p ON p.id = c.product_id
            WHERE c.user_id = $1
            ORDER BY c.product_id ASC
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(CartLineView::try_from).collect()
    }
}

//! Cart route handlers.
//!
//! Both handlers take `RequireAuth` as their first extractor, so an anonymous
//! request is rejected with 401 before the path or body is looked at, and the
//! cart owner is always the session's user.

use axum::{Json, body::Bytes, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use pantry_core::{CartItemId, Price, ProductId, ProductName, Quantity};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::extract::AppPath;
use crate::middleware::RequireAuth;
use crate::models::CartLineView;
use crate::services::CartService;
use crate::state::AppState;

/// Optional body of `POST /add_to_cart/{product_id}`.
#[derive(Debug, Default, Deserialize)]
pub struct AddToCartBody {
    pub quantity: Option<i64>,
}

impl AddToCartBody {
    /// Parse the request body. An empty body means "one unit".
    fn parse(body: &[u8]) -> Result<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        serde_json::from_slice(body)
            .map_err(|e| AppError::BadRequest(format!("Failed to parse the request body as JSON: {e}")))
    }
}

/// A cart line as shown to its owner.
#[derive(Debug, Serialize)]
pub struct CartLineResponse {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub quantity: Quantity,
    pub name: ProductName,
    pub price: Price,
}

impl From<CartLineView> for CartLineResponse {
    fn from(line: CartLineView) -> Self {
        Self {
            id: line.id,
            product_id: line.product_id,
            quantity: line.quantity,
            name: line.name,
            price: line.price,
        }
    }
}

/// The line touched by an add-to-cart.
#[derive(Debug, Serialize)]
pub struct CartItemSummary {
    pub product_id: ProductId,
    pub quantity: Quantity,
}

/// Response to an add-to-cart.
#[derive(Debug, Serialize)]
pub struct AddToCartResponse {
    pub message: &'static str,
    #[serde(rename = "cartItem")]
    pub cart_item: CartItemSummary,
}

/// Show the caller's cart.
pub async fn show(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<CartLineResponse>>> {
    let lines = CartService::new(state.pool()).list(user.id).await?;

    Ok(Json(lines.into_iter().map(CartLineResponse::from).collect()))
}

/// Add a product to the caller's cart.
///
/// The response carries the line's merged quantity, not just the amount added.
#[tracing::instrument(skip(user, state, body), fields(user_id = %user.id))]
pub async fn add(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    AppPath(product_id): AppPath<i32>,
    body: Bytes,
) -> Result<(StatusCode, Json<AddToCartResponse>)> {
    let body = AddToCartBody::parse(&body)?;
    let product_id = ProductId::new(product_id);

    let line = CartService::new(state.pool())
        .add_item(user.id, product_id, body.quantity)
        .await?;

    let product_ref = product_id.to_string();
    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", product_ref.as_str())]),
    );

    Ok((
        StatusCode::CREATED,
        Json(AddToCartResponse {
            message: "Product added to cart",
            cart_item: CartItemSummary {
                product_id: line.product_id,
                quantity: line.quantity,
            },
        }),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_defaults_to_no_quantity() {
        assert!(AddToCartBody::parse(b"").unwrap().quantity.is_none());
        assert!(AddToCartBody::parse(b"  \n").unwrap().quantity.is_none());
        assert!(AddToCartBody::parse(b"{}").unwrap().quantity.is_none());
    }

    #[test]
    fn test_body_quantity_is_read() {
        assert_eq!(
            AddToCartBody::parse(br#"{"quantity": 3}"#).unwrap().quantity,
            Some(3)
        );
    }

    #[test]
    fn test_malformed_body_is_bad_request() {
        assert!(matches!(
            AddToCartBody::parse(b"{not json"),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            AddToCartBody::parse(br#"{"quantity": "lots"}"#),
            Err(AppError::BadRequest(_))
        ));
    }
}

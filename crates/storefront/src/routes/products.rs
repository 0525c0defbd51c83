//! Catalog route handlers.

use axum::{Json, extract::State, http::StatusCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pantry_core::{Price, ProductId, ProductName};

use crate::error::Result;
use crate::extract::{AppJson, AppPath};
use crate::models::Product;
use crate::services::CatalogService;
use crate::state::AppState;

/// Body of `POST /add_product`.
///
/// The price arrives as a JSON number (or numeric string) and is validated by
/// the catalog service.
#[derive(Debug, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
}

/// Public view of a product.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: ProductId,
    pub name: ProductName,
    pub price: Price,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
        }
    }
}

/// Response to a product creation.
#[derive(Debug, Serialize)]
pub struct ProductCreatedResponse {
    pub message: &'static str,
    pub product: ProductResponse,
}

/// List every product.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<ProductResponse>>> {
    let products = CatalogService::new(state.pool()).list().await?;

    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

/// Add a product to the catalog.
#[tracing::instrument(skip(state))]
pub async fn create(
    State(state): State<AppState>,
    AppJson(body): AppJson<NewProduct>,
) -> Result<(StatusCode, Json<ProductCreatedResponse>)> {
    let product = CatalogService::new(state.pool())
        .add(&body.name, body.price)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ProductCreatedResponse {
            message: "Product added successfully",
            product: product.into(),
        }),
    ))
}

/// Show a single product.
pub async fn show(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<ProductResponse>> {
    let product = CatalogService::new(state.pool())
        .get(ProductId::new(id))
        .await?;

    Ok(Json(product.into()))
}

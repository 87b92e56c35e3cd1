//! Handlers for product endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::collections::BTreeSet;
use validator::Validate;

use crate::api::dto::product::{
    CreateProductRequest, ProductItem, ProductListParams, ProductListResponse,
    UpdateProductDistributorsRequest,
};
use crate::domain::entities::NewProduct;
use crate::error::AppError;
use crate::state::AppState;

/// Lists products, optionally only those a distributor carries.
///
/// # Endpoint
///
/// `GET /products?distributor_id=3`
pub async fn product_list_handler(
    State(state): State<AppState>,
    Query(params): Query<ProductListParams>,
) -> Result<Json<ProductListResponse>, AppError> {
    let products = state
        .product_service
        .list_products(params.distributor_id)
        .await?;

    Ok(Json(ProductListResponse {
        items: products.into_iter().map(Into::into).collect(),
    }))
}

/// # Endpoint
///
/// `GET /products/{id}`
pub async fn product_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<ProductItem>, AppError> {
    let product = state.product_service.get_product(id).await?;
    Ok(Json(product.into()))
}

/// # Endpoint
///
/// `POST /admin/products`
///
/// # Errors
///
/// Returns 404 if the supplier or a distributor does not exist.
/// Returns 409 if the name is already taken.
pub async fn create_product_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductItem>), AppError> {
    payload.validate()?;

    let product = state
        .product_service
        .create_product(NewProduct {
            name: payload.name,
            description: payload.description,
            supplier_id: payload.supplier_id,
            distributor_ids: payload.distributor_ids.into_iter().collect(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(product.into())))
}

/// Replaces the distributors carrying a product.
///
/// # Endpoint
///
/// `PUT /admin/products/{id}/distributors`
pub async fn update_product_distributors_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateProductDistributorsRequest>,
) -> Result<Json<ProductItem>, AppError> {
    let distributor_ids: BTreeSet<i64> = payload.distributor_ids.into_iter().collect();

    let product = state
        .product_service
        .set_distributors(id, distributor_ids)
        .await?;

    Ok(Json(product.into()))
}

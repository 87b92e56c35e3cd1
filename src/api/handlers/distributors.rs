//! Handlers for distributor endpoints, public and admin.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::distributor::{
    BulkUpdateDistributorsRequest, BulkUpdateResponse, CreateDistributorRequest, DistributorItem,
    DistributorListResponse, UpdateDistributorRequest,
};
use crate::api::dto::product::{ProductItem, ProductListResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Lists active distributors.
///
/// # Endpoint
///
/// `GET /distributors`
pub async fn distributor_list_handler(
    State(state): State<AppState>,
) -> Result<Json<DistributorListResponse>, AppError> {
    let distributors = state.distributor_service.list_distributors(true).await?;

    Ok(Json(DistributorListResponse {
        items: distributors.into_iter().map(Into::into).collect(),
    }))
}

/// Shows one distributor, including an inactive one.
///
/// # Endpoint
///
/// `GET /distributors/{id}`, `GET /admin/distributors/{id}`
pub async fn distributor_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<DistributorItem>, AppError> {
    let distributor = state.distributor_service.get_distributor(id).await?;
    Ok(Json(distributor.into()))
}

/// Lists the products a distributor carries.
///
/// # Endpoint
///
/// `GET /distributors/{id}/products`
pub async fn distributor_products_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<ProductListResponse>, AppError> {
    state.distributor_service.get_distributor(id).await?;
    let products = state.product_service.list_products(Some(id)).await?;

    Ok(Json(ProductListResponse {
        items: products.into_iter().map(ProductItem::from).collect(),
    }))
}

/// Lists all distributors, including inactive ones.
///
/// # Endpoint
///
/// `GET /admin/distributors`
pub async fn admin_distributor_list_handler(
    State(state): State<AppState>,
) -> Result<Json<DistributorListResponse>, AppError> {
    let distributors = state.distributor_service.list_distributors(false).await?;

    Ok(Json(DistributorListResponse {
        items: distributors.into_iter().map(Into::into).collect(),
    }))
}

/// Creates a distributor.
///
/// # Endpoint
///
/// `POST /admin/distributors`
///
/// # Errors
///
/// Returns 400 if the name or email is invalid.
/// Returns 409 if the name is already taken.
pub async fn create_distributor_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateDistributorRequest>,
) -> Result<(StatusCode, Json<DistributorItem>), AppError> {
    payload.validate()?;

    let distributor = state
        .distributor_service
        .create_distributor(payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(distributor.into())))
}

/// Partially updates a distributor.
///
/// # Endpoint
///
/// `PATCH /admin/distributors/{id}`
///
/// All fields are optional. `null` clears `description`, `email` or `pickup_address`.
pub async fn update_distributor_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateDistributorRequest>,
) -> Result<Json<DistributorItem>, AppError> {
    payload.validate()?;

    let distributor = state
        .distributor_service
        .update_distributor(id, payload.into())
        .await?;

    Ok(Json(distributor.into()))
}

/// Deletes a distributor.
///
/// # Endpoint
///
/// `DELETE /admin/distributors/{id}`
///
/// # Errors
///
/// Returns 404 if the distributor does not exist.
/// Returns 409 if any order is bound to it; deactivate it instead.
pub async fn delete_distributor_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.distributor_service.delete_distributor(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Activates or deactivates several distributors.
///
/// # Endpoint
///
/// `POST /admin/distributors/bulk_update`
pub async fn bulk_update_distributors_handler(
    State(state): State<AppState>,
    Json(payload): Json<BulkUpdateDistributorsRequest>,
) -> Result<Json<BulkUpdateResponse>, AppError> {
    payload.validate()?;

    let updated = state
        .distributor_service
        .bulk_set_active(payload.ids, payload.is_active)
        .await?;

    Ok(Json(BulkUpdateResponse { updated }))
}

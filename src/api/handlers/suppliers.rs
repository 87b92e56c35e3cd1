//! Handlers for supplier endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::supplier::{
    CreateSupplierRequest, SupplierItem, SupplierListResponse, UpdateSupplierRequest,
};
use crate::error::AppError;
use crate::state::AppState;

/// # Endpoint
///
/// `GET /suppliers` and `GET /admin/suppliers`
pub async fn supplier_list_handler(
    State(state): State<AppState>,
) -> Result<Json<SupplierListResponse>, AppError> {
    let suppliers = state.supplier_service.list_suppliers().await?;

    Ok(Json(SupplierListResponse {
        items: suppliers.into_iter().map(Into::into).collect(),
    }))
}

/// # Endpoint
///
/// `GET /suppliers/{id}`, `GET /admin/suppliers/{id}`
pub async fn supplier_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<SupplierItem>, AppError> {
    let supplier = state.supplier_service.get_supplier(id).await?;
    Ok(Json(supplier.into()))
}

/// # Endpoint
///
/// `POST /admin/suppliers`
///
/// # Errors
///
/// Returns 400 if the name or email is invalid.
/// Returns 409 if the name is already taken.
pub async fn create_supplier_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateSupplierRequest>,
) -> Result<(StatusCode, Json<SupplierItem>), AppError> {
    payload.validate()?;

    let supplier = state
        .supplier_service
        .create_supplier(payload.name, payload.description, payload.email)
        .await?;

    Ok((StatusCode::CREATED, Json(supplier.into())))
}

/// # Endpoint
///
/// `PATCH /admin/suppliers/{id}`
pub async fn update_supplier_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateSupplierRequest>,
) -> Result<Json<SupplierItem>, AppError> {
    payload.validate()?;

    let supplier = state
        .supplier_service
        .update_supplier(id, payload.into())
        .await?;

    Ok(Json(supplier.into()))
}

/// Deletes a supplier. Its products stay in the catalog without a supplier.
///
/// # Endpoint
///
/// `DELETE /admin/suppliers/{id}`
pub async fn delete_supplier_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.supplier_service.delete_supplier(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

//! Handlers for enterprise administration.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::enterprise::{
    BulkUpdateEnterprisesRequest, CreateEnterpriseRequest, EnterpriseItem,
    EnterpriseListResponse, UpdateEnterpriseRequest,
};
use crate::error::AppError;
use crate::state::AppState;

/// # Endpoint
///
/// `GET /admin/enterprises`
pub async fn enterprise_list_handler(
    State(state): State<AppState>,
) -> Result<Json<EnterpriseListResponse>, AppError> {
    let enterprises = state.enterprise_service.list_enterprises().await?;

    Ok(Json(EnterpriseListResponse {
        items: enterprises.into_iter().map(Into::into).collect(),
    }))
}

/// # Endpoint
///
/// `GET /admin/enterprises/{id}`
pub async fn enterprise_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<EnterpriseItem>, AppError> {
    let enterprise = state.enterprise_service.get_enterprise(id).await?;
    Ok(Json(enterprise.into()))
}

/// # Endpoint
///
/// `POST /admin/enterprises`
pub async fn create_enterprise_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateEnterpriseRequest>,
) -> Result<(StatusCode, Json<EnterpriseItem>), AppError> {
    payload.validate()?;

    let enterprise = state
        .enterprise_service
        .create_enterprise(payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(enterprise.into())))
}

/// # Endpoint
///
/// `PATCH /admin/enterprises/{id}`
pub async fn update_enterprise_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateEnterpriseRequest>,
) -> Result<Json<EnterpriseItem>, AppError> {
    payload.validate()?;

    let enterprise = state
        .enterprise_service
        .update_enterprise(id, payload.into())
        .await?;

    Ok(Json(enterprise.into()))
}

/// Applies the admin list's edits in one transaction.
///
/// # Endpoint
///
/// `POST /admin/enterprises/bulk_update`
///
/// # Request Body
///
/// ```json
/// { "enterprises": [ { "id": 1, "is_distributor": true }, { "id": 2, "name": "Co-op" } ] }
/// ```
///
/// # Errors
///
/// Returns 400 if the batch is empty or lists an enterprise twice.
/// Returns 404 if any enterprise does not exist; nothing is changed.
pub async fn bulk_update_enterprises_handler(
    State(state): State<AppState>,
    Json(payload): Json<BulkUpdateEnterprisesRequest>,
) -> Result<Json<EnterpriseListResponse>, AppError> {
    payload.validate()?;

    let updates = payload
        .enterprises
        .into_iter()
        .map(|item| item.into_update())
        .collect();

    let enterprises = state.enterprise_service.bulk_update(updates).await?;

    Ok(Json(EnterpriseListResponse {
        items: enterprises.into_iter().map(Into::into).collect(),
    }))
}

/// # Endpoint
///
/// `DELETE /admin/enterprises/{id}`
pub async fn delete_enterprise_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.enterprise_service.delete_enterprise(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

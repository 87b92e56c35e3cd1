//! Handlers for the shopper's cart.
//!
//! The cart is identified by the `cart_token` cookie. Responses that start a
//! new cart set the cookie; rejected requests never do.

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Response},
};
use validator::Validate;

use crate::api::dto::cart::{CartResponse, PopulateRequest};
use crate::application::services::{CartOutcome, PopulateItems};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::cart_token::{set_cookie_header, token_from_headers};

fn outcome_response(state: &AppState, outcome: CartOutcome) -> Result<Response, AppError> {
    if outcome.created {
        let cookie = set_cookie_header(&outcome.order.token, state.cart_cookie_secure)?;
        let body = Json(CartResponse::from(outcome.order));
        return Ok(([(header::SET_COOKIE, cookie)], body).into_response());
    }

    let body = Json(CartResponse::from(outcome.order));
    Ok(body.into_response())
}

/// Returns the current cart.
///
/// # Endpoint
///
/// `GET /cart`
///
/// Without a cart cookie (or with an unknown one) the empty cart
/// representation is returned and no cart is created.
pub async fn cart_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CartResponse>, AppError> {
    let token = token_from_headers(&headers);
    let cart = state.cart_service.get_cart(token.as_deref()).await?;

    Ok(Json(cart.map_or_else(CartResponse::empty, Into::into)))
}

/// Adds products to the cart.
///
/// # Endpoint
///
/// `PUT /orders/populate`
///
/// # Request Body
///
/// ```json
/// { "variants": { "12": 2 }, "distributor_id": 3 }
/// ```
///
/// # Errors
///
/// Returns 400 if the body is invalid.
/// Returns 404 if a product does not exist.
/// Returns 422 with one of `no_distributor`, `product_not_at_distributor`,
/// `distributor_mismatch` when the cart guard refuses the products. The cart
/// is left exactly as it was.
pub async fn populate_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<PopulateRequest>,
) -> Result<Response, AppError> {
    payload.validate()?;

    let token = token_from_headers(&headers);
    let items = PopulateItems {
        variants: payload.variants,
        distributor_id: payload.distributor_id,
    };

    let outcome = state.cart_service.populate(token.as_deref(), items).await?;

    outcome_response(&state, outcome)
}

/// Empties the cart and releases its distributor.
///
/// # Endpoint
///
/// `DELETE /cart`
pub async fn empty_cart_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CartResponse>, AppError> {
    let token = token_from_headers(&headers);
    let cart = state.cart_service.empty_cart(token.as_deref()).await?;

    Ok(Json(cart.map_or_else(CartResponse::empty, Into::into)))
}

/// Chooses the distributor to shop from.
///
/// # Endpoint
///
/// `GET /distributors/{id}/select`
///
/// # Errors
///
/// Returns 404 if the distributor does not exist.
/// Returns 422 `distributor_mismatch` if the cart holds items from another distributor.
pub async fn select_distributor_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let token = token_from_headers(&headers);
    let outcome = state
        .cart_service
        .select_distributor(token.as_deref(), id)
        .await?;

    outcome_response(&state, outcome)
}

/// Clears the chosen distributor.
///
/// # Endpoint
///
/// `GET /distributors/deselect`
///
/// # Errors
///
/// Returns 422 `cart_not_empty` if the cart holds items.
pub async fn deselect_distributor_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CartResponse>, AppError> {
    let token = token_from_headers(&headers);
    let cart = state
        .cart_service
        .deselect_distributor(token.as_deref())
        .await?;

    Ok(Json(cart.map_or_else(CartResponse::empty, Into::into)))
}

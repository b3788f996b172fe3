use axum::extract::{Path, State};
use axum::Json;
use axum::response::{IntoResponse, Response};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::handlers::auth::CurrentUser;
use crate::state::AppState;
use crate::store::LedgerStore;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

/// A seller may list at most this many units in one request.
const MAX_LISTING_QUANTITY: i32 = 50;

#[derive(Deserialize)]
pub struct CreateListingRequest {
    pub event_id: Uuid,
    pub price: Decimal,
    pub quantity: i32,
}

#[derive(Deserialize)]
pub struct UpdatePriceRequest {
    pub current_price: Decimal,
}

#[derive(Deserialize)]
pub struct PurchaseRequest {
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    /// Held by the client for the lifetime of one purchase attempt and
    /// reused across retries of that attempt.
    pub idempotency_key: Option<String>,
}

fn default_quantity() -> i32 {
    1
}

/// Active catalog, one row per listing with live availability.
pub async fn list_catalog(State(state): State<AppState>) -> Result<Response, AppError> {
    let entries = state.ledger.catalog().await?;
    Ok(success(entries, "Tickets fetched").into_response())
}

pub async fn get_unit(
    State(state): State<AppState>,
    Path(unit_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let unit = state
        .ledger
        .get_unit(unit_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Ticket not found.".to_string()))?;

    Ok(success(unit, "Ticket fetched").into_response())
}

pub async fn create_listing(
    State(state): State<AppState>,
    CurrentUser(seller): CurrentUser,
    Json(req): Json<CreateListingRequest>,
) -> Result<Response, AppError> {
    if req.price < Decimal::ZERO {
        return Err(AppError::ValidationError(
            "Price must not be negative".to_string(),
        ));
    }
    if req.quantity < 1 || req.quantity > MAX_LISTING_QUANTITY {
        return Err(AppError::ValidationError(format!(
            "Quantity must be between 1 and {}",
            MAX_LISTING_QUANTITY
        )));
    }

    let units = state
        .ledger
        .create_listing(seller, req.event_id, req.price, req.quantity)
        .await?;

    Ok(created(units, "Tickets listed").into_response())
}

pub async fn update_price(
    State(state): State<AppState>,
    CurrentUser(seller): CurrentUser,
    Path(unit_id): Path<Uuid>,
    Json(req): Json<UpdatePriceRequest>,
) -> Result<Response, AppError> {
    if req.current_price < Decimal::ZERO {
        return Err(AppError::ValidationError(
            "Price must not be negative".to_string(),
        ));
    }

    let unit = state
        .ledger
        .update_price(unit_id, seller, req.current_price)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("No active ticket of yours matches that id.".to_string())
        })?;

    Ok(success(unit, "Price updated").into_response())
}

pub async fn remove_unit(
    State(state): State<AppState>,
    CurrentUser(seller): CurrentUser,
    Path(unit_id): Path<Uuid>,
) -> Result<Response, AppError> {
    state
        .ledger
        .remove_unit(unit_id, seller)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("No active ticket of yours matches that id.".to_string())
        })?;

    Ok(empty_success("Ticket removed").into_response())
}

/// The purchase entry point. Identity is optional at extraction time so the
/// engine can raise its own NotAuthenticated precondition.
pub async fn purchase(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    Path(unit_id): Path<Uuid>,
    Json(req): Json<PurchaseRequest>,
) -> Result<Response, AppError> {
    let buyer = user.map(|u| u.0);

    let tx = state
        .engine
        .purchase(unit_id, req.quantity, req.idempotency_key, buyer)
        .await?;

    Ok(success(tx, "Purchase settled").into_response())
}

use axum::extract::State;
use axum::response::{IntoResponse, Response};

use crate::handlers::auth::CurrentUser;
use crate::state::AppState;
use crate::store::LedgerStore;
use crate::utils::error::AppError;
use crate::utils::response::success;

pub async fn me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Response, AppError> {
    let profile = state
        .ledger
        .get_profile(user)
        .await?
        .ok_or_else(|| AppError::NotFound("Your profile was not found.".to_string()))?;

    Ok(success(profile, "Profile fetched").into_response())
}

pub async fn my_purchases(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Response, AppError> {
    let purchases = state.ledger.purchases_for(user).await?;
    Ok(success(purchases, "Purchases fetched").into_response())
}

pub async fn my_listings(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Response, AppError> {
    let units = state.ledger.units_for_owner(user).await?;
    Ok(success(units, "Listings fetched").into_response())
}

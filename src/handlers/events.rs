use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::handlers::auth::CurrentUser;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub name: String,
    pub datetime: DateTime<Utc>,
    pub venue: Option<String>,
    pub image_url: Option<String>,
}

pub async fn list_events(State(state): State<AppState>) -> Result<Response, AppError> {
    let events = state.ledger.list_events().await?;
    Ok(success(events, "Events fetched").into_response())
}

pub async fn create_event(
    State(state): State<AppState>,
    CurrentUser(_creator): CurrentUser,
    Json(req): Json<CreateEventRequest>,
) -> Result<Response, AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::ValidationError(
            "Event name must not be empty".to_string(),
        ));
    }

    let event = state
        .ledger
        .create_event(
            req.name.trim(),
            req.datetime,
            req.venue.as_deref(),
            req.image_url.as_deref(),
        )
        .await?;

    Ok(created(event, "Event created").into_response())
}

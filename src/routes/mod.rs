use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::{events, health_check, profile, tickets};
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/events", get(events::list_events).post(events::create_event))
        .route(
            "/tickets",
            get(tickets::list_catalog).post(tickets::create_listing),
        )
        .route(
            "/tickets/:id",
            get(tickets::get_unit).delete(tickets::remove_unit),
        )
        .route("/tickets/:id/price", patch(tickets::update_price))
        .route("/tickets/:id/purchase", post(tickets::purchase))
        .route("/me", get(profile::me))
        .route("/me/purchases", get(profile::my_purchases))
        .route("/me/listings", get(profile::my_listings))
        .layer(create_security_headers_layer())
        .layer(create_cors_layer())
        .with_state(state)
}

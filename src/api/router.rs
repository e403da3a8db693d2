use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{AppState, cancel_booking, create_booking, list_available_rooms};

/// Creates the API router with all room booking endpoints
///
/// Command endpoints:
/// - POST /bookings - Book a room
/// - DELETE /bookings/:id - Cancel a booking
///
/// Query endpoints:
/// - GET /rooms/available - Rooms free for a time range
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .route("/bookings", post(create_booking))
        .route("/bookings/:id", delete(cancel_booking))
        .route("/rooms/available", get(list_available_rooms))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

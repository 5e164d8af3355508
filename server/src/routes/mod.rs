use axum::{
    http::HeaderName,
    routing::{get, post},
    Router,
};
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::request_id::REQUEST_ID_HEADER;
use crate::config::{create_cors_layer, BookingRequestId, Config, SecurityHeadersLayer};
use crate::handlers::{admin, bookings, health_check, properties, rooms};
use crate::state::AppState;

/// Booking API routes without middleware.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/properties", get(properties::list))
        .route("/properties/:property_id", get(properties::details))
        .route(
            "/properties/:property_id/room-status",
            get(properties::room_status),
        )
        .route("/rooms/:room_id", get(rooms::get))
        .route(
            "/rooms/:room_id/reviews",
            get(rooms::list_reviews).post(rooms::create_review),
        )
        .route("/bookings", post(bookings::create_booking))
        .route("/bookings/:booking_id/cancel", post(bookings::cancel))
        .route("/users/:user_id/bookings", get(bookings::list_for_user))
        .route("/admin/reconcile", post(admin::reconcile))
}

pub fn create_routes(state: AppState, config: &Config) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    api_routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, BookingRequestId))
        .layer(SecurityHeadersLayer::new(config.production))
        .layer(create_cors_layer(config.cors_allowed_origins.as_deref()))
}

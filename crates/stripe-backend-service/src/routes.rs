//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{health, payments};
use crate::state::AppState;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// - `GET /` - Liveness
/// - `POST /api/stripe/createApi` - Find/create customer, ephemeral key and payment intent
/// - `POST /api/stripe/payApi` - Attach payment method and confirm payment intent
///
/// No server-side request timeout is applied; outbound Stripe calls are
/// bounded by the Stripe client's own timeout.
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors = build_cors_layer(&state.config.cors_origins);
    let max_body_bytes = state.config.max_body_bytes;

    let state = Arc::new(state);

    let stripe_routes = Router::new()
        .route("/createApi", post(payments::create_payment_setup))
        .route("/payApi", post(payments::confirm_payment));

    Router::new()
        .route("/", get(health::liveness))
        .nest("/api/stripe", stripe_routes)
        // Middleware; ApiError already logs server failures once
        .layer(TraceLayer::new_for_http().on_failure(()))
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

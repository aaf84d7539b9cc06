//! HTTP facade over the Stripe payment API.
//!
//! This crate exposes two payment endpoints plus a liveness route:
//!
//! - `POST /api/stripe/createApi` finds or creates a Stripe customer by email,
//!   mints an ephemeral key and creates a payment intent
//! - `POST /api/stripe/payApi` attaches a payment method to a customer and
//!   confirms a payment intent with it
//! - `GET /` reports liveness
//!
//! The service keeps no state of its own. Stripe is the only source of truth
//! for customers, intents and payment methods, and every provider failure is
//! reported to callers as a generic 500.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod stripe;
pub mod workflow;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
pub use stripe::{StripeApi, StripeClient, StripeError};
pub use workflow::{CustomerMatch, PaymentWorkflow, WorkflowError};

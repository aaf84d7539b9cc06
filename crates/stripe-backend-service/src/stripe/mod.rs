//! Stripe integration for customers and payment intents.
//!
//! Stripe handles:
//! - Customer lookup and registration
//! - Ephemeral keys for mobile/web SDKs
//! - Payment intent creation and confirmation
//! - Payment method attachment

pub mod api;
pub mod client;
pub mod types;

pub use api::StripeApi;
pub use client::{StripeClient, StripeClientOptions, StripeError};
pub use types::*;

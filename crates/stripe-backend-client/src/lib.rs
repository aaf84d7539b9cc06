//! Stripe Backend Client SDK.
//!
//! This crate provides a client library for applications that talk to the
//! stripe-backend service.
//!
//! # Example
//!
//! ```no_run
//! use stripe_backend_client::StripeBackendClient;
//!
//! # async fn example() -> Result<(), stripe_backend_client::ClientError> {
//! let client = StripeBackendClient::new("http://localhost:3001")?;
//!
//! // Create a customer (or reuse one) and a $25 payment intent
//! let setup = client
//!     .create_payment_setup("Ada Lovelace", "ada@example.com", 25)
//!     .await?;
//!
//! // Later, once the app has collected a payment method
//! let confirmation = client
//!     .confirm_payment("pm_card_visa", setup.payment_intent_id().unwrap_or_default(), &setup.customer)
//!     .await?;
//!
//! println!("Confirmed: {}", confirmation.success);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod types;

pub use client::{ClientOptions, StripeBackendClient};
pub use error::ClientError;
pub use types::*;

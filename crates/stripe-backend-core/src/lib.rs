//! Core types and request validation for stripe-backend.
//!
//! This crate provides the foundational types used by the service and its client:
//!
//! - **Identifiers**: `CustomerId`, `PaymentIntentId`, `PaymentMethodId`
//! - **Amounts**: `Amount` (whole currency units) and its minor-unit conversion
//! - **Inputs**: `PaymentSetupInput`, `ConfirmPaymentInput`
//! - **Errors**: `ValidationError`
//!
//! # Amounts
//!
//! Callers send whole currency units. The provider is always charged in minor
//! units, so `amount = 25` becomes a payment intent of `2500` cents.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod amount;
pub mod error;
pub mod ids;
pub mod payment;

pub use amount::Amount;
pub use error::{Result, ValidationError};
pub use ids::{CustomerId, IdError, PaymentIntentId, PaymentMethodId};
pub use payment::{ConfirmPaymentInput, PaymentSetupInput, CURRENCY, STRIPE_API_VERSION};

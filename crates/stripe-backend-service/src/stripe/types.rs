//! Stripe API types.
//!
//! Only the fields the workflows act on are decoded. Objects that are handed
//! back to callers (payment intents, ephemeral keys, confirmation results)
//! stay as raw JSON so they pass through unchanged.

use serde::Deserialize;

use stripe_backend_core::{CustomerId, PaymentMethodId, CURRENCY};

/// Stripe customer object.
#[derive(Debug, Clone, Deserialize)]
pub struct Customer {
    /// Stripe customer ID.
    pub id: CustomerId,
    /// Customer email.
    #[serde(default)]
    pub email: Option<String>,
    /// Customer name.
    #[serde(default)]
    pub name: Option<String>,
    /// Created timestamp (Unix).
    #[serde(default)]
    pub created: i64,
}

/// Stripe payment method object.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentMethod {
    /// Payment method ID.
    pub id: PaymentMethodId,
    /// Customer the method is attached to.
    #[serde(default)]
    pub customer: Option<String>,
}

/// Stripe list response wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeList<T> {
    /// Data items.
    pub data: Vec<T>,
    /// Whether there are more items.
    #[serde(default)]
    pub has_more: bool,
}

/// Parameters for creating a payment intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPaymentIntent {
    /// Amount in minor units.
    pub amount: i64,
    /// Three-letter currency code.
    pub currency: &'static str,
    /// Customer the intent belongs to.
    pub customer: CustomerId,
    /// Let Stripe pick eligible payment methods.
    pub automatic_payment_methods: bool,
}

impl NewPaymentIntent {
    /// Intent in the service currency with automatic payment methods enabled.
    #[must_use]
    pub fn new(amount: i64, customer: CustomerId) -> Self {
        Self {
            amount,
            currency: CURRENCY,
            customer,
            automatic_payment_methods: true,
        }
    }

    /// Form-encoded body for `POST /payment_intents`.
    #[must_use]
    pub fn form_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("amount", self.amount.to_string()),
            ("currency", self.currency.to_string()),
            ("customer", self.customer.to_string()),
            (
                "automatic_payment_methods[enabled]",
                self.automatic_payment_methods.to_string(),
            ),
        ]
    }
}

/// Stripe API error response.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorResponse {
    /// Error details.
    pub error: StripeErrorDetail,
}

/// Stripe error detail.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorDetail {
    /// Error type.
    #[serde(rename = "type")]
    pub error_type: String,
    /// Error message.
    #[serde(default)]
    pub message: String,
    /// Error code.
    #[serde(default)]
    pub code: Option<String>,
}

//! Request and response types for the stripe-backend client.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Liveness response from `GET /`.
#[derive(Debug, Clone, Deserialize)]
pub struct LivenessResponse {
    /// Whether the service is up.
    pub ok: bool,
    /// Service name.
    pub service: String,
    /// Port the service listens on.
    pub port: u16,
}

/// Body for `POST /api/stripe/createApi`.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentSetupRequest {
    /// Customer display name.
    pub name: String,
    /// Customer email.
    pub email: String,
    /// Amount in whole currency units.
    pub amount: u32,
}

/// Response from `POST /api/stripe/createApi`.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentSetupResponse {
    /// The Stripe payment intent object.
    #[serde(rename = "paymentIntent")]
    pub payment_intent: Value,
    /// The Stripe ephemeral key object.
    #[serde(rename = "ephemeralKey")]
    pub ephemeral_key: Value,
    /// Stripe customer ID.
    pub customer: String,
}

impl PaymentSetupResponse {
    /// ID of the created payment intent.
    #[must_use]
    pub fn payment_intent_id(&self) -> Option<&str> {
        self.payment_intent.get("id").and_then(Value::as_str)
    }

    /// Client secret for confirming the intent from a client SDK.
    #[must_use]
    pub fn client_secret(&self) -> Option<&str> {
        self.payment_intent
            .get("client_secret")
            .and_then(Value::as_str)
    }

    /// Secret of the ephemeral key.
    #[must_use]
    pub fn ephemeral_key_secret(&self) -> Option<&str> {
        self.ephemeral_key.get("secret").and_then(Value::as_str)
    }
}

/// Body for `POST /api/stripe/payApi`.
#[derive(Debug, Clone, Serialize)]
pub struct ConfirmPaymentRequest {
    /// Payment method to attach and charge.
    pub payment_method_id: String,
    /// Payment intent to confirm.
    pub payment_intent_id: String,
    /// Customer to attach the payment method to.
    pub customer_id: String,
}

/// Response from `POST /api/stripe/payApi`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmPaymentResponse {
    /// Always `true` on success.
    pub success: bool,
    /// Client secret of the confirmed intent.
    #[serde(default)]
    pub client_secret: Option<String>,
    /// The confirmed Stripe payment intent.
    pub result: Value,
}

impl ConfirmPaymentResponse {
    /// Status of the confirmed intent (e.g. `succeeded`, `requires_action`).
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.result.get("status").and_then(Value::as_str)
    }
}

/// Error body returned by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    /// Error message.
    pub error: String,
}

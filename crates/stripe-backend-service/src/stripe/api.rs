//! Provider abstraction used by the payment workflows.

use async_trait::async_trait;
use serde_json::Value;

use stripe_backend_core::{CustomerId, PaymentIntentId, PaymentMethodId};

use super::client::StripeError;
use super::types::{Customer, NewPaymentIntent, PaymentMethod};

/// The Stripe operations the workflows depend on.
///
/// `StripeClient` talks to the real API; tests substitute in-memory fakes.
#[async_trait]
pub trait StripeApi: Send + Sync {
    /// List customers whose email matches exactly, in Stripe's order.
    async fn list_customers_by_email(&self, email: &str) -> Result<Vec<Customer>, StripeError>;

    /// Create a customer.
    async fn create_customer(&self, name: &str, email: &str) -> Result<Customer, StripeError>;

    /// Mint an ephemeral key scoped to one customer.
    async fn create_ephemeral_key(
        &self,
        customer_id: &CustomerId,
        api_version: &str,
    ) -> Result<Value, StripeError>;

    /// Create a payment intent.
    async fn create_payment_intent(&self, intent: &NewPaymentIntent)
        -> Result<Value, StripeError>;

    /// Attach a payment method to a customer.
    async fn attach_payment_method(
        &self,
        payment_method_id: &PaymentMethodId,
        customer_id: &CustomerId,
    ) -> Result<PaymentMethod, StripeError>;

    /// Confirm a payment intent with a payment method.
    async fn confirm_payment_intent(
        &self,
        payment_intent_id: &PaymentIntentId,
        payment_method_id: &PaymentMethodId,
    ) -> Result<Value, StripeError>;
}

//! Application state.

use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::stripe::{StripeApi, StripeClient, StripeError};
use crate::workflow::PaymentWorkflow;

/// Application state shared across handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Service configuration.
    pub config: ServiceConfig,

    /// Payment workflows backed by the Stripe client.
    pub payments: PaymentWorkflow,
}

impl AppState {
    /// Create application state with a real Stripe client.
    ///
    /// A missing secret key is not fatal: the service starts, and every
    /// payment call fails at the provider until a key is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the Stripe HTTP client cannot be built.
    pub fn new(config: ServiceConfig) -> Result<Self, StripeError> {
        let api_key = match &config.stripe_api_key {
            Some(key) => {
                tracing::info!(base_url = %config.stripe_api_base, "Stripe integration enabled");
                key.clone()
            }
            None => {
                tracing::warn!("STRIPE_SECRET_KEY is not set - payments will fail");
                String::new()
            }
        };

        let client = StripeClient::with_options(api_key, config.stripe_options())?;
        Ok(Self::with_stripe(config, Arc::new(client)))
    }

    /// Create application state around any Stripe implementation.
    #[must_use]
    pub fn with_stripe(config: ServiceConfig, stripe: Arc<dyn StripeApi>) -> Self {
        let payments = PaymentWorkflow::new(stripe, config.customer_match);
        Self { config, payments }
    }
}

//! Stripe API client implementation.

use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use serde_json::Value;
use std::time::Duration;

use stripe_backend_core::{CustomerId, PaymentIntentId, PaymentMethodId, STRIPE_API_VERSION};

use super::api::StripeApi;
use super::types::{
    Customer, NewPaymentIntent, PaymentMethod, StripeErrorResponse, StripeList,
};

/// Error type for Stripe operations.
#[derive(Debug, thiserror::Error)]
pub enum StripeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Stripe API returned an error.
    #[error("Stripe API error: {error_type} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error type.
        error_type: String,
        /// Error message.
        message: String,
        /// Error code.
        code: Option<String>,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An object ID that cannot be used as a URL path segment.
    #[error("Invalid path segment: {0:?}")]
    InvalidPathSegment(String),
}

/// Page size used when listing customers.
const CUSTOMER_PAGE_LIMIT: &str = "100";

/// Options for building a [`StripeClient`].
#[derive(Debug, Clone)]
pub struct StripeClientOptions {
    /// API base URL (default: `https://api.stripe.com/v1`).
    pub base_url: String,
    /// Request timeout (default: 80 seconds).
    pub timeout: Duration,
}

impl Default for StripeClientOptions {
    fn default() -> Self {
        Self {
            base_url: StripeClient::BASE_URL.to_string(),
            timeout: Duration::from_secs(80),
        }
    }
}

/// Stripe API client.
#[derive(Debug, Clone)]
pub struct StripeClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl StripeClient {
    /// Stripe API base URL.
    pub const BASE_URL: &'static str = "https://api.stripe.com/v1";

    /// Create a new Stripe client against the public API.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Stripe secret API key (`sk_test_...` or `sk_live_...`)
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self, StripeError> {
        Self::with_options(api_key, StripeClientOptions::default())
    }

    /// Create a new Stripe client with a custom base URL or timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_options(
        api_key: impl Into<String>,
        options: StripeClientOptions,
    ) -> Result<Self, StripeError> {
        let client = Client::builder()
            .timeout(options.timeout)
            .build()
            .map_err(|e| StripeError::Configuration(format!("failed to build HTTP client: {e}")))?;

        let base_url = Url::parse(options.base_url.trim_end_matches('/'))
            .map_err(|e| StripeError::Configuration(format!("invalid base URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(StripeError::Configuration(format!(
                "base URL cannot carry a path: {base_url}"
            )));
        }

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url,
        })
    }

    /// The base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Append path segments to the base URL.
    ///
    /// Each segment is percent-encoded, so an ID containing `/`, `?` or `#`
    /// stays inside its own segment. Dot segments are refused outright.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, StripeError> {
        if let Some(segment) = segments.iter().find(|s| matches!(**s, "." | "..")) {
            return Err(StripeError::InvalidPathSegment((*segment).to_string()));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| StripeError::Configuration("base URL cannot carry a path".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(
        &self,
        method: Method,
        segments: &[&str],
        api_version: &str,
    ) -> Result<reqwest::RequestBuilder, StripeError> {
        Ok(self
            .client
            .request(method, self.endpoint(segments)?)
            .basic_auth(&self.api_key, Option::<&str>::None)
            .header("Stripe-Version", api_version))
    }

    fn get(&self, segments: &[&str]) -> Result<reqwest::RequestBuilder, StripeError> {
        self.request(Method::GET, segments, STRIPE_API_VERSION)
    }

    fn post(&self, segments: &[&str]) -> Result<reqwest::RequestBuilder, StripeError> {
        self.request(Method::POST, segments, STRIPE_API_VERSION)
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, StripeError> {
        let status = response.status();
        let body = response.bytes().await?;

        if status.is_success() {
            return Ok(serde_json::from_slice(&body)?);
        }

        // Try to parse error response
        match serde_json::from_slice::<StripeErrorResponse>(&body) {
            Ok(stripe_error) => Err(StripeError::Api {
                status: status.as_u16(),
                error_type: stripe_error.error.error_type,
                message: stripe_error.error.message,
                code: stripe_error.error.code,
            }),
            Err(_) => Err(StripeError::Api {
                status: status.as_u16(),
                error_type: "unknown".to_string(),
                message: format!("HTTP {status}"),
                code: None,
            }),
        }
    }
}

#[async_trait]
impl StripeApi for StripeClient {
    async fn list_customers_by_email(&self, email: &str) -> Result<Vec<Customer>, StripeError> {
        let mut customers = Vec::new();
        let mut starting_after: Option<CustomerId> = None;

        loop {
            let mut request = self
                .get(&["customers"])?
                .query(&[("email", email), ("limit", CUSTOMER_PAGE_LIMIT)]);
            if let Some(cursor) = &starting_after {
                request = request.query(&[("starting_after", cursor.as_str())]);
            }

            let page: StripeList<Customer> = self.handle_response(request.send().await?).await?;
            let cursor = if page.has_more {
                page.data.last().map(|c| c.id.clone())
            } else {
                None
            };
            customers.extend(page.data);

            match cursor {
                Some(cursor) => starting_after = Some(cursor),
                None => break,
            }
        }

        tracing::debug!(matches = customers.len(), "Listed Stripe customers by email");
        Ok(customers)
    }

    async fn create_customer(&self, name: &str, email: &str) -> Result<Customer, StripeError> {
        let response = self
            .post(&["customers"])?
            .form(&[("name", name), ("email", email)])
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn create_ephemeral_key(
        &self,
        customer_id: &CustomerId,
        api_version: &str,
    ) -> Result<Value, StripeError> {
        let response = self
            .request(Method::POST, &["ephemeral_keys"], api_version)?
            .form(&[("customer", customer_id.as_str())])
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn create_payment_intent(
        &self,
        intent: &NewPaymentIntent,
    ) -> Result<Value, StripeError> {
        tracing::debug!(
            customer_id = %intent.customer,
            amount = intent.amount,
            currency = intent.currency,
            "Creating Stripe payment intent"
        );

        let response = self
            .post(&["payment_intents"])?
            .form(&intent.form_params())
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn attach_payment_method(
        &self,
        payment_method_id: &PaymentMethodId,
        customer_id: &CustomerId,
    ) -> Result<PaymentMethod, StripeError> {
        let response = self
            .post(&["payment_methods", payment_method_id.as_str(), "attach"])?
            .form(&[("customer", customer_id.as_str())])
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn confirm_payment_intent(
        &self,
        payment_intent_id: &PaymentIntentId,
        payment_method_id: &PaymentMethodId,
    ) -> Result<Value, StripeError> {
        let response = self
            .post(&["payment_intents", payment_intent_id.as_str(), "confirm"])?
            .form(&[("payment_method", payment_method_id.as_str())])
            .send()
            .await?;

        self.handle_response(response).await
    }
}

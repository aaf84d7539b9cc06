//! Stripe backend HTTP client implementation.

use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::error::ClientError;
use crate::types::{
    ApiErrorResponse, ConfirmPaymentRequest, ConfirmPaymentResponse, LivenessResponse,
    PaymentSetupRequest, PaymentSetupResponse,
};

/// Stripe backend API client.
///
/// Wraps the liveness, payment setup and payment confirmation endpoints.
#[derive(Debug, Clone)]
pub struct StripeBackendClient {
    client: Client,
    base_url: String,
}

impl StripeBackendClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the service (e.g., `"http://localhost:3001"`)
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_options(base_url, ClientOptions::default())
    }

    /// Create a new client with custom options.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_options(
        base_url: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .map_err(|e| ClientError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Check that the service is up.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn health(&self) -> Result<LivenessResponse, ClientError> {
        let response = self.client.get(format!("{}/", self.base_url)).send().await?;

        self.handle_response(response).await
    }

    /// Find or create a customer and create a payment intent for them.
    ///
    /// `amount` is in whole currency units; the service converts it to cents.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` if the service rejects the input, or an error
    /// if the request fails.
    pub async fn create_payment_setup(
        &self,
        name: impl Into<String>,
        email: impl Into<String>,
        amount: u32,
    ) -> Result<PaymentSetupResponse, ClientError> {
        let url = format!("{}/api/stripe/createApi", self.base_url);
        let request = PaymentSetupRequest {
            name: name.into(),
            email: email.into(),
            amount,
        };

        tracing::debug!(email = %request.email, amount, "Requesting payment setup");

        let response = self.client.post(&url).json(&request).send().await?;

        self.handle_response(response).await
    }

    /// Attach a payment method to a customer and confirm a payment intent.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` if an identifier is blank, or an error if the
    /// request fails.
    pub async fn confirm_payment(
        &self,
        payment_method_id: impl Into<String>,
        payment_intent_id: impl Into<String>,
        customer_id: impl Into<String>,
    ) -> Result<ConfirmPaymentResponse, ClientError> {
        let url = format!("{}/api/stripe/payApi", self.base_url);
        let request = ConfirmPaymentRequest {
            payment_method_id: payment_method_id.into(),
            payment_intent_id: payment_intent_id.into(),
            customer_id: customer_id.into(),
        };

        let response = self.client.post(&url).json(&request).send().await?;

        self.handle_response(response).await
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        let body = response.bytes().await?;

        if status.is_success() {
            return Ok(serde_json::from_slice(&body)?);
        }

        // Try to parse error response
        let message = serde_json::from_slice::<ApiErrorResponse>(&body)
            .map_or_else(|_| format!("HTTP {status}"), |e| e.error);

        if status == StatusCode::BAD_REQUEST {
            return Err(ClientError::InvalidRequest { message });
        }

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 90).
    ///
    /// Longer than the service's own 80 second Stripe timeout so the service
    /// gets to answer first.
    pub timeout_seconds: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 90,
        }
    }
}

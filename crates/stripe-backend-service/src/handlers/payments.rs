//! Payment handlers.
//!
//! Both endpoints validate the body before any provider call, then run their
//! workflow on a spawned task so a client disconnect cannot cancel a payment
//! half way through.

use std::future::Future;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{FromRequest, Request, State};
use axum::http::{header, HeaderMap};
use axum::{async_trait, Json};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use stripe_backend_core::{ConfirmPaymentInput, PaymentSetupInput, ValidationError};

use crate::error::ApiError;
use crate::state::AppState;
use crate::workflow::WorkflowError;

/// JSON body extractor that never rejects on content.
///
/// A missing, malformed or non-object body, or one that is not sent as
/// `application/json`, decodes as `T::default()`, which
/// leaves every field absent and turns into a "missing fields" validation
/// error downstream. Only transport failures (such as an oversized body) are
/// rejected.
#[derive(Debug, Clone, Default)]
pub struct LenientJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for LenientJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = BytesRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = json_content_type(req.headers());
        let body = Bytes::from_request(req, state).await?;
        if !is_json {
            tracing::debug!("Request body is not declared as JSON");
            return Ok(Self(T::default()));
        }

        let value = serde_json::from_slice(&body).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Request body is not usable JSON");
            T::default()
        });
        Ok(Self(value))
    }
}

/// `application/json` or an `application/*+json` media type, any parameters ignored.
fn json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.split_once('/') {
        Some(("application", subtype)) => subtype == "json" || subtype.ends_with("+json"),
        _ => false,
    }
}

/// Create payment setup request.
///
/// Fields are kept as raw JSON so a wrongly typed field is reported as
/// missing instead of failing the whole body.
#[derive(Debug, Default, Deserialize)]
pub struct CreatePaymentSetupRequest {
    /// Customer display name.
    #[serde(default)]
    pub name: Option<Value>,
    /// Customer email.
    #[serde(default)]
    pub email: Option<Value>,
    /// Amount in whole currency units (number or numeric string).
    #[serde(default)]
    pub amount: Option<Value>,
}

impl TryFrom<CreatePaymentSetupRequest> for PaymentSetupInput {
    type Error = ValidationError;

    fn try_from(req: CreatePaymentSetupRequest) -> Result<Self, Self::Error> {
        PaymentSetupInput::from_fields(
            req.name.as_ref().and_then(Value::as_str),
            req.email.as_ref().and_then(Value::as_str),
            req.amount.as_ref(),
        )
    }
}

/// Create payment setup response.
#[derive(Debug, Serialize)]
pub struct CreatePaymentSetupResponse {
    /// The payment intent, as returned by Stripe.
    #[serde(rename = "paymentIntent")]
    pub payment_intent: Value,
    /// The ephemeral key, as returned by Stripe.
    #[serde(rename = "ephemeralKey")]
    pub ephemeral_key: Value,
    /// Stripe customer ID.
    pub customer: String,
}

/// Confirm payment request.
#[derive(Debug, Default, Deserialize)]
pub struct ConfirmPaymentRequest {
    /// Payment method to attach and charge.
    #[serde(default)]
    pub payment_method_id: Option<Value>,
    /// Payment intent to confirm.
    #[serde(default)]
    pub payment_intent_id: Option<Value>,
    /// Customer to attach the payment method to.
    #[serde(default)]
    pub customer_id: Option<Value>,
}

impl TryFrom<ConfirmPaymentRequest> for ConfirmPaymentInput {
    type Error = ValidationError;

    fn try_from(req: ConfirmPaymentRequest) -> Result<Self, Self::Error> {
        ConfirmPaymentInput::from_fields(
            req.payment_method_id.as_ref().and_then(Value::as_str),
            req.payment_intent_id.as_ref().and_then(Value::as_str),
            req.customer_id.as_ref().and_then(Value::as_str),
        )
    }
}

/// Confirm payment response.
#[derive(Debug, Serialize)]
pub struct ConfirmPaymentResponse {
    /// Always `true` on success.
    pub success: bool,
    /// Client secret of the confirmed intent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    /// The confirmed payment intent, as returned by Stripe.
    pub result: Value,
}

/// Find or create the customer, then create an ephemeral key and payment intent.
pub async fn create_payment_setup(
    State(state): State<Arc<AppState>>,
    LenientJson(body): LenientJson<CreatePaymentSetupRequest>,
) -> Result<Json<CreatePaymentSetupResponse>, ApiError> {
    let input = PaymentSetupInput::try_from(body)?;

    let payments = state.payments.clone();
    let setup = run_detached(async move { payments.create_payment_setup(&input).await }).await?;

    Ok(Json(CreatePaymentSetupResponse {
        payment_intent: setup.payment_intent,
        ephemeral_key: setup.ephemeral_key,
        customer: setup.customer_id.into(),
    }))
}

/// Attach the payment method to the customer and confirm the payment intent.
pub async fn confirm_payment(
    State(state): State<Arc<AppState>>,
    LenientJson(body): LenientJson<ConfirmPaymentRequest>,
) -> Result<Json<ConfirmPaymentResponse>, ApiError> {
    let input = ConfirmPaymentInput::try_from(body)?;

    let payments = state.payments.clone();
    let confirmation = run_detached(async move { payments.confirm_payment(&input).await }).await?;

    Ok(Json(ConfirmPaymentResponse {
        success: true,
        client_secret: confirmation.client_secret,
        result: confirmation.result,
    }))
}

/// Run a workflow on its own task and wait for it.
async fn run_detached<F, T>(workflow: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, WorkflowError>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(workflow)
        .await
        .map_err(|e| WorkflowError::Task(e.to_string()))?
        .map_err(ApiError::from)
}

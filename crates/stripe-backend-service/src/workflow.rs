//! Payment workflows.
//!
//! Two short sequences of provider calls:
//!
//! - **Payment setup**: find or create the customer by email, mint an
//!   ephemeral key, create a payment intent.
//! - **Payment confirmation**: attach the payment method to the customer,
//!   then confirm the intent with it.
//!
//! Nothing is retried or polled. The first provider failure ends the
//! workflow and is returned as a [`WorkflowError`].

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;

use stripe_backend_core::{
    ConfirmPaymentInput, CustomerId, PaymentSetupInput, STRIPE_API_VERSION,
};

use crate::stripe::{Customer, NewPaymentIntent, StripeApi, StripeError};

/// How to pick a customer when the email lookup returns several.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CustomerMatch {
    /// Use the first customer in Stripe's order (newest first).
    #[default]
    First,
    /// Use the customer with the earliest `created` timestamp.
    Oldest,
    /// Fail if more than one customer shares the email.
    Unique,
}

impl CustomerMatch {
    /// Select a customer from lookup results.
    ///
    /// # Errors
    ///
    /// Returns `AmbiguousCustomer` under [`CustomerMatch::Unique`] when more
    /// than one customer matched.
    pub fn select(self, mut customers: Vec<Customer>) -> Result<Option<Customer>, WorkflowError> {
        match self {
            Self::First => Ok(customers.into_iter().next()),
            Self::Oldest => {
                // Stable on ties, so Stripe's order decides between equals.
                customers.sort_by_key(|c| c.created);
                Ok(customers.into_iter().next())
            }
            Self::Unique if customers.len() > 1 => Err(WorkflowError::AmbiguousCustomer {
                matches: customers.len(),
            }),
            Self::Unique => Ok(customers.pop()),
        }
    }
}

impl FromStr for CustomerMatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(Self::First),
            "oldest" => Ok(Self::Oldest),
            "unique" => Ok(Self::Unique),
            other => Err(format!("unknown customer match policy: {other}")),
        }
    }
}

impl fmt::Display for CustomerMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::First => "first",
            Self::Oldest => "oldest",
            Self::Unique => "unique",
        })
    }
}

/// Error type for workflow failures.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// A provider call failed.
    #[error("{operation} failed: {source}")]
    Provider {
        /// The provider operation that failed.
        operation: &'static str,
        /// The underlying Stripe error.
        #[source]
        source: StripeError,
    },

    /// Several customers share the email and the policy forbids guessing.
    #[error("{matches} customers share the requested email")]
    AmbiguousCustomer {
        /// Number of matching customers.
        matches: usize,
    },

    /// The workflow task panicked or was aborted.
    #[error("workflow task failed: {0}")]
    Task(String),
}

impl WorkflowError {
    /// The provider operation or step that failed.
    #[must_use]
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Provider { operation, .. } => operation,
            Self::AmbiguousCustomer { .. } => "select_customer",
            Self::Task(_) => "workflow_task",
        }
    }
}

fn provider(operation: &'static str) -> impl FnOnce(StripeError) -> WorkflowError {
    move |source| WorkflowError::Provider { operation, source }
}

/// Result of the payment setup workflow.
#[derive(Debug, Clone)]
pub struct PaymentSetup {
    /// The created payment intent, as returned by Stripe.
    pub payment_intent: Value,
    /// The ephemeral key, as returned by Stripe.
    pub ephemeral_key: Value,
    /// The customer the intent belongs to.
    pub customer_id: CustomerId,
}

/// Result of the payment confirmation workflow.
#[derive(Debug, Clone)]
pub struct PaymentConfirmation {
    /// Client secret of the confirmed intent, if Stripe returned one.
    pub client_secret: Option<String>,
    /// The confirmed payment intent, as returned by Stripe.
    pub result: Value,
}

/// Runs the payment workflows against a Stripe implementation.
#[derive(Clone)]
pub struct PaymentWorkflow {
    stripe: Arc<dyn StripeApi>,
    customer_match: CustomerMatch,
}

impl fmt::Debug for PaymentWorkflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentWorkflow")
            .field("customer_match", &self.customer_match)
            .finish_non_exhaustive()
    }
}

impl PaymentWorkflow {
    /// Create a workflow runner.
    #[must_use]
    pub fn new(stripe: Arc<dyn StripeApi>, customer_match: CustomerMatch) -> Self {
        Self {
            stripe,
            customer_match,
        }
    }

    /// Find a customer by email, creating one if none exists.
    pub async fn find_or_create_customer(
        &self,
        name: &str,
        email: &str,
    ) -> Result<Customer, WorkflowError> {
        let matches = self
            .stripe
            .list_customers_by_email(email)
            .await
            .map_err(provider("list_customers"))?;

        if let Some(customer) = self.customer_match.select(matches)? {
            tracing::debug!(customer_id = %customer.id, "Reusing existing Stripe customer");
            return Ok(customer);
        }

        let customer = self
            .stripe
            .create_customer(name, email)
            .await
            .map_err(provider("create_customer"))?;

        tracing::info!(customer_id = %customer.id, "Stripe customer created");
        Ok(customer)
    }

    /// Create a customer (if needed), an ephemeral key and a payment intent.
    pub async fn create_payment_setup(
        &self,
        input: &PaymentSetupInput,
    ) -> Result<PaymentSetup, WorkflowError> {
        let customer = self
            .find_or_create_customer(&input.name, &input.email)
            .await?;

        let ephemeral_key = self
            .stripe
            .create_ephemeral_key(&customer.id, STRIPE_API_VERSION)
            .await
            .map_err(provider("create_ephemeral_key"))?;

        let intent = NewPaymentIntent::new(input.amount.minor_units(), customer.id.clone());
        let payment_intent = self
            .stripe
            .create_payment_intent(&intent)
            .await
            .map_err(provider("create_payment_intent"))?;

        tracing::info!(
            customer_id = %customer.id,
            amount = intent.amount,
            "Payment setup created"
        );

        Ok(PaymentSetup {
            payment_intent,
            ephemeral_key,
            customer_id: customer.id,
        })
    }

    /// Attach the payment method to the customer, then confirm the intent.
    pub async fn confirm_payment(
        &self,
        input: &ConfirmPaymentInput,
    ) -> Result<PaymentConfirmation, WorkflowError> {
        let payment_method = self
            .stripe
            .attach_payment_method(&input.payment_method_id, &input.customer_id)
            .await
            .map_err(provider("attach_payment_method"))?;

        let result = self
            .stripe
            .confirm_payment_intent(&input.payment_intent_id, &payment_method.id)
            .await
            .map_err(provider("confirm_payment_intent"))?;

        let client_secret = result
            .get("client_secret")
            .and_then(Value::as_str)
            .map(String::from);

        let status = result
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        tracing::info!(
            payment_intent_id = %input.payment_intent_id,
            status,
            "Payment intent confirmed"
        );

        Ok(PaymentConfirmation {
            client_secret,
            result,
        })
    }
}

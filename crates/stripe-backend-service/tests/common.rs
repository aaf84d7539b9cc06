//! Common test utilities for stripe-backend integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum_test::TestServer;
use serde_json::{json, Value};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

use stripe_backend_core::{CustomerId, PaymentIntentId, PaymentMethodId};
use stripe_backend_service::stripe::{Customer, NewPaymentIntent, PaymentMethod};
use stripe_backend_service::{
    create_router, AppState, CustomerMatch, ServiceConfig, StripeApi, StripeError,
};

/// A provider call recorded by [`FakeStripe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListCustomers { email: String },
    CreateCustomer { name: String, email: String },
    CreateEphemeralKey { customer: String, api_version: String },
    CreatePaymentIntent(NewPaymentIntent),
    AttachPaymentMethod { payment_method: String, customer: String },
    ConfirmPaymentIntent { payment_intent: String, payment_method: String },
}

#[derive(Debug, Default)]
struct FakeState {
    customers: Vec<Customer>,
    calls: Vec<Call>,
    fail_on: Option<&'static str>,
    next_id: u32,
}

/// In-memory Stripe that records every call.
#[derive(Debug, Default)]
pub struct FakeStripe {
    state: Mutex<FakeState>,
}

impl FakeStripe {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Seed an existing customer.
    pub fn add_customer(&self, id: &str, email: &str, created: i64) {
        self.state.lock().unwrap().customers.push(Customer {
            id: id.parse().unwrap(),
            email: Some(email.to_string()),
            name: None,
            created,
        });
    }

    /// Make the named operation fail with a card decline.
    pub fn fail_on(&self, operation: &'static str) {
        self.state.lock().unwrap().fail_on = Some(operation);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn customer_count(&self) -> usize {
        self.state.lock().unwrap().customers.len()
    }

    fn record(&self, operation: &'static str, call: Call) -> Result<(), StripeError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if state.fail_on == Some(operation) {
            return Err(StripeError::Api {
                status: 402,
                error_type: "card_error".into(),
                message: "Your card was declined.".into(),
                code: Some("card_declined".into()),
            });
        }
        Ok(())
    }

    fn next_id(&self) -> u32 {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        state.next_id
    }
}

#[async_trait]
impl StripeApi for FakeStripe {
    async fn list_customers_by_email(&self, email: &str) -> Result<Vec<Customer>, StripeError> {
        self.record(
            "list_customers",
            Call::ListCustomers {
                email: email.to_string(),
            },
        )?;

        // Stripe lists newest first.
        let state = self.state.lock().unwrap();
        Ok(state
            .customers
            .iter()
            .rev()
            .filter(|c| c.email.as_deref() == Some(email))
            .cloned()
            .collect())
    }

    async fn create_customer(&self, name: &str, email: &str) -> Result<Customer, StripeError> {
        self.record(
            "create_customer",
            Call::CreateCustomer {
                name: name.to_string(),
                email: email.to_string(),
            },
        )?;
        let n = self.next_id();

        let customer = Customer {
            id: format!("cus_test_{n}").parse().unwrap(),
            email: Some(email.to_string()),
            name: Some(name.to_string()),
            created: i64::from(n),
        };
        self.state.lock().unwrap().customers.push(customer.clone());
        Ok(customer)
    }

    async fn create_ephemeral_key(
        &self,
        customer_id: &CustomerId,
        api_version: &str,
    ) -> Result<Value, StripeError> {
        self.record(
            "create_ephemeral_key",
            Call::CreateEphemeralKey {
                customer: customer_id.to_string(),
                api_version: api_version.to_string(),
            },
        )?;
        let n = self.next_id();

        Ok(json!({
            "id": format!("ephkey_test_{n}"),
            "object": "ephemeral_key",
            "associated_objects": [{ "id": customer_id.as_str(), "type": "customer" }],
            "secret": format!("ek_test_{n}"),
        }))
    }

    async fn create_payment_intent(
        &self,
        intent: &NewPaymentIntent,
    ) -> Result<Value, StripeError> {
        self.record("create_payment_intent", Call::CreatePaymentIntent(intent.clone()))?;
        let n = self.next_id();

        Ok(json!({
            "id": format!("pi_test_{n}"),
            "object": "payment_intent",
            "amount": intent.amount,
            "currency": intent.currency,
            "customer": intent.customer.as_str(),
            "automatic_payment_methods": { "enabled": intent.automatic_payment_methods },
            "client_secret": format!("pi_test_{n}_secret_abc"),
            "status": "requires_payment_method",
        }))
    }

    async fn attach_payment_method(
        &self,
        payment_method_id: &PaymentMethodId,
        customer_id: &CustomerId,
    ) -> Result<PaymentMethod, StripeError> {
        self.record(
            "attach_payment_method",
            Call::AttachPaymentMethod {
                payment_method: payment_method_id.to_string(),
                customer: customer_id.to_string(),
            },
        )?;

        Ok(PaymentMethod {
            id: payment_method_id.clone(),
            customer: Some(customer_id.to_string()),
        })
    }

    async fn confirm_payment_intent(
        &self,
        payment_intent_id: &PaymentIntentId,
        payment_method_id: &PaymentMethodId,
    ) -> Result<Value, StripeError> {
        self.record(
            "confirm_payment_intent",
            Call::ConfirmPaymentIntent {
                payment_intent: payment_intent_id.to_string(),
                payment_method: payment_method_id.to_string(),
            },
        )?;

        Ok(json!({
            "id": payment_intent_id.as_str(),
            "object": "payment_intent",
            "status": "succeeded",
            "payment_method": payment_method_id.as_str(),
            "client_secret": format!("{payment_intent_id}_secret_abc"),
        }))
    }
}

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// The fake provider behind the server.
    pub stripe: Arc<FakeStripe>,
}

impl TestHarness {
    /// Create a new test harness with an empty fake provider.
    pub fn new() -> Self {
        Self::with_customer_match(CustomerMatch::First)
    }

    /// Create a harness with a specific customer match policy.
    pub fn with_customer_match(customer_match: CustomerMatch) -> Self {
        let config = ServiceConfig {
            port: 4242,
            customer_match,
            ..ServiceConfig::default()
        };

        let stripe = FakeStripe::new();
        let state = AppState::with_stripe(config, stripe.clone());
        let server = TestServer::new(create_router(state)).expect("Failed to create test server");

        Self { server, stripe }
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracing layer that counts error-level events.
#[derive(Debug, Clone, Default)]
pub struct ErrorCounter(Arc<AtomicUsize>);

impl ErrorCounter {
    /// Install the counter as this thread's default subscriber.
    pub fn install() -> (Self, tracing::subscriber::DefaultGuard) {
        let counter = Self::default();
        let subscriber = tracing_subscriber::registry().with(counter.clone());
        let guard = tracing::subscriber::set_default(subscriber);
        (counter, guard)
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl<S: tracing::Subscriber> Layer<S> for ErrorCounter {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == tracing::Level::ERROR {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

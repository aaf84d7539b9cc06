//! Payment setup endpoint integration tests.

mod common;

use axum::http::StatusCode;
use common::{Call, ErrorCounter, TestHarness};
use serde_json::{json, Value};

use stripe_backend_service::CustomerMatch;

const PATH: &str = "/api/stripe/createApi";

// ============================================================================
// Validation
// ============================================================================

#[tokio::test]
async fn missing_fields_return_400_without_provider_calls() {
    let harness = TestHarness::new();

    let bodies = [
        json!({}),
        json!({ "email": "ada@example.com", "amount": 25 }),
        json!({ "name": "Ada", "amount": 25 }),
        json!({ "name": "Ada", "email": "ada@example.com" }),
        json!({ "name": "", "email": "ada@example.com", "amount": 25 }),
        json!({ "name": "Ada", "email": "   ", "amount": 25 }),
        json!({ "name": "Ada", "email": "ada@example.com", "amount": null }),
        json!({ "name": "Ada", "email": "ada@example.com", "amount": 0 }),
        json!({ "name": 7, "email": "ada@example.com", "amount": 25 }),
    ];

    for body in bodies {
        let response = harness.server.post(PATH).json(&body).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let error: Value = response.json();
        assert_eq!(error, json!({ "error": "Missing required fields" }), "body: {body}");
    }

    assert!(harness.stripe.calls().is_empty());
}

#[tokio::test]
async fn malformed_or_empty_body_is_missing_fields() {
    let harness = TestHarness::new();

    let response = harness.server.post(PATH).text("{not json").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Missing required fields");

    let response = harness.server.post(PATH).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Missing required fields");

    assert!(harness.stripe.calls().is_empty());
}

#[tokio::test]
async fn json_sent_as_plain_text_is_missing_fields() {
    let harness = TestHarness::new();

    let body = json!({ "name": "Ada", "email": "ada@example.com", "amount": 25 });
    let response = harness.server.post(PATH).text(body.to_string()).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>(), json!({ "error": "Missing required fields" }));
    assert!(harness.stripe.calls().is_empty());
}

#[tokio::test]
async fn invalid_amounts_return_400_without_provider_calls() {
    let harness = TestHarness::new();

    for amount in [json!(-5), json!(2.5), json!("ten"), json!("0"), json!("-1")] {
        let response = harness
            .server
            .post(PATH)
            .json(&json!({ "name": "Ada", "email": "ada@example.com", "amount": amount }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>(), json!({ "error": "Invalid amount" }));
    }

    assert!(harness.stripe.calls().is_empty());
}

// ============================================================================
// Workflow
// ============================================================================

#[tokio::test]
async fn creates_customer_key_and_intent() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post(PATH)
        .json(&json!({ "name": "Ada", "email": "ada@example.com", "amount": 25 }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["customer"], "cus_test_1");
    assert_eq!(body["paymentIntent"]["amount"], 2500);
    assert_eq!(body["paymentIntent"]["currency"], "usd");
    assert_eq!(body["paymentIntent"]["customer"], "cus_test_1");
    assert_eq!(body["ephemeralKey"]["object"], "ephemeral_key");

    let calls = harness.stripe.calls();
    assert_eq!(calls.len(), 4);
    assert_eq!(
        calls[0],
        Call::ListCustomers {
            email: "ada@example.com".into()
        }
    );
    assert_eq!(
        calls[1],
        Call::CreateCustomer {
            name: "Ada".into(),
            email: "ada@example.com".into()
        }
    );
    assert_eq!(
        calls[2],
        Call::CreateEphemeralKey {
            customer: "cus_test_1".into(),
            api_version: "2024-06-20".into()
        }
    );
    let Call::CreatePaymentIntent(intent) = &calls[3] else {
        panic!("expected payment intent creation, got {:?}", calls[3]);
    };
    assert_eq!(intent.amount, 2500);
    assert_eq!(intent.currency, "usd");
    assert!(intent.automatic_payment_methods);
}

#[tokio::test]
async fn string_amount_is_parsed() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post(PATH)
        .json(&json!({ "name": "Ada", "email": "ada@example.com", "amount": "10" }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["paymentIntent"]["amount"], 1000);
}

#[tokio::test]
async fn existing_customer_is_reused() {
    let harness = TestHarness::new();
    harness.stripe.add_customer("cus_existing", "ada@example.com", 1);

    let response = harness
        .server
        .post(PATH)
        .json(&json!({ "name": "Ada", "email": "ada@example.com", "amount": 5 }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["customer"], "cus_existing");
    assert!(!harness
        .stripe
        .calls()
        .iter()
        .any(|c| matches!(c, Call::CreateCustomer { .. })));
}

#[tokio::test]
async fn repeated_setup_does_not_duplicate_customer() {
    let harness = TestHarness::new();
    let body = json!({ "name": "Ada", "email": "ada@example.com", "amount": 25 });

    let first: Value = harness.server.post(PATH).json(&body).await.json();
    let second: Value = harness.server.post(PATH).json(&body).await.json();

    assert_eq!(first["customer"], second["customer"]);
    assert_eq!(harness.stripe.customer_count(), 1);
    let creations = harness
        .stripe
        .calls()
        .iter()
        .filter(|c| matches!(c, Call::CreateCustomer { .. }))
        .count();
    assert_eq!(creations, 1);
}

#[tokio::test]
async fn first_match_policy_takes_newest_customer() {
    let harness = TestHarness::new();
    harness.stripe.add_customer("cus_old", "ada@example.com", 1);
    harness.stripe.add_customer("cus_new", "ada@example.com", 2);

    let response = harness
        .server
        .post(PATH)
        .json(&json!({ "name": "Ada", "email": "ada@example.com", "amount": 1 }))
        .await;

    assert_eq!(response.json::<Value>()["customer"], "cus_new");
}

#[tokio::test]
async fn oldest_match_policy_takes_oldest_customer() {
    let harness = TestHarness::with_customer_match(CustomerMatch::Oldest);
    harness.stripe.add_customer("cus_old", "ada@example.com", 1);
    harness.stripe.add_customer("cus_new", "ada@example.com", 2);

    let response = harness
        .server
        .post(PATH)
        .json(&json!({ "name": "Ada", "email": "ada@example.com", "amount": 1 }))
        .await;

    assert_eq!(response.json::<Value>()["customer"], "cus_old");
}

#[tokio::test]
async fn unique_match_policy_rejects_shared_email() {
    let harness = TestHarness::with_customer_match(CustomerMatch::Unique);
    harness.stripe.add_customer("cus_a", "ada@example.com", 1);
    harness.stripe.add_customer("cus_b", "ada@example.com", 2);

    let response = harness
        .server
        .post(PATH)
        .json(&json!({ "name": "Ada", "email": "ada@example.com", "amount": 1 }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(harness.stripe.calls().len(), 1);
}

// ============================================================================
// Provider failures
// ============================================================================

#[tokio::test]
async fn provider_failure_returns_generic_500_and_logs_once() {
    let (errors, _guard) = ErrorCounter::install();
    let harness = TestHarness::new();
    harness.stripe.fail_on("create_payment_intent");

    let response = harness
        .server
        .post(PATH)
        .json(&json!({ "name": "Ada", "email": "ada@example.com", "amount": 25 }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text(), r#"{"error":"Internal Server Error"}"#);
    assert_eq!(errors.count(), 1);
}

#[tokio::test]
async fn lookup_failure_stops_workflow() {
    let harness = TestHarness::new();
    harness.stripe.fail_on("list_customers");

    let response = harness
        .server
        .post(PATH)
        .json(&json!({ "name": "Ada", "email": "ada@example.com", "amount": 25 }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(harness.stripe.calls().len(), 1);
}

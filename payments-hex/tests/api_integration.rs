//! HTTP-level tests for the customer payments API.
//!
//! Every test drives the full router (rate limiting, tracing, handlers)
//! against the in-memory repository and the fake card charger.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use card_gateway::FakeCardCharger;
use http_body_util::BodyExt;
use payments_hex::{PaymentService, RegistrationService, inbound::HttpServer};
use payments_repo::InMemoryRepo;
use payments_types::RegistrationRequest;
use serde_json::{Value, json};
use tower::ServiceExt;

const DECLINED_SOURCE: &str = "tok_chargeDeclined";

/// Helper to create a router with the given per-client quota.
fn create_app(requests_per_minute: u32) -> Router {
    let repo = Arc::new(InMemoryRepo::new());
    let charger = FakeCardCharger::new().declining(DECLINED_SOURCE);

    let registration = RegistrationService::new(repo.clone());
    let payments = PaymentService::new(repo.clone(), repo, charger);

    HttpServer::with_rate_limit(registration, payments, requests_per_minute).router()
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

async fn register(app: &Router, name: &str, phone: &str) -> (StatusCode, Value) {
    send(
        app,
        json_request(
            Method::PUT,
            "/api/v1/customer-registration",
            json!({ "name": name, "phone_number": phone }),
        ),
    )
    .await
}

async fn pay(app: &Router, customer_id: &Value, currency: &str, source: &str) -> (StatusCode, Value) {
    send(
        app,
        json_request(
            Method::POST,
            "/api/v1/payment",
            json!({
                "customer_id": customer_id,
                "amount": "100.00",
                "currency": currency,
                "source": source,
                "description": "Food"
            }),
        ),
    )
    .await
}

#[tokio::test]
async fn test_health() {
    let app = create_app(100);

    let (status, body) = send(&app, get_request("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_register_customer() {
    let app = create_app(100);

    let (status, body) = register(&app, "Tara", "+447000000000").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Tara");
    assert_eq!(body["phone_number"], "+447000000000");
    assert!(body["id"].is_string());
}

#[tokio::test]
async fn test_register_twice_returns_same_customer() {
    let app = create_app(100);

    let (_, first) = register(&app, "Tara", "+447000000000").await;
    let (status, second) = register(&app, "Tara", "+447000000000").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["id"], second["id"]);
}

#[tokio::test]
async fn test_register_taken_phone_is_conflict() {
    let app = create_app(100);

    register(&app, "Tara", "+447000000000").await;
    let (status, body) = register(&app, "Mika", "+447000000000").await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 409);
    assert!(body["error"].as_str().unwrap().contains("+447000000000"));
}

#[tokio::test]
async fn test_register_invalid_phone_is_bad_request() {
    let app = create_app(100);

    let (status, body) = register(&app, "Tara", "+3312345678901").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("+3312345678901"));
}

#[tokio::test]
async fn test_charge_and_fetch_payment() {
    let app = create_app(100);
    let (_, customer) = register(&app, "Tara", "+447000000000").await;

    let (status, payment) = pay(&app, &customer["id"], "GBP", "x0x0x0x0x0").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(payment["customer_id"], customer["id"]);
    assert_eq!(payment["currency"], "GBP");
    assert_eq!(payment["description"], "Food");

    let id = payment["id"].as_i64().unwrap();
    let (status, fetched) = send(&app, get_request(&format!("/api/v1/payment/{id}"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, payment);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_identical_registrations_all_succeed() {
    let repo = Arc::new(InMemoryRepo::new());
    let registration = Arc::new(RegistrationService::new(repo.clone()));

    let handles: Vec<_> = (0..32)
        .map(|_| {
            let registration = registration.clone();
            tokio::spawn(async move {
                registration
                    .register(RegistrationRequest {
                        id: None,
                        name: "Tara".into(),
                        phone_number: "+447000000000".into(),
                    })
                    .await
            })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        let customer = handle.await.unwrap().unwrap();
        ids.push(customer.id);
    }

    ids.dedup();
    assert_eq!(ids.len(), 1);
    assert_eq!(repo.customer_count(), 1);
}

#[tokio::test]
async fn test_unknown_currency_is_json_bad_request() {
    let app = create_app(100);
    let (_, customer) = register(&app, "Tara", "+447000000000").await;

    let (status, body) = pay(&app, &customer["id"], "JPY", "x0x0x0x0x0").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_malformed_bodies_are_json_bad_requests() {
    let app = create_app(100);

    let missing_amount = json_request(
        Method::POST,
        "/api/v1/payment",
        json!({ "customer_id": "00000000-0000-0000-0000-000000000001", "currency": "GBP", "source": "tok" }),
    );
    let bad_customer_id = json_request(
        Method::POST,
        "/api/v1/payment",
        json!({ "customer_id": "not-a-uuid", "amount": "1.00", "currency": "GBP", "source": "tok" }),
    );
    let not_json = Request::builder()
        .method(Method::PUT)
        .uri("/api/v1/customer-registration")
        .header("Content-Type", "application/json")
        .body(Body::from("{"))
        .unwrap();

    for request in [missing_amount, bad_customer_id, not_json] {
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);
    }
}

#[tokio::test]
async fn test_charge_unsupported_currency_is_bad_request() {
    let app = create_app(100);
    let (_, customer) = register(&app, "Tara", "+447000000000").await;

    let (status, body) = pay(&app, &customer["id"], "EUR", "x0x0x0x0x0").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("EUR"));
}

#[tokio::test]
async fn test_charge_unknown_customer_is_not_found() {
    let app = create_app(100);

    let (status, _) = pay(
        &app,
        &json!("00000000-0000-0000-0000-000000000001"),
        "GBP",
        "x0x0x0x0x0",
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_charge_without_customer_is_bad_request() {
    let app = create_app(100);

    let (status, _) = pay(&app, &Value::Null, "GBP", "x0x0x0x0x0").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_declined_card_is_payment_required() {
    let app = create_app(100);
    let (_, customer) = register(&app, "Tara", "+447000000000").await;

    let (status, body) = pay(&app, &customer["id"], "USD", DECLINED_SOURCE).await;

    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(body["code"], 402);

    // Nothing was recorded for the declined charge.
    let (status, _) = send(&app, get_request("/api/v1/payment/1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_missing_payment_is_not_found() {
    let app = create_app(100);

    let (status, _) = send(&app, get_request("/api/v1/payment/999")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_malformed_payment_id_is_bad_request() {
    let app = create_app(100);

    let (status, _) = send(&app, get_request("/api/v1/payment/abc")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_openapi_document_served() {
    let app = create_app(100);

    let (status, doc) = send(&app, get_request("/api-docs/openapi.json")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/v1/payment"].is_object());
}

#[tokio::test]
async fn test_rate_limiting_returns_429_when_exceeded() {
    let app = create_app(3);

    for i in 1..=3 {
        let (status, _) = send(&app, get_request("/api/v1/payment/1")).await;
        assert_ne!(
            status,
            StatusCode::TOO_MANY_REQUESTS,
            "Request {} should not be rate limited",
            i
        );
    }

    let (status, body) = send(&app, get_request("/api/v1/payment/1")).await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("Rate limit exceeded")
    );
    assert_eq!(body["retry_after_seconds"], 60);
}

#[tokio::test]
async fn test_rate_limiting_is_per_client() {
    let app = create_app(1);

    let from = |client: &str| {
        Request::builder()
            .uri("/api/v1/payment/1")
            .header("x-forwarded-for", client)
            .body(Body::empty())
            .unwrap()
    };

    let (first_a, _) = send(&app, from("10.0.0.1")).await;
    let (second_a, _) = send(&app, from("10.0.0.1")).await;
    let (first_b, _) = send(&app, from("10.0.0.2")).await;

    assert_eq!(first_a, StatusCode::NOT_FOUND);
    assert_eq!(second_a, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(first_b, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rate_limiting_health_endpoint_bypassed() {
    let app = create_app(1);

    for _ in 0..10 {
        let (status, _) = send(&app, get_request("/health")).await;
        assert_eq!(status, StatusCode::OK, "Health endpoint should not be rate limited");
    }
}

mod common;

use common::{test_config, TestApp, TEST_AUTHORIZATION};
use reqwest::Client;
use serde_json::{json, Value};
use wiremock::matchers::{any, body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn order_payload() -> Value {
    json!({
        "orderId": "ORDER-1",
        "amount": 10000,
        "name": "Test",
        "email": "test@example.com"
    })
}

#[tokio::test]
async fn create_transaction_returns_snap_token() {
    let midtrans = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/snap/v1/transactions"))
        .and(header("authorization", TEST_AUTHORIZATION))
        .and(header("accept", "application/json"))
        .and(body_json(json!({
            "transaction_details": { "order_id": "ORDER-1", "gross_amount": 10000 },
            "customer_details": { "first_name": "Test", "email": "test@example.com" }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "token": "tok123",
            "redirect_url": "https://pay.example/tok123"
        })))
        .expect(1)
        .mount(&midtrans)
        .await;

    let app = TestApp::spawn(&midtrans).await;

    let response = Client::new()
        .post(app.url("/createTransaction"))
        .json(&order_payload())
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "token": "tok123", "redirect_url": "https://pay.example/tok123" })
    );
}

#[tokio::test]
async fn midtrans_rejection_becomes_500_with_message() {
    let midtrans = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/snap/v1/transactions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error_messages": [
                "Access denied due to unauthorized transaction, please check client or server key"
            ]
        })))
        .expect(1)
        .mount(&midtrans)
        .await;

    let app = TestApp::spawn(&midtrans).await;

    let response = Client::new()
        .post(app.url("/createTransaction"))
        .json(&order_payload())
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "error": "Midtrans API error (HTTP 401): Access denied due to unauthorized transaction, please check client or server key"
        })
    );
}

#[tokio::test]
async fn duplicate_order_id_is_left_to_midtrans() {
    let midtrans = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/snap/v1/transactions"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error_messages": ["transaction_details.order_id sudah digunakan"]
        })))
        .mount(&midtrans)
        .await;

    let app = TestApp::spawn(&midtrans).await;

    let response = Client::new()
        .post(app.url("/createTransaction"))
        .json(&order_payload())
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 500);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .ends_with("transaction_details.order_id sudah digunakan"));
}

#[tokio::test]
async fn unreachable_midtrans_becomes_500() {
    // Nothing listens on port 1
    let app = TestApp::spawn_with_config(test_config(
        "http://127.0.0.1:1/snap",
        "http://127.0.0.1:1",
    ))
    .await;

    let response = Client::new()
        .post(app.url("/createTransaction"))
        .json(&order_payload())
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 500);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Midtrans request failed"));
}

#[tokio::test]
async fn body_that_is_not_json_is_rejected_without_calling_midtrans() {
    let midtrans = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&midtrans)
        .await;

    let app = TestApp::spawn(&midtrans).await;

    let response = Client::new()
        .post(app.url("/createTransaction"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn string_amount_is_forwarded_to_midtrans_unchanged() {
    let midtrans = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/snap/v1/transactions"))
        .and(body_json(json!({
            "transaction_details": { "order_id": "ORDER-1", "gross_amount": "10000" },
            "customer_details": { "first_name": "Test", "email": "test@example.com" }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "token": "tok123",
            "redirect_url": "https://pay.example/tok123"
        })))
        .expect(1)
        .mount(&midtrans)
        .await;

    let app = TestApp::spawn(&midtrans).await;

    let mut payload = order_payload();
    payload["amount"] = json!("10000");

    let response = Client::new()
        .post(app.url("/createTransaction"))
        .json(&payload)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["token"], "tok123");
}

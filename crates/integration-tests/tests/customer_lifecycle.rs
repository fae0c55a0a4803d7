//! End-to-end tests for the customers service.
//!
//! These tests require the customers server running
//! (cargo run -p souk-customers).
//!
//! Run with: cargo test -p souk-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use souk_integration_tests::customers_base_url;

/// Unique username per test run so reruns do not collide on the unique index.
fn unique_username(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock before epoch")
        .subsec_nanos();
    format!("{prefix}_{nanos}")
}

async fn register_customer(client: &Client, username: &str) -> Value {
    let resp = client
        .post(format!("{}/api/customers", customers_base_url()))
        .json(&json!({
            "full_name": "Test Customer",
            "username": username,
            "password": "correct horse battery",
            "age": 30,
            "address": "1 Main St",
            "gender": "female",
            "marital_status": "single",
        }))
        .send()
        .await
        .expect("Failed to register customer");

    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Failed to read response")
}

#[tokio::test]
#[ignore = "Requires running customers server"]
async fn test_register_then_fetch_by_username() {
    let client = Client::new();
    let username = unique_username("lifecycle");

    let created = register_customer(&client, &username).await;
    assert_eq!(created["username"], username.as_str());
    assert_eq!(created["wallet_balance"], json!("0.00"));

    let resp = client
        .get(format!("{}/api/customers/{username}", customers_base_url()))
        .send()
        .await
        .expect("Failed to fetch customer");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to read response");
    assert_eq!(body["full_name"], "Test Customer");
    assert_eq!(body["age"], 30);
}

#[tokio::test]
#[ignore = "Requires running customers server"]
async fn test_duplicate_registration_conflicts() {
    let client = Client::new();
    let username = unique_username("dup");

    register_customer(&client, &username).await;

    let resp = client
        .post(format!("{}/api/customers", customers_base_url()))
        .json(&json!({
            "full_name": "Imposter",
            "username": username,
            "password": "another password",
            "age": 40,
            "address": "2 Side St",
            "gender": "male",
            "marital_status": "married",
        }))
        .send()
        .await
        .expect("Failed to send duplicate registration");

    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running customers server"]
async fn test_wallet_charge_and_deduct() {
    let client = Client::new();
    let username = unique_username("wallet");
    register_customer(&client, &username).await;

    let resp = client
        .post(format!(
            "{}/api/customers/{username}/wallet/charge",
            customers_base_url()
        ))
        .json(&json!({ "amount": "100.00" }))
        .send()
        .await
        .expect("Failed to charge wallet");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to read response");
    assert_eq!(body["wallet_balance"], json!("100.00"));

    let resp = client
        .post(format!(
            "{}/api/customers/{username}/wallet/deduct",
            customers_base_url()
        ))
        .json(&json!({ "amount": "25.50" }))
        .send()
        .await
        .expect("Failed to deduct wallet");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to read response");
    assert_eq!(body["wallet_balance"], json!("74.50"));
}

#[tokio::test]
#[ignore = "Requires running customers server"]
async fn test_delete_then_404() {
    let client = Client::new();
    let username = unique_username("gone");
    register_customer(&client, &username).await;

    let resp = client
        .delete(format!(
            "{}/api/customers/{username}",
            customers_base_url()
        ))
        .send()
        .await
        .expect("Failed to delete customer");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .delete(format!(
            "{}/api/customers/{username}",
            customers_base_url()
        ))
        .send()
        .await
        .expect("Failed to re-delete customer");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

//! End-to-end tests for the sales service.
//!
//! These tests require the sales server running
//! (cargo run -p souk-sales). The sales database's local customers and goods
//! tables are populated out of band, so these tests stick to the parts of the
//! contract that hold on any dataset.
//!
//! Run with: cargo test -p souk-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use souk_integration_tests::sales_base_url;

#[tokio::test]
#[ignore = "Requires running sales server"]
async fn test_available_goods_listing() {
    let client = Client::new();

    let resp = client
        .get(format!("{}/api/sales/goods", sales_base_url()))
        .send()
        .await
        .expect("Failed to list available goods");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to read response");
    let goods = body.as_array().expect("response is not an array");
    for good in goods {
        assert!(good["name"].is_string());
        assert!(good["price_per_item"].is_string());
    }
}

#[tokio::test]
#[ignore = "Requires running sales server"]
async fn test_unknown_good_details_404() {
    let client = Client::new();

    let resp = client
        .get(format!(
            "{}/api/sales/goods/no-such-good-here",
            sales_base_url()
        ))
        .send()
        .await
        .expect("Failed to fetch good details");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running sales server"]
async fn test_sale_with_unknown_customer() {
    let client = Client::new();

    let resp = client
        .post(format!("{}/api/sales", sales_base_url()))
        .json(&json!({
            "customer_username": "no_such_customer",
            "good_name": "Widget",
        }))
        .send()
        .await
        .expect("Failed to attempt sale");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.expect("Failed to read response");
    assert_eq!(body["status"], "CustomerNotFound");
}

#[tokio::test]
#[ignore = "Requires running sales server"]
async fn test_sale_history_for_fresh_customer_is_empty() {
    let client = Client::new();

    let resp = client
        .get(format!(
            "{}/api/sales/customer/never_bought_anything",
            sales_base_url()
        ))
        .send()
        .await
        .expect("Failed to fetch sale history");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to read response");
    assert_eq!(body, json!([]));
}

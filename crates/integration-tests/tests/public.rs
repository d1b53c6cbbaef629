//! Integration tests for the public catalogue.
//!
//! Require a migrated database and a running API server.
//! Run with: cargo test -p vitrine-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::Value;
use vitrine_integration_tests::TestContext;

async fn count(ctx: &TestContext, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(&ctx.pool)
        .await
        .expect("Failed to count rows")
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_init_app_data_matches_tables() {
    let ctx = TestContext::new().await;
    let (client, _) = ctx.logged_in_vendor().await;
    ctx.create_product(&client, "Counted").await;

    let data: Value = ctx
        .client()
        .get(ctx.url("/init-app-data/"))
        .send()
        .await
        .expect("Failed to get init data")
        .json()
        .await
        .expect("Invalid init data JSON");

    let len = |key: &str| data[key].as_array().map_or(0, Vec::len);
    assert_eq!(i64::try_from(len("products")).unwrap_or(-1), count(&ctx, "product").await);
    assert_eq!(i64::try_from(len("boutiques")).unwrap_or(-1), count(&ctx, "boutique").await);
    assert_eq!(i64::try_from(len("sliders")).unwrap_or(-1), count(&ctx, "slider").await);
    assert!(data["company_config"].is_object() || data["company_config"].is_null());
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_public_products_paginated() {
    let ctx = TestContext::new().await;
    let (client, _) = ctx.logged_in_vendor().await;
    ctx.create_product(&client, "Paged").await;

    let resp = ctx
        .client()
        .get(ctx.url("/public/products/"))
        .send()
        .await
        .expect("Failed to list products");
    assert_eq!(resp.status(), StatusCode::OK);

    let page: Value = resp.json().await.expect("Invalid page JSON");
    assert_eq!(page["count"], count(&ctx, "product").await);
    assert!(page["previous"].is_null());
    assert!(page["results"].as_array().is_some_and(|r| !r.is_empty() && r.len() <= 100));

    let resp = ctx
        .client()
        .get(ctx.url("/public/products/?page=999999"))
        .send()
        .await
        .expect("Failed to request page");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_public_boutiques_nest_products() {
    let ctx = TestContext::new().await;
    let (client, vendor) = ctx.logged_in_vendor().await;
    ctx.create_product(&client, "Nested").await;

    let boutiques: Vec<Value> = ctx
        .client()
        .get(ctx.url("/public/boutiques/"))
        .send()
        .await
        .expect("Failed to list boutiques")
        .json()
        .await
        .expect("Invalid boutique list JSON");

    let own = boutiques
        .iter()
        .find(|b| b["id"] == vendor.boutique_id.as_i32())
        .expect("Boutique missing from public list");
    assert_eq!(own["products"][0]["title"], "Nested");
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_public_sliders_ordered() {
    let ctx = TestContext::new().await;

    let sliders: Vec<Value> = ctx
        .client()
        .get(ctx.url("/public/sliders/"))
        .send()
        .await
        .expect("Failed to list sliders")
        .json()
        .await
        .expect("Invalid slider list JSON");

    let orders: Vec<u64> = sliders.iter().filter_map(|s| s["order"].as_u64()).collect();
    assert!(orders.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_public_config() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client()
        .get(ctx.url("/public/config/"))
        .send()
        .await
        .expect("Failed to get config");
    assert_eq!(resp.status(), StatusCode::OK);

    let config: Value = resp.json().await.expect("Invalid config JSON");
    assert!(config.is_object());
}

//! Integration tests for login, logout and password changes.
//!
//! Require a migrated database and a running API server.
//! Run with: cargo test -p vitrine-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};
use vitrine_integration_tests::{TEST_PASSWORD, TestContext};

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_login_returns_user() {
    let ctx = TestContext::new().await;
    let vendor = ctx.create_vendor().await;
    let client = ctx.client();

    let resp = ctx.login_with(&client, &vendor.username, TEST_PASSWORD).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get("set-cookie").is_some());

    let body: Value = resp.json().await.expect("Invalid login JSON");
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["username"], vendor.username.as_str());
    assert_eq!(body["user"]["id"], vendor.id.as_i32());
    assert_eq!(body["user"]["boutique"], vendor.boutique_id.as_i32());
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_login_wrong_password_sets_no_cookie() {
    let ctx = TestContext::new().await;
    let vendor = ctx.create_vendor().await;
    let client = ctx.client();

    let resp = ctx.login_with(&client, &vendor.username, "not-the-password").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().get("set-cookie").is_none());

    let resp = client
        .get(ctx.url("/dashboard/"))
        .send()
        .await
        .expect("Failed to get dashboard");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_login_unknown_user() {
    let ctx = TestContext::new().await;
    let client = ctx.client();

    let resp = ctx.login_with(&client, "nobody_here", TEST_PASSWORD).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_inactive_vendor_cannot_login() {
    let ctx = TestContext::new().await;
    let vendor = ctx.create_vendor().await;
    ctx.deactivate(&vendor).await;
    let client = ctx.client();

    let resp = ctx.login_with(&client, &vendor.username, TEST_PASSWORD).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(resp.headers().get("set-cookie").is_none());
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_logout_invalidates_session() {
    let ctx = TestContext::new().await;
    let (client, _vendor) = ctx.logged_in_vendor().await;

    let resp = client
        .get(ctx.url("/products/"))
        .send()
        .await
        .expect("Failed to list products");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .post(ctx.url("/logout/"))
        .send()
        .await
        .expect("Failed to log out");
    assert_eq!(resp.status(), StatusCode::OK);

    for path in ["/products/", "/categories/", "/dashboard/"] {
        let resp = client
            .get(ctx.url(path))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{path}");
    }
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_deactivated_vendor_session_rejected() {
    let ctx = TestContext::new().await;
    let (client, vendor) = ctx.logged_in_vendor().await;

    ctx.deactivate(&vendor).await;

    let resp = client
        .get(ctx.url("/products/"))
        .send()
        .await
        .expect("Failed to list products");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_change_password() {
    let ctx = TestContext::new().await;
    let (client, vendor) = ctx.logged_in_vendor().await;

    // Wrong current password
    let resp = client
        .post(ctx.url("/change-password/"))
        .json(&json!({ "old_password": "nope", "new_password": "another-long-one" }))
        .send()
        .await
        .expect("Failed to change password");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Too short
    let resp = client
        .post(ctx.url("/change-password/"))
        .json(&json!({ "old_password": TEST_PASSWORD, "new_password": "short" }))
        .send()
        .await
        .expect("Failed to change password");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Invalid error JSON");
    assert!(body["fields"]["new_password"].is_array());

    let resp = client
        .post(ctx.url("/change-password/"))
        .json(&json!({ "old_password": TEST_PASSWORD, "new_password": "another-long-one" }))
        .send()
        .await
        .expect("Failed to change password");
    assert_eq!(resp.status(), StatusCode::OK);

    // Session survives the change
    let resp = client
        .get(ctx.url("/dashboard/"))
        .send()
        .await
        .expect("Failed to get dashboard");
    assert_eq!(resp.status(), StatusCode::OK);

    let fresh = ctx.client();
    let resp = ctx.login_with(&fresh, &vendor.username, TEST_PASSWORD).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let resp = ctx
        .login_with(&fresh, &vendor.username, "another-long-one")
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_change_password_checks_current_first() {
    let ctx = TestContext::new().await;
    let (client, _) = ctx.logged_in_vendor().await;

    let resp = client
        .post(ctx.url("/change-password/"))
        .json(&json!({ "old_password": "not-the-password" }))
        .send()
        .await
        .expect("Failed to change password");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.expect("Invalid error JSON");
    assert_eq!(body["error"], "Current password is incorrect");
    assert!(body.get("fields").is_none());
}

//! Integration tests for Vitrine.
//!
//! These tests talk to a running API server and its database. They are
//! `#[ignore]`d so `cargo test` stays hermetic.
//!
//! # Running Tests
//!
//! ```bash
//! # Migrate and start the server
//! cargo run -p vitrine-cli -- migrate
//! # Trust X-Forwarded-For so each test client gets its own login bucket
//! VITRINE_TRUST_PROXY=true cargo run -p vitrine-api
//!
//! # Run integration tests
//! # (single-threaded: some tests compare against table counts)
//! cargo test -p vitrine-integration-tests -- --ignored --test-threads=1
//! ```
//!
//! # Environment Variables
//!
//! - `VITRINE_TEST_BASE_URL` - Server under test (default: http://localhost:8000)
//! - `VITRINE_DATABASE_URL` - Same database the server uses (falls back to `DATABASE_URL`)

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use secrecy::SecretString;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use vitrine_api::db::VendorRepository;
use vitrine_api::models::{NewBoutique, NewVendor};
use vitrine_api::services::auth::hash_password;
use vitrine_core::{BoutiqueId, Username, VendorId};

/// Password given to every vendor created by [`TestContext::create_vendor`].
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Base URL of the server under test.
#[must_use]
pub fn base_url() -> String {
    std::env::var("VITRINE_TEST_BASE_URL")
        .unwrap_or_else(|_| "http://localhost:8000".to_string())
        .trim_end_matches('/')
        .to_owned()
}

/// A vendor account created directly in the database.
#[derive(Debug, Clone)]
pub struct TestVendor {
    pub id: VendorId,
    pub username: String,
    pub boutique_id: BoutiqueId,
}

/// Shared handles for one test.
pub struct TestContext {
    pub base_url: String,
    pub pool: PgPool,
}

impl TestContext {
    /// Connect to the database used by the server under test.
    pub async fn new() -> Self {
        let database_url = std::env::var("VITRINE_DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .map(SecretString::from)
            .expect("VITRINE_DATABASE_URL or DATABASE_URL must be set");

        let pool = vitrine_api::db::create_pool(&database_url)
            .await
            .expect("Failed to connect to test database");

        Self {
            base_url: base_url(),
            pool,
        }
    }

    /// Absolute URL for an API path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// A fresh cookie-holding client.
    ///
    /// Each client presents its own forwarded address so the login rate
    /// limiter buckets tests separately.
    #[must_use]
    pub fn client(&self) -> Client {
        let id = Uuid::new_v4().as_u128();
        let address = format!(
            "10.{}.{}.{}",
            (id >> 16) & 0xff,
            (id >> 8) & 0xff,
            id & 0xff
        );

        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_str(&address).expect("valid header value"),
        );

        Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .build()
            .expect("Failed to create HTTP client")
    }

    /// Create a vendor with a boutique, password [`TEST_PASSWORD`].
    pub async fn create_vendor(&self) -> TestVendor {
        let username = format!("vendor_{}", Uuid::new_v4().simple());

        let vendor = NewVendor {
            username: Username::parse(&username).expect("valid username"),
            email: None,
            password_hash: hash_password(TEST_PASSWORD).expect("Failed to hash password"),
        };
        let boutique = NewBoutique {
            name: format!("Boutique {username}"),
            description: format!("Boutique for {username}"),
            image: None,
        };

        let (vendor, boutique) = VendorRepository::new(&self.pool)
            .create_with_boutique(&vendor, &boutique)
            .await
            .expect("Failed to create test vendor");

        TestVendor {
            id: vendor.id,
            username,
            boutique_id: boutique.id,
        }
    }

    /// Create a vendor that owns no boutique.
    pub async fn create_vendor_without_boutique(&self) -> (VendorId, String) {
        let username = format!("loner_{}", Uuid::new_v4().simple());
        let password_hash = hash_password(TEST_PASSWORD).expect("Failed to hash password");

        let id = sqlx::query_scalar::<_, VendorId>(
            "INSERT INTO vendor_user (username, password_hash) VALUES ($1, $2) RETURNING id",
        )
        .bind(&username)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await
        .expect("Failed to create vendor without boutique");

        (id, username)
    }

    /// Deactivate a vendor account.
    pub async fn deactivate(&self, vendor: &TestVendor) {
        VendorRepository::new(&self.pool)
            .set_active(&vendor.username, false)
            .await
            .expect("Failed to deactivate vendor");
    }

    /// POST /login/ with the given password.
    pub async fn login_with(&self, client: &Client, username: &str, password: &str) -> Response {
        client
            .post(self.url("/login/"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to send login request")
    }

    /// Log in as `vendor`, asserting success.
    pub async fn login(&self, client: &Client, vendor: &TestVendor) {
        let resp = self.login_with(client, &vendor.username, TEST_PASSWORD).await;
        assert_eq!(resp.status(), 200, "login failed for {}", vendor.username);
    }

    /// A client logged in as a new vendor that owns no boutique.
    pub async fn logged_in_vendor_without_boutique(&self) -> Client {
        let (_, username) = self.create_vendor_without_boutique().await;
        let client = self.client();
        let resp = self.login_with(&client, &username, TEST_PASSWORD).await;
        assert_eq!(resp.status(), 200, "login failed for {username}");
        client
    }

    /// A client already logged in as a new vendor.
    pub async fn logged_in_vendor(&self) -> (Client, TestVendor) {
        let vendor = self.create_vendor().await;
        let client = self.client();
        self.login(&client, &vendor).await;
        (client, vendor)
    }

    /// Create a product through the API, returning its JSON.
    pub async fn create_product(&self, client: &Client, title: &str) -> serde_json::Value {
        let resp = client
            .post(self.url("/products/"))
            .json(&json!({
                "title": title,
                "description": "Integration test product",
                "price": "12.50",
                "stock": 4,
            }))
            .send()
            .await
            .expect("Failed to create product");
        assert_eq!(resp.status(), 201);
        resp.json().await.expect("Invalid product JSON")
    }

    /// Create a category through the API, returning its JSON.
    pub async fn create_category(&self, client: &Client, name: &str) -> serde_json::Value {
        let resp = client
            .post(self.url("/categories/"))
            .json(&json!({ "name": name }))
            .send()
            .await
            .expect("Failed to create category");
        assert_eq!(resp.status(), 201);
        resp.json().await.expect("Invalid category JSON")
    }
}

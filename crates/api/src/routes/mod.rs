//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Liveness
//! GET  /health/ready            - Readiness (database)
//!
//! # Auth
//! POST /login/                  - Login (rate limited)
//! POST /logout/                 - Logout
//! POST /change-password/        - Change password (requires auth)
//!
//! # Vendor (requires auth)
//! GET  /dashboard/              - Own boutique with products and categories
//! GET  /products/               - Own products
//! POST /products/               - Create product
//! GET|PUT|PATCH|DELETE /products/{id}/
//! GET  /categories/             - Own categories
//! POST /categories/             - Create category
//! GET|PUT|PATCH|DELETE /categories/{id}/
//!
//! # Public
//! GET  /public/products/        - All products, paginated
//! GET  /public/boutiques/       - All boutiques with products
//! GET  /public/sliders/         - Home page slides
//! GET  /public/config/          - Company profile
//! GET  /init-app-data/          - Startup bundle
//! ```

pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod extract;
pub mod health;
pub mod products;
pub mod public;
pub mod views;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tower_sessions::{SessionManagerLayer, SessionStore};
use tracing::Span;

use crate::config::ApiConfig;
use crate::middleware::{login_rate_limiter, request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes(config: &ApiConfig) -> Router<AppState> {
    let login = Router::new()
        .route("/login/", post(auth::login))
        .layer(login_rate_limiter(config.trust_proxy));

    Router::new()
        .merge(login)
        .route("/logout/", post(auth::logout))
        .route("/change-password/", post(auth::change_password))
}

/// Create the vendor routes router.
pub fn vendor_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard/", get(dashboard::show))
        .route("/products/", get(products::index).post(products::create))
        .route(
            "/products/{id}/",
            get(products::show)
                .put(products::replace)
                .patch(products::patch)
                .delete(products::destroy),
        )
        .route(
            "/categories/",
            get(categories::index).post(categories::create),
        )
        .route(
            "/categories/{id}/",
            get(categories::show)
                .put(categories::replace)
                .patch(categories::patch)
                .delete(categories::destroy),
        )
}

/// Create the public routes router.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/public/products/", get(public::products))
        .route("/public/boutiques/", get(public::boutiques))
        .route("/public/sliders/", get(public::sliders))
        .route("/public/config/", get(public::config))
        .route("/init-app-data/", get(public::init_app_data))
}

/// Create all routes for the API.
pub fn routes(config: &ApiConfig) -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(auth_routes(config))
        .merge(vendor_routes())
        .merge(public_routes())
}

/// Build the application with its middleware stack, minus the Sentry
/// layers the binary adds on the outside.
pub fn app<S>(state: AppState, session_layer: SessionManagerLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    routes(state.config())
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(session_layer)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use secrecy::SecretString;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;
    use tower_sessions::MemoryStore;

    use super::*;
    use crate::middleware::configure_session_layer;

    /// App over a pool that never connects and an in-memory session store.
    /// Only paths that stop before the database can be exercised.
    fn test_app() -> Router {
        let config = ApiConfig {
            database_url: SecretString::from("postgres://vitrine@127.0.0.1:1/vitrine_test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 8000,
            base_url: "http://localhost:8000".to_owned(),
            media_url: "/media/".to_owned(),
            page_size: 20,
            trust_proxy: true,
            sentry_dsn: None,
            sentry_environment: None,
        };
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(500))
            .connect_lazy("postgres://vitrine@127.0.0.1:1/vitrine_test")
            .unwrap();

        app(
            AppState::new(config, pool),
            configure_session_layer(MemoryStore::default(), false),
        )
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-forwarded-for", "203.0.113.10")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_app().oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"ok");
    }

    #[tokio::test]
    async fn test_readiness_without_database() {
        let response = test_app().oneshot(get_request("/health/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_security_headers_and_request_id() {
        let request = Request::builder()
            .uri("/health")
            .header("x-request-id", "req-123")
            .body(Body::empty())
            .unwrap();
        let response = test_app().oneshot(request).await.unwrap();

        let headers = response.headers();
        assert_eq!(headers["x-frame-options"], "DENY");
        assert_eq!(headers["x-content-type-options"], "nosniff");
        assert_eq!(headers["x-request-id"], "req-123");
    }

    #[tokio::test]
    async fn test_vendor_routes_require_session() {
        for (method, uri) in [
            ("GET", "/dashboard/"),
            ("GET", "/products/"),
            ("POST", "/products/"),
            ("GET", "/products/1/"),
            ("PUT", "/products/1/"),
            ("PATCH", "/products/1/"),
            ("DELETE", "/products/1/"),
            ("GET", "/categories/"),
            ("POST", "/categories/"),
            ("DELETE", "/categories/1/"),
            ("POST", "/change-password/"),
        ] {
            let response = test_app()
                .oneshot(json_request(method, uri, "{}"))
                .await
                .unwrap();
            assert_eq!(
                response.status(),
                StatusCode::UNAUTHORIZED,
                "{method} {uri}"
            );

            let body = json_body(response).await;
            assert!(body["error"].is_string(), "{method} {uri}");
        }
    }

    #[tokio::test]
    async fn test_login_requires_fields() {
        let response = test_app()
            .oneshot(json_request("POST", "/login/", r#"{"username": "  "}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert_eq!(body["fields"]["username"][0], "This field may not be blank.");
        assert_eq!(body["fields"]["password"][0], "This field is required.");
    }

    #[tokio::test]
    async fn test_login_rejects_malformed_json() {
        let response = test_app()
            .oneshot(json_request("POST", "/login/", "{not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert!(body["fields"]["non_field_errors"].is_array());
    }

    #[tokio::test]
    async fn test_failed_login_sets_no_cookie() {
        let response = test_app()
            .oneshot(json_request("POST", "/login/", "{}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn test_logout_without_session() {
        let response = test_app()
            .oneshot(json_request("POST", "/logout/", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["message"], "Logout successful");
    }

    #[tokio::test]
    async fn test_public_reads_report_database_failure() {
        for uri in [
            "/public/products/",
            "/public/boutiques/",
            "/public/sliders/",
            "/public/config/",
            "/init-app-data/",
        ] {
            let response = test_app().oneshot(get_request(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
            assert_eq!(json_body(response).await["error"], "Internal server error", "{uri}");
        }
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let response = test_app().oneshot(get_request("/admin/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

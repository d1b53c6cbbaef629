//! Request ID middleware.
//!
//! Every response carries an `x-request-id`. An ID sent by the caller or a
//! fronting proxy is reused when it looks like an ID; anything else
//! (oversized, empty, control characters, spaces) is replaced by a fresh
//! UUID v4 so log lines and Sentry tags stay clean.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream ID that is kept.
pub const MAX_REQUEST_ID_LENGTH: usize = 128;

fn is_acceptable(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_REQUEST_ID_LENGTH
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b':' | b'/'))
}

/// The request's ID: the upstream header when acceptable, else a new UUID.
fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|id| is_acceptable(id))
        .map_or_else(|| Uuid::new_v4().to_string(), String::from)
}

/// Record the request ID on the request span and the Sentry scope, then
/// echo it in the response headers.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = request_id(request.headers());

    Span::current().record("request_id", &request_id);
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            REQUEST_ID_HEADER,
            HeaderValue::from_str(value).unwrap_or_else(|_| HeaderValue::from_static("x")),
        );
        headers
    }

    fn is_uuid(id: &str) -> bool {
        Uuid::parse_str(id).is_ok()
    }

    #[test]
    fn test_upstream_id_reused() {
        assert_eq!(request_id(&headers("req-123")), "req-123");
        assert_eq!(
            request_id(&headers("01HZX3:web/7.2_a")),
            "01HZX3:web/7.2_a"
        );
    }

    #[test]
    fn test_missing_id_generated() {
        assert!(is_uuid(&request_id(&HeaderMap::new())));
    }

    #[test]
    fn test_unacceptable_ids_replaced() {
        let oversized = "a".repeat(MAX_REQUEST_ID_LENGTH + 1);
        for bad in ["", "two words", "<script>", oversized.as_str()] {
            let id = request_id(&headers(bad));
            assert!(is_uuid(&id), "{bad:?} kept as {id:?}");
        }
    }

    #[test]
    fn test_longest_id_kept() {
        let longest = "b".repeat(MAX_REQUEST_ID_LENGTH);
        assert_eq!(request_id(&headers(&longest)), longest);
    }
}

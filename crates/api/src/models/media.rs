//! Media URL rendering for stored image paths.

/// Base URL under which uploaded images are served.
///
/// Records store relative paths such as `product_images/robe.jpg`; clients
/// receive `{base}/product_images/robe.jpg`. Paths that are already absolute
/// URLs are passed through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUrl(String);

impl MediaUrl {
    /// Create a media base, e.g. `/media/` or `https://cdn.example.com/media`.
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        Self(base.into())
    }

    /// Render a stored path as a client URL.
    #[must_use]
    pub fn resolve(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_owned();
        }
        format!(
            "{}/{}",
            self.0.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Turn a client-supplied image value back into a stored path.
    ///
    /// Clients echo the URLs they were given, so a value under this base
    /// loses the base; anything else is kept as sent.
    #[must_use]
    pub fn to_stored_path<'s>(&self, value: &'s str) -> &'s str {
        value
            .strip_prefix(self.0.trim_end_matches('/'))
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(value)
    }

    /// Render an optional stored path.
    #[must_use]
    pub fn resolve_opt(&self, path: Option<&str>) -> Option<String> {
        path.filter(|p| !p.is_empty()).map(|p| self.resolve(p))
    }
}

impl Default for MediaUrl {
    fn default() -> Self {
        Self::new("/media/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_path() {
        let media = MediaUrl::default();
        assert_eq!(
            media.resolve("product_images/robe.jpg"),
            "/media/product_images/robe.jpg"
        );
    }

    #[test]
    fn test_resolve_with_absolute_base() {
        let media = MediaUrl::new("https://cdn.example.com/media");
        assert_eq!(
            media.resolve("/slider_images/a.png"),
            "https://cdn.example.com/media/slider_images/a.png"
        );
    }

    #[test]
    fn test_absolute_urls_pass_through() {
        let media = MediaUrl::default();
        assert_eq!(
            media.resolve("https://images.example.com/x.jpg"),
            "https://images.example.com/x.jpg"
        );
    }

    #[test]
    fn test_stored_path_inverts_resolve() {
        for base in ["/media/", "/media", "https://cdn.example.com/media/"] {
            let media = MediaUrl::new(base);
            let url = media.resolve("product_images/robe.jpg");
            assert_eq!(media.to_stored_path(&url), "product_images/robe.jpg", "{base}");
        }
    }

    #[test]
    fn test_stored_path_keeps_other_values() {
        let media = MediaUrl::default();
        assert_eq!(
            media.to_stored_path("product_images/robe.jpg"),
            "product_images/robe.jpg"
        );
        assert_eq!(
            media.to_stored_path("https://images.example.com/x.jpg"),
            "https://images.example.com/x.jpg"
        );
        // Only a whole path segment counts as the base
        assert_eq!(media.to_stored_path("/mediafiles/x.jpg"), "/mediafiles/x.jpg");
    }

    #[test]
    fn test_resolve_opt_skips_empty() {
        let media = MediaUrl::default();
        assert_eq!(media.resolve_opt(None), None);
        assert_eq!(media.resolve_opt(Some("")), None);
        assert_eq!(
            media.resolve_opt(Some("logo.png")),
            Some("/media/logo.png".to_owned())
        );
    }
}

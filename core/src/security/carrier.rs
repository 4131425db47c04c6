//! Request carriers the identity header can be read from.

use std::collections::HashMap;

use actix_web::http::header::HeaderMap;
use actix_web::HttpRequest;

/// A request exposing its headers.
///
/// Implemented for actix-web's `HttpRequest` and `HeaderMap`, and for a
/// plain `HashMap<String, String>` (matched case-insensitively), so any
/// HTTP integration can hand its request to a
/// [`ResolverContext`](crate::security::ResolverContext).
pub trait HeaderSource {
    /// Returns the value of the header, if present and valid UTF-8.
    fn header(&self, name: &str) -> Option<&str>;
}

impl HeaderSource for HeaderMap {
    fn header(&self, name: &str) -> Option<&str> {
        self.get(name)?.to_str().ok()
    }
}

impl HeaderSource for HttpRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers().header(name)
    }
}

impl HeaderSource for HashMap<String, String> {
    fn header(&self, name: &str) -> Option<&str> {
        self.get(name)
            .or_else(|| {
                self.iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(name))
                    .map(|(_, value)| value)
            })
            .map(String::as_str)
    }
}

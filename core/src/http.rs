//! HTTP transport types shared by the blocking and async clients.
//!
//! # Design
//! The core builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network. The two client wrappers only translate
//! these plain-data types to and from their transport library, so the
//! validation, decoding and error classification rules live in one place.
//!
//! Every Provider call is a `GET` with a query string, so no method or body
//! is carried.

/// A Provider request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Endpoint name, e.g. `ItemList`. Used for logging.
    pub endpoint: &'static str,
    /// Absolute URL without the query string.
    pub url: String,
    /// Query parameters in the order they are sent.
    pub query: Vec<(String, String)>,
}

impl HttpRequest {
    /// Value of the first query parameter named `key`.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A Provider response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

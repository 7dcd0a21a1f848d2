//! HTTP request type handed to HTTP-triggered functions.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// HTTP method enumeration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
            Method::Patch => write!(f, "PATCH"),
            Method::Head => write!(f, "HEAD"),
            Method::Options => write!(f, "OPTIONS"),
        }
    }
}

impl From<&hyper::Method> for Method {
    fn from(method: &hyper::Method) -> Self {
        match *method {
            hyper::Method::POST => Method::Post,
            hyper::Method::PUT => Method::Put,
            hyper::Method::DELETE => Method::Delete,
            hyper::Method::PATCH => Method::Patch,
            hyper::Method::HEAD => Method::Head,
            hyper::Method::OPTIONS => Method::Options,
            _ => Method::Get,
        }
    }
}

/// Inbound HTTP request as seen by a function.
///
/// Built once per invocation by the host and never mutated by the function.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Request path, without the query string.
    pub url: String,
    /// Decoded query-string parameters.
    pub query: HashMap<String, String>,
    /// HTTP headers.
    pub headers: HashMap<String, String>,
    /// Request body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Bytes>,
}

impl HttpRequest {
    /// Create a request with no query, headers or body.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            ..Default::default()
        }
    }

    /// Add a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Merge parameters from a raw `application/x-www-form-urlencoded` query string.
    ///
    /// Later occurrences of a key overwrite earlier ones.
    pub fn with_query_string(mut self, raw: &str) -> Self {
        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            self.query.insert(key.into_owned(), value.into_owned());
        }
        self
    }

    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Look up a decoded query parameter.
    pub fn query_param(&self, key: &str) -> Option<&String> {
        self.query.get(key)
    }

    /// Parse the body as JSON if present.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Option<Result<T, serde_json::Error>> {
        self.body.as_ref().map(|b| serde_json::from_slice(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_string_is_percent_decoded() {
        let req = HttpRequest::new(Method::Get, "/api/http_trigger")
            .with_query_string("name=Jane%20Doe&city=S%C3%A3o+Paulo");
        assert_eq!(req.query_param("name"), Some(&"Jane Doe".to_string()));
        assert_eq!(req.query_param("city"), Some(&"São Paulo".to_string()));
    }

    #[test]
    fn later_duplicate_query_key_wins() {
        let req = HttpRequest::default().with_query_string("name=a&name=b");
        assert_eq!(req.query_param("name"), Some(&"b".to_string()));
    }

    #[test]
    fn header_replaces_previous_value() {
        let req = HttpRequest::new(Method::Get, "/")
            .header("x-trace", "a")
            .header("x-trace", "b");
        assert_eq!(req.headers.get("x-trace"), Some(&"b".to_string()));
    }

    #[test]
    fn json_is_none_without_body() {
        let req = HttpRequest::new(Method::Post, "/");
        assert!(req.json::<serde_json::Value>().is_none());
    }

    #[test]
    fn hyper_method_conversion() {
        assert_eq!(Method::from(&hyper::Method::POST), Method::Post);
        assert_eq!(Method::from(&hyper::Method::TRACE), Method::Get);
    }
}

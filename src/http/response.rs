//! HTTP response type returned by HTTP-triggered functions.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const CONTENT_TYPE: &str = "Content-Type";

/// Numeric HTTP status carried by an [`HttpResponse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCode(pub u16);

impl StatusCode {
    pub const OK: StatusCode = StatusCode(200);
    pub const BAD_REQUEST: StatusCode = StatusCode(400);
    pub const NOT_FOUND: StatusCode = StatusCode(404);
    pub const PAYLOAD_TOO_LARGE: StatusCode = StatusCode(413);
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        StatusCode(code)
    }
}

/// Response produced by a function and returned to the trigger caller.
///
/// Functions build it once and hand it back; the host only translates it
/// into a hyper response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HashMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Bytes>,
}

impl HttpResponse {
    /// Create an empty response with the given status.
    pub fn new(status: impl Into<StatusCode>) -> Self {
        Self {
            status: status.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Create a 200 response with a JSON body.
    pub fn json<T: Serialize>(data: &T) -> Result<Self, serde_json::Error> {
        let body = serde_json::to_vec(data)?;
        Ok(Self::new(StatusCode::OK)
            .header(CONTENT_TYPE, "application/json")
            .body(body))
    }

    /// Create a 200 plain-text response.
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(StatusCode::OK)
            .header(CONTENT_TYPE, "text/plain")
            .body(content.into())
    }

    /// Create a plain-text response with an arbitrary status.
    pub fn error(status: impl Into<StatusCode>, message: impl Into<String>) -> Self {
        Self::new(status)
            .header(CONTENT_TYPE, "text/plain")
            .body(message.into())
    }

    /// Set a header, replacing any previous value.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the response body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Body decoded as UTF-8 (lossily), if any.
    pub fn text_body(&self) -> Option<String> {
        self.body
            .as_ref()
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_sets_plain_content_type() {
        let res = HttpResponse::text("hi");
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.headers.get(CONTENT_TYPE).map(String::as_str), Some("text/plain"));
        assert_eq!(res.text_body(), Some("hi".to_string()));
    }

    #[test]
    fn json_serializes_body() {
        let res = HttpResponse::json(&serde_json::json!({ "ok": true })).unwrap();
        assert_eq!(
            res.headers.get(CONTENT_TYPE).map(String::as_str),
            Some("application/json")
        );
        assert_eq!(res.text_body(), Some(r#"{"ok":true}"#.to_string()));
    }

    #[test]
    fn error_keeps_status() {
        let res = HttpResponse::error(404u16, "missing");
        assert_eq!(res.status, StatusCode::NOT_FOUND);
    }
}

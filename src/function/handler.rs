//! Function traits, invocation context and error type.

use crate::blob::BlobDescriptor;
use crate::http::{HttpRequest, HttpResponse};
use crate::log::InvocationLog;
use async_trait::async_trait;
use std::collections::HashMap;

/// Per-invocation context handed to a function.
#[derive(Debug, Clone, Default)]
pub struct FunctionContext {
    /// Environment variables available to the function.
    pub env: HashMap<String, String>,
    pub function_name: String,
    /// Invocation ID for tracing.
    pub invocation_id: String,
}

impl FunctionContext {
    pub fn new(function_name: impl Into<String>, invocation_id: impl Into<String>) -> Self {
        Self {
            env: HashMap::new(),
            function_name: function_name.into(),
            invocation_id: invocation_id.into(),
        }
    }

    /// Add an environment variable.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Get an environment variable.
    pub fn get_env(&self, key: &str) -> Option<&String> {
        self.env.get(key)
    }
}

/// A function bound to an HTTP trigger.
///
/// Implementations must not keep state between invocations; the host may
/// call `fetch` concurrently.
#[async_trait]
pub trait HttpFunction: Send + Sync {
    /// Handle one inbound request.
    async fn fetch(
        &self,
        request: HttpRequest,
        ctx: &FunctionContext,
    ) -> Result<HttpResponse, FunctionError>;

    fn name(&self) -> &str;
}

/// A function bound to a storage blob trigger.
#[async_trait]
pub trait BlobFunction: Send + Sync {
    /// Handle one blob delivery, writing informational output to `log`.
    async fn process(
        &self,
        blob: &BlobDescriptor,
        ctx: &FunctionContext,
        log: &dyn InvocationLog,
    ) -> Result<(), FunctionError>;

    fn name(&self) -> &str;
}

/// Error raised by the host or a function, carrying an HTTP status code.
#[derive(Debug, Clone)]
pub struct FunctionError {
    pub message: String,
    pub code: u16,
}

impl FunctionError {
    /// Create an internal (500) error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: 500,
        }
    }

    pub fn with_code(code: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_code(404, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_code(400, message)
    }
}

impl std::fmt::Display for FunctionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for FunctionError {}

impl From<FunctionError> for HttpResponse {
    fn from(err: FunctionError) -> Self {
        HttpResponse::error(err.code, err.message)
    }
}

impl From<serde_json::Error> for FunctionError {
    fn from(err: serde_json::Error) -> Self {
        FunctionError::bad_request(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::StatusCode;

    #[test]
    fn error_converts_to_response_with_its_code() {
        let response: HttpResponse = FunctionError::not_found("no such function").into();
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.text_body(), Some("no such function".to_string()));
    }

    #[test]
    fn json_errors_are_bad_requests() {
        let err: FunctionError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.code, 400);
    }

    #[test]
    fn display_includes_code() {
        assert_eq!(FunctionError::new("boom").to_string(), "[500] boom");
    }
}

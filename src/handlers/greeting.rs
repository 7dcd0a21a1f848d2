//! HTTP-triggered greeting.

use crate::function::{FunctionContext, FunctionError, HttpFunction};
use crate::http::{HttpRequest, HttpResponse};
use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

/// Registration name of the greeting function.
pub const FUNCTION_NAME: &str = "http_trigger";

pub const ANONYMOUS_MESSAGE: &str = "This HTTP triggered function executed successfully. \
Pass a name in the query string or in the request body for a personalized response.";

/// Greet the caller named in the query string or JSON body.
///
/// Always answers 200; an unreadable body counts as no name.
pub fn handle(request: &HttpRequest) -> HttpResponse {
    info!("HTTP trigger function processed a request.");

    match resolve_name(request) {
        Some(name) => HttpResponse::text(format!(
            "Hello, {}. This HTTP triggered function executed successfully.",
            name
        )),
        None => HttpResponse::text(ANONYMOUS_MESSAGE),
    }
}

/// Query parameter `name`, else the `name` field of a JSON object body.
pub fn resolve_name(request: &HttpRequest) -> Option<String> {
    request
        .query_param("name")
        .filter(|name| !name.is_empty())
        .cloned()
        .or_else(|| name_from_body(request))
}

fn name_from_body(request: &HttpRequest) -> Option<String> {
    let body: Value = request.json()?.ok()?;
    body.get("name")?
        .as_str()
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

/// [`handle`] bound as an HTTP trigger.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreetingFunction;

#[async_trait]
impl HttpFunction for GreetingFunction {
    async fn fetch(
        &self,
        request: HttpRequest,
        _ctx: &FunctionContext,
    ) -> Result<HttpResponse, FunctionError> {
        Ok(handle(&request))
    }

    fn name(&self) -> &str {
        FUNCTION_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Method, StatusCode};

    fn body_of(response: &HttpResponse) -> String {
        response.text_body().unwrap_or_default()
    }

    #[test]
    fn greets_name_from_query() {
        let req = HttpRequest::new(Method::Get, "/api/http_trigger").query("name", "Azure");
        let res = handle(&req);
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(
            body_of(&res),
            "Hello, Azure. This HTTP triggered function executed successfully."
        );
    }

    #[test]
    fn greets_name_from_json_body() {
        let req = HttpRequest::new(Method::Post, "/api/http_trigger").body(r#"{"name": "GitHub"}"#);
        let res = handle(&req);
        assert_eq!(res.status, StatusCode::OK);
        assert!(body_of(&res).contains("Hello, GitHub"));
    }

    #[test]
    fn query_takes_precedence_over_body() {
        let req = HttpRequest::new(Method::Post, "/")
            .query("name", "Query")
            .body(r#"{"name": "Body"}"#);
        assert_eq!(resolve_name(&req), Some("Query".to_string()));
    }

    #[test]
    fn missing_name_gets_generic_message() {
        let res = handle(&HttpRequest::new(Method::Get, "/api/http_trigger"));
        assert_eq!(res.status, StatusCode::OK);
        assert!(body_of(&res).contains("Pass a name in the query string"));
    }

    #[test]
    fn malformed_body_is_treated_as_no_name() {
        let req = HttpRequest::new(Method::Post, "/").body("{not json");
        let res = handle(&req);
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(body_of(&res), ANONYMOUS_MESSAGE);
    }

    #[test]
    fn non_string_or_empty_names_are_ignored() {
        let numeric = HttpRequest::new(Method::Post, "/").body(r#"{"name": 42}"#);
        assert_eq!(resolve_name(&numeric), None);

        let array = HttpRequest::new(Method::Post, "/").body(r#"["name"]"#);
        assert_eq!(resolve_name(&array), None);

        let empty = HttpRequest::new(Method::Get, "/").query("name", "");
        assert_eq!(resolve_name(&empty), None);
    }

    #[test]
    fn empty_query_name_falls_through_to_body() {
        let req = HttpRequest::new(Method::Post, "/")
            .query("name", "")
            .body(r#"{"name": "Body"}"#);
        assert_eq!(resolve_name(&req), Some("Body".to_string()));
    }

    #[test]
    fn greeting_function_wraps_handle() {
        let ctx = FunctionContext::new(FUNCTION_NAME, "inv-1");
        let req = HttpRequest::new(Method::Get, "/").query("name", "Rust");
        let res = tokio_test::block_on(GreetingFunction.fetch(req, &ctx)).unwrap();
        assert_eq!(GreetingFunction.name(), "http_trigger");
        assert!(res.text_body().unwrap().starts_with("Hello, Rust."));
    }
}

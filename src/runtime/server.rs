//! Host HTTP server the platform forwards invocations to.

use crate::blob::BlobDescriptor;
use crate::function::{BlobFunction, FunctionError, FunctionRegistry, HttpFunction};
use crate::http::{HttpRequest, HttpResponse, Method, StatusCode};
use crate::log::{MemoryLog, TeeLog, TracingLog};
use crate::runtime::{HostConfig, InvocationRequest, InvocationResponse};
use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

/// Host server.
///
/// Requests under `/api/{function}` are forwarded HTTP trigger calls;
/// `POST /{function}` carries a JSON [`InvocationRequest`] for blob triggers.
pub struct HostServer {
    config: HostConfig,
    registry: Arc<FunctionRegistry>,
}

impl HostServer {
    /// Create a host server with an empty registry.
    pub fn new(config: HostConfig) -> Self {
        let registry = Arc::new(FunctionRegistry::with_env(config.env.clone()));
        Self { config, registry }
    }

    /// Shared handle to the function registry.
    pub fn registry(&self) -> Arc<FunctionRegistry> {
        self.registry.clone()
    }

    /// Register a function bound to an HTTP trigger.
    pub async fn register_http(
        &self,
        name: impl Into<String>,
        function: Arc<dyn HttpFunction>,
    ) -> Result<(), FunctionError> {
        self.registry.register_http(name, function).await
    }

    /// Register a function bound to a blob trigger.
    pub async fn register_blob(
        &self,
        name: impl Into<String>,
        function: Arc<dyn BlobFunction>,
    ) -> Result<(), FunctionError> {
        self.registry.register_blob(name, function).await
    }

    /// Bind to the configured address and serve until the process exits.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr: SocketAddr = self.config.bind_addr().parse()?;
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener).await
    }

    /// Serve connections from an already bound listener.
    pub async fn serve(
        self,
        listener: TcpListener,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        info!("Host server listening on {}", listener.local_addr()?);

        let registry = self.registry.clone();
        let config = Arc::new(self.config);

        loop {
            let (stream, remote_addr) = listener.accept().await?;
            let io = TokioIo::new(stream);

            let registry = registry.clone();
            let config = config.clone();

            tokio::task::spawn(async move {
                let service = service_fn(move |req| {
                    let registry = registry.clone();
                    let config = config.clone();
                    async move { handle_request(req, registry, config, remote_addr).await }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    error!("Error serving connection: {:?}", err);
                }
            });
        }
    }
}

async fn handle_request(
    req: Request<Incoming>,
    registry: Arc<FunctionRegistry>,
    config: Arc<HostConfig>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let path = req.uri().path().to_string();
    let invocation_id = generate_invocation_id();

    debug!(
        "Handling request: {} {} from {} [{}]",
        req.method(),
        path,
        remote_addr,
        invocation_id
    );

    if config.enable_health && path == "/_health" {
        return Ok(build_response(HttpResponse::text("OK")));
    }

    let result = match route(&path) {
        Some(Route::Http(function)) => {
            dispatch_http(req, &function, &registry, &config, &invocation_id).await
        }
        Some(Route::Invocation(function)) if req.method() == hyper::Method::POST => {
            dispatch_invocation(req, &function, &registry, &config, &invocation_id).await
        }
        _ => Err(FunctionError::not_found(format!("No function at '{}'", path))),
    };

    match result {
        Ok(response) => Ok(build_response(response)),
        Err(e) => {
            if e.code >= 500 {
                error!("Invocation failed for {}: {} [{}]", path, e, invocation_id);
            } else {
                warn!("Rejected request for {}: {} [{}]", path, e, invocation_id);
            }
            Ok(build_response(e.into()))
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Route {
    /// `/api/{function}[/...]`
    Http(String),
    /// `/{function}`
    Invocation(String),
}

fn route(path: &str) -> Option<Route> {
    let trimmed = path.trim_start_matches('/');

    if let Some(rest) = trimmed.strip_prefix("api/") {
        let function = rest.split('/').next().unwrap_or_default();
        return (!function.is_empty()).then(|| Route::Http(function.to_string()));
    }

    (!trimmed.is_empty() && !trimmed.contains('/')).then(|| Route::Invocation(trimmed.to_string()))
}

async fn dispatch_http(
    req: Request<Incoming>,
    function: &str,
    registry: &FunctionRegistry,
    config: &HostConfig,
    invocation_id: &str,
) -> Result<HttpResponse, FunctionError> {
    let request = convert_request(req, config).await?;
    registry.execute_http(function, request, invocation_id).await
}

async fn dispatch_invocation(
    req: Request<Incoming>,
    function: &str,
    registry: &FunctionRegistry,
    config: &HostConfig,
    invocation_id: &str,
) -> Result<HttpResponse, FunctionError> {
    let body = collect_body(req.into_body(), config.max_body_size).await?;
    let invocation: InvocationRequest = if body.is_empty() {
        InvocationRequest::default()
    } else {
        serde_json::from_slice(&body)?
    };

    let blob = BlobDescriptor::from_invocation(&invocation);
    let captured = MemoryLog::new();
    let tracing_log = TracingLog::new(function);
    let log = TeeLog::new(&tracing_log, &captured);

    registry
        .deliver_blob(function, &blob, invocation_id, &log)
        .await?;

    Ok(HttpResponse::json(&InvocationResponse::with_logs(
        captured.drain(),
    ))?)
}

/// Convert a hyper request into an [`HttpRequest`].
async fn convert_request(
    req: Request<Incoming>,
    config: &HostConfig,
) -> Result<HttpRequest, FunctionError> {
    let mut request = HttpRequest::new(Method::from(req.method()), req.uri().path())
        .with_query_string(req.uri().query().unwrap_or_default());

    for (name, value) in req.headers() {
        if let Ok(v) = value.to_str() {
            request = request.header(name.as_str(), v);
        }
    }

    let body = collect_body(req.into_body(), config.max_body_size).await?;
    if !body.is_empty() {
        request = request.body(body);
    }

    Ok(request)
}

/// Read a request body, refusing to buffer more than `limit` bytes.
async fn collect_body<B>(body: B, limit: usize) -> Result<Bytes, FunctionError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let too_large = || {
        FunctionError::with_code(StatusCode::PAYLOAD_TOO_LARGE.0, "Request body too large")
    };

    // A declared Content-Length over the limit is refused before reading.
    if body.size_hint().lower() > limit as u64 {
        return Err(too_large());
    }

    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => Err(too_large()),
        Err(e) => Err(FunctionError::bad_request(format!(
            "Failed to read body: {}",
            e
        ))),
    }
}

/// Build a hyper response from an [`HttpResponse`].
fn build_response(response: HttpResponse) -> Response<Full<Bytes>> {
    let status = hyper::StatusCode::from_u16(response.status.0).unwrap_or_else(|_| {
        warn!(
            "Invalid status code {}, falling back to 500 Internal Server Error",
            response.status.0
        );
        hyper::StatusCode::INTERNAL_SERVER_ERROR
    });

    let mut builder = Response::builder().status(status);
    for (name, value) in &response.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    let body = response.body.unwrap_or_default();
    builder.body(Full::new(body.clone())).unwrap_or_else(|e| {
        warn!("Dropping invalid response headers: {}", e);
        let mut fallback = Response::new(Full::new(body));
        *fallback.status_mut() = status;
        fallback
    })
}

/// Generate a unique invocation ID.
fn generate_invocation_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("{:x}", timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::body::Frame;
    use std::collections::VecDeque;
    use std::convert::Infallible;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    #[test]
    fn routes_forwarded_http_calls() {
        assert_eq!(
            route("/api/http_trigger"),
            Some(Route::Http("http_trigger".to_string()))
        );
        assert_eq!(
            route("/api/http_trigger/extra"),
            Some(Route::Http("http_trigger".to_string()))
        );
        assert_eq!(route("/api/"), None);
    }

    #[test]
    fn routes_trigger_invocations() {
        assert_eq!(
            route("/BlobTrigger"),
            Some(Route::Invocation("BlobTrigger".to_string()))
        );
        assert_eq!(route("/"), None);
        assert_eq!(route("/a/b"), None);
    }

    #[test]
    fn invalid_status_falls_back_to_500() {
        let response = build_response(HttpResponse::new(StatusCode(42)));
        assert_eq!(response.status(), hyper::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn body_within_limit_is_collected() {
        let body = Full::new(Bytes::from_static(b"0123456789"));
        let bytes = collect_body(body, 16).await.unwrap();
        assert_eq!(&bytes[..], b"0123456789");
    }

    #[tokio::test]
    async fn oversized_body_is_refused_before_reading() {
        let body = Full::new(Bytes::from(vec![b'x'; 1024 * 1024]));
        let err = collect_body(body, 16).await.unwrap_err();
        assert_eq!(err.code, 413);
    }

    /// Body yielding data frames without declaring a length.
    struct Chunks(VecDeque<Bytes>);

    impl Body for Chunks {
        type Data = Bytes;
        type Error = Infallible;

        fn poll_frame(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
        ) -> Poll<Option<Result<Frame<Bytes>, Infallible>>> {
            Poll::Ready(self.0.pop_front().map(|chunk| Ok(Frame::data(chunk))))
        }
    }

    #[tokio::test]
    async fn streamed_body_is_cut_off_at_limit() {
        let body = Chunks(VecDeque::from(vec![
            Bytes::from_static(b"0123456789"),
            Bytes::from_static(b"0123456789"),
        ]));
        let err = collect_body(body, 16).await.unwrap_err();
        assert_eq!(err.code, 413);
    }

    #[tokio::test]
    async fn streamed_body_within_limit_is_joined() {
        let body = Chunks(VecDeque::from(vec![
            Bytes::from_static(b"abc"),
            Bytes::from_static(b"def"),
        ]));
        assert_eq!(&collect_body(body, 16).await.unwrap()[..], b"abcdef");
    }

    #[test]
    fn invocation_ids_are_hex() {
        let id = generate_invocation_id();
        assert!(!id.is_empty());
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}

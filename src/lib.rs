//! # trigger-fns
//!
//! Two stateless serverless functions and the host process that exposes them
//! to a function platform:
//!
//! - [`handlers::greeting`]: an HTTP trigger that greets the caller named in
//!   the query string or JSON body;
//! - [`handlers::blob_notify`]: a storage blob trigger that logs the blob's
//!   name and size.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Function platform                         │
//! │        (trigger bindings, scaling, blob delivery)            │
//! └──────────────────────────────────────────────────────────────┘
//!          │ /api/{function}                │ POST /{function}
//!          ▼                                ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       HostServer                             │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │                  FunctionRegistry                      │  │
//! │  │  http_trigger: HttpFunction  BlobTrigger: BlobFunction │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The handlers themselves are plain functions and can be called directly:
//!
//! ```rust
//! use trigger_fns::prelude::*;
//! use trigger_fns::handlers::{blob_notify, greeting};
//!
//! let request = HttpRequest::new(Method::Get, "/api/http_trigger").query("name", "Azure");
//! let response = greeting::handle(&request);
//! assert!(response.text_body().unwrap().contains("Hello, Azure"));
//!
//! let log = MemoryLog::new();
//! blob_notify::handle(&BlobDescriptor::new("report.csv", 512), &log);
//! assert!(log.records()[0].contains("512 bytes"));
//! ```

pub mod blob;
pub mod function;
pub mod handlers;
pub mod http;
pub mod log;
pub mod runtime;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::blob::BlobDescriptor;
    pub use crate::function::{
        BlobFunction, FunctionContext, FunctionError, FunctionRegistry, HttpFunction, TriggerKind,
    };
    pub use crate::handlers::{BlobNotifyFunction, GreetingFunction};
    pub use crate::http::{HttpRequest, HttpResponse, Method, StatusCode};
    pub use crate::log::{InvocationLog, MemoryLog, TracingLog};
    pub use crate::runtime::{HostConfig, HostServer, InvocationRequest, InvocationResponse};
    pub use async_trait::async_trait;
}

pub use blob::BlobDescriptor;
pub use function::{FunctionContext, FunctionError, FunctionRegistry};
pub use http::{HttpRequest, HttpResponse};
pub use runtime::{HostConfig, HostServer};

//! Host runtime: configuration, invocation envelopes and the HTTP server.

mod config;
mod invocation;
mod server;

pub use config::{ConfigError, HostConfig};
pub use invocation::{InvocationRequest, InvocationResponse};
pub use server::HostServer;

//! Host process for the greeting and blob notification functions.

use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use trigger_fns::handlers::{blob_notify, greeting};
use trigger_fns::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = HostConfig::from_env()?;
    let addr = config.bind_addr();
    let server = HostServer::new(config);

    server
        .register_http(greeting::FUNCTION_NAME, Arc::new(GreetingFunction))
        .await?;
    server
        .register_blob(blob_notify::FUNCTION_NAME, Arc::new(BlobNotifyFunction))
        .await?;

    for (name, kind) in server.registry().list().await {
        tracing::info!("Registered function: {} ({} trigger)", name, kind);
    }
    tracing::info!("Try: curl 'http://{}/api/http_trigger?name=Azure'", addr);
    tracing::info!("Health check: curl http://{}/_health", addr);

    server.run().await
}

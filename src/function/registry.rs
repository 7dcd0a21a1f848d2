//! Registry mapping function names to their trigger bindings.

use crate::blob::BlobDescriptor;
use crate::function::handler::{BlobFunction, FunctionContext, FunctionError, HttpFunction};
use crate::http::{HttpRequest, HttpResponse};
use crate::log::InvocationLog;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Kind of trigger a function is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    Http,
    Blob,
}

impl std::fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TriggerKind::Http => write!(f, "http"),
            TriggerKind::Blob => write!(f, "blob"),
        }
    }
}

#[derive(Clone)]
enum Binding {
    Http(Arc<dyn HttpFunction>),
    Blob(Arc<dyn BlobFunction>),
}

impl Binding {
    fn kind(&self) -> TriggerKind {
        match self {
            Binding::Http(_) => TriggerKind::Http,
            Binding::Blob(_) => TriggerKind::Blob,
        }
    }
}

/// Registry of trigger functions.
///
/// Functions are stateless, so there is no load or unload step: a lookup
/// clones the function handle out of the table and the lock is released
/// before the function runs.
pub struct FunctionRegistry {
    functions: RwLock<HashMap<String, Binding>>,
    /// Environment copied into every invocation context.
    global_env: HashMap<String, String>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::with_env(HashMap::new())
    }

    pub fn with_env(env: HashMap<String, String>) -> Self {
        Self {
            functions: RwLock::new(HashMap::new()),
            global_env: env,
        }
    }

    /// Register a function bound to an HTTP trigger.
    pub async fn register_http(
        &self,
        name: impl Into<String>,
        function: Arc<dyn HttpFunction>,
    ) -> Result<(), FunctionError> {
        self.insert(name.into(), Binding::Http(function)).await
    }

    /// Register a function bound to a blob trigger.
    pub async fn register_blob(
        &self,
        name: impl Into<String>,
        function: Arc<dyn BlobFunction>,
    ) -> Result<(), FunctionError> {
        self.insert(name.into(), Binding::Blob(function)).await
    }

    async fn insert(&self, name: String, binding: Binding) -> Result<(), FunctionError> {
        let mut functions = self.functions.write().await;

        if functions.contains_key(&name) {
            return Err(FunctionError::new(format!(
                "Function '{}' is already registered",
                name
            )));
        }

        let kind = binding.kind();
        functions.insert(name.clone(), binding);
        info!("Registered {} function: {}", kind, name);
        Ok(())
    }

    /// Run an HTTP-triggered function.
    pub async fn execute_http(
        &self,
        name: &str,
        request: HttpRequest,
        invocation_id: &str,
    ) -> Result<HttpResponse, FunctionError> {
        let function = match self.lookup(name).await? {
            Binding::Http(function) => function,
            Binding::Blob(_) => {
                return Err(FunctionError::bad_request(format!(
                    "Function '{}' is not bound to an HTTP trigger",
                    name
                )))
            }
        };

        let ctx = self.context(name, invocation_id);
        debug!("Executing HTTP function '{}' [{}]", name, invocation_id);
        function.fetch(request, &ctx).await
    }

    /// Deliver a blob to a blob-triggered function.
    pub async fn deliver_blob(
        &self,
        name: &str,
        blob: &BlobDescriptor,
        invocation_id: &str,
        log: &dyn InvocationLog,
    ) -> Result<(), FunctionError> {
        let function = match self.lookup(name).await? {
            Binding::Blob(function) => function,
            Binding::Http(_) => {
                return Err(FunctionError::bad_request(format!(
                    "Function '{}' is not bound to a blob trigger",
                    name
                )))
            }
        };

        let ctx = self.context(name, invocation_id);
        debug!(
            "Delivering blob '{}' to function '{}' [{}]",
            blob.name, name, invocation_id
        );
        function.process(blob, &ctx, log).await
    }

    /// Get the trigger kind of a registered function.
    pub async fn trigger_kind(&self, name: &str) -> Option<TriggerKind> {
        let functions = self.functions.read().await;
        functions.get(name).map(Binding::kind)
    }

    /// List all registered functions, sorted by name.
    pub async fn list(&self) -> Vec<(String, TriggerKind)> {
        let functions = self.functions.read().await;
        let mut entries: Vec<_> = functions
            .iter()
            .map(|(name, binding)| (name.clone(), binding.kind()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Remove a function from the registry.
    pub async fn remove(&self, name: &str) -> Result<(), FunctionError> {
        let mut functions = self.functions.write().await;
        functions
            .remove(name)
            .ok_or_else(|| FunctionError::not_found(format!("Function '{}' not found", name)))?;

        info!("Removed function: {}", name);
        Ok(())
    }

    async fn lookup(&self, name: &str) -> Result<Binding, FunctionError> {
        let functions = self.functions.read().await;
        functions
            .get(name)
            .cloned()
            .ok_or_else(|| FunctionError::not_found(format!("Function '{}' not found", name)))
    }

    fn context(&self, name: &str, invocation_id: &str) -> FunctionContext {
        let mut ctx = FunctionContext::new(name, invocation_id);
        ctx.env = self.global_env.clone();
        ctx
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

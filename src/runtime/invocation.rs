//! Invocation envelopes exchanged with the hosting platform for
//! non-HTTP triggers.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Payload the platform posts to `/{function}` when a trigger fires.
///
/// `Data` holds the trigger's input bindings keyed by binding name;
/// `Metadata` holds trigger metadata such as the blob name and properties.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InvocationRequest {
    #[serde(default, deserialize_with = "object_or_empty")]
    pub data: HashMap<String, Value>,
    #[serde(default, deserialize_with = "object_or_empty")]
    pub metadata: HashMap<String, Value>,
}

/// Accept any JSON value; anything other than an object (including `null`)
/// becomes an empty map.
fn object_or_empty<'de, D>(deserializer: D) -> Result<HashMap<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => map.into_iter().collect(),
        _ => HashMap::new(),
    })
}

impl InvocationRequest {
    /// Create an envelope with no data or metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an input binding value.
    pub fn data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Set a trigger metadata value.
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Reply the host returns for a non-HTTP invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InvocationResponse {
    pub outputs: HashMap<String, Value>,
    pub logs: Vec<String>,
    pub return_value: Option<Value>,
}

impl InvocationResponse {
    /// Create a reply carrying only log lines.
    pub fn with_logs(logs: Vec<String>) -> Self {
        Self {
            logs,
            ..Default::default()
        }
    }
}

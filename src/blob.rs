//! Blob descriptor delivered by the storage trigger.

use crate::runtime::InvocationRequest;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Name used when the trigger metadata carries no blob name.
pub const UNKNOWN_BLOB_NAME: &str = "<unknown>";

/// Name and size of the blob that fired the trigger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobDescriptor {
    pub name: String,
    /// Size in bytes.
    pub length: u64,
}

impl BlobDescriptor {
    pub fn new(name: impl Into<String>, length: u64) -> Self {
        Self {
            name: name.into(),
            length,
        }
    }

    /// Build a descriptor from a platform invocation payload.
    ///
    /// Missing or malformed fields fall back to best-effort values instead
    /// of failing the invocation. Without a usable `Properties.Length`, the
    /// size of the string content under the lexicographically first `Data`
    /// binding is used.
    pub fn from_invocation(invocation: &InvocationRequest) -> Self {
        let name = invocation
            .metadata
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| {
                invocation
                    .metadata
                    .get("BlobTrigger")
                    .and_then(Value::as_str)
                    .and_then(|path| path.rsplit('/').next())
                    .filter(|segment| !segment.is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| {
                debug!("Blob invocation carried no name, using placeholder");
                UNKNOWN_BLOB_NAME.to_string()
            });

        let length = invocation
            .metadata
            .get("Properties")
            .and_then(|props| props.get("Length"))
            .and_then(Value::as_u64)
            .or_else(|| {
                invocation
                    .data
                    .iter()
                    .filter_map(|(binding, value)| value.as_str().map(|content| (binding, content)))
                    .min_by(|a, b| a.0.cmp(b.0))
                    .map(|(_, content)| content.len() as u64)
            })
            .unwrap_or_else(|| {
                debug!(blob = %name, "Blob invocation carried no usable length, using 0");
                0
            });

        Self { name, length }
    }
}

//! Blob-triggered notification.

use crate::blob::BlobDescriptor;
use crate::function::{BlobFunction, FunctionContext, FunctionError};
use crate::log::InvocationLog;
use async_trait::async_trait;

/// Registration name of the blob notification function.
pub const FUNCTION_NAME: &str = "BlobTrigger";

/// Record exactly one line naming the blob and its size.
pub fn handle(blob: &BlobDescriptor, log: &dyn InvocationLog) {
    log.record(&format!(
        "Blob trigger processed blob \"{name}\"\nName: {name}\nSize: {length} bytes",
        name = blob.name,
        length = blob.length
    ));
}

/// [`handle`] bound as a blob trigger.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlobNotifyFunction;

#[async_trait]
impl BlobFunction for BlobNotifyFunction {
    async fn process(
        &self,
        blob: &BlobDescriptor,
        _ctx: &FunctionContext,
        log: &dyn InvocationLog,
    ) -> Result<(), FunctionError> {
        handle(blob, log);
        Ok(())
    }

    fn name(&self) -> &str {
        FUNCTION_NAME
    }
}

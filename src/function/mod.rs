//! Function traits and the registry the host dispatches through.

pub mod handler;
pub mod registry;

pub use handler::{BlobFunction, FunctionContext, FunctionError, HttpFunction};
pub use registry::{FunctionRegistry, TriggerKind};

//! The trigger functions shipped by this crate.
//!
//! Each handler is a plain function over the request or blob description,
//! plus a thin wrapper implementing the matching trigger trait.

pub mod blob_notify;
pub mod greeting;

pub use blob_notify::BlobNotifyFunction;
pub use greeting::GreetingFunction;

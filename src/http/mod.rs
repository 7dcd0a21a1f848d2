//! Plain HTTP request/response shapes shared by the host and the functions.

mod request;
mod response;

pub use request::{HttpRequest, Method};
pub use response::{HttpResponse, StatusCode};

//! HTTP middleware shared by svckit services
//!
//! Every middleware here is a plain async function meant for
//! [`axum::middleware::from_fn`] (or `from_fn_with_state` for
//! [`security_headers`]).

pub mod error_responder;
pub mod request_logger;
pub mod security;

pub use error_responder::error_responder;
pub use request_logger::request_logger;
pub use security::{security_headers, SecurityHeadersConfig};

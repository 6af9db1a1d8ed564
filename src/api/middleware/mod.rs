//! HTTP middleware for request processing.
//!
//! - [`owner`] - Anonymous owner cookie
//! - [`tracing`] - Request/response logging

pub mod owner;
pub mod tracing;

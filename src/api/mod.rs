//! HTTP API layer.
//!
//! Translates HTTP requests into shortener operations and maps outcomes onto
//! status codes. No business rules live here.
//!
//! - [`dto`] - Request/response types
//! - [`handlers`] - Request handlers
//! - [`middleware`] - Owner cookie and tracing
//! - [`routes`] - Route composition

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;

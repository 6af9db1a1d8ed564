//! Application layer services implementing business logic.
//!
//! Services consume repository traits and expose a small API to HTTP handlers
//! and the admin CLI.
//!
//! - [`services::shortener_service::ShortenerService`] - Short link creation and resolution

pub mod services;

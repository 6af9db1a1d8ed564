//! Utility functions for code generation, URL validation, and error mapping.
//!
//! - [`code_generator`] - Short code generation
//! - [`url_validator`] - Absolute http(s) URL validation
//! - [`db_error`] - Database error classification
//! - [`owner_token`] - Anonymous owner token generation

pub mod code_generator;
pub mod db_error;
pub mod owner_token;
pub mod url_validator;

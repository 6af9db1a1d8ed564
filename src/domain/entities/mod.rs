//! Core domain entities.
//!
//! Entities are plain data structures without business logic. Creation input
//! is a separate type ([`NewUrlRecord`]) so that storage-assigned fields never
//! appear before a record exists.

pub mod url_record;

pub use url_record::{NewUrlRecord, UrlRecord};

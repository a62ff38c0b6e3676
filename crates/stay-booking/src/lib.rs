//! Availability and reservation core for a single-unit stay booking service.
//!
//! The [`booking`] module holds the domain: pure availability computation, stay validation
//! rules, and the serialized reservation path that keeps two guests from claiming the same
//! night. Configuration, telemetry, and application errors support the service shell.

pub mod booking;
pub mod config;
pub mod error;
pub mod telemetry;

//! # fieldcheck-api
//!
//! API request DTOs and the wire format of validation failures.
//! This crate depends only on `shared` and the derive macro.

/// API v1 DTOs.
pub mod v1;

/// Returns the api crate version.
#[must_use]
pub const fn api_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

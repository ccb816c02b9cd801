//! # fieldcheck-shared
//!
//! Constraint declarations and the validation engine for the fieldcheck
//! workspace.
//!
//! The crate provides:
//!
//! - The `NullableNotBlank` constraint ("absent, or present and not blank")
//! - A schema registry holding ordered declarations per field
//! - The `Validator` engine, message templates, and validation groups
//! - The shared error envelope and structured logging port
//!
//! ## Design Principles
//!
//! 1. **No workspace dependencies** - This crate only depends on external crates
//! 2. **Pure evaluation** - Constraints hold no state between evaluations
//! 3. **Serde-compatible** - Violations and errors serialize for API layers

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod constraint;
pub mod engine;
pub mod errors;
pub mod groups;
pub mod logger;
pub mod message;
pub mod schema;
pub mod validation;

pub use constraint::{
    DEFAULT_NOT_BLANK_TEMPLATE, NOT_BLANK_MESSAGE, NOT_BLANK_MESSAGE_KEY, NOT_BLANK_PATTERN,
    NULLABLE_NOT_BLANK, NullableNotBlank, is_blank, is_nullable_not_blank,
};
pub use engine::{SchemaError, TemplateIssue, Validator};
pub use errors::{ErrorCode, ErrorEnvelope, ErrorKind, ErrorMetadata};
pub use groups::{ActiveGroups, Group, Payload};
pub use logger::{LogEvent, LogFields, LogLevel, LoggerPort, NoopLogger, log_fields};
pub use message::{FIELD_PLACEHOLDER, MessageCatalog, MessageTemplate, Segment, TemplateError};
pub use schema::{FieldConstraints, Schema, SchemaBuilder};
pub use validation::{FieldSource, Validate, Validated, Violation, Violations};

/// Returns the shared crate version.
#[must_use]
pub const fn shared_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

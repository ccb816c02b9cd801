//! API v1 DTO types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Error kind exposed in API v1 responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiV1ErrorKind {
    /// Expected, user-facing errors (validation, config).
    Expected,
    /// Server-side failures the caller cannot fix.
    Unexpected,
}

/// API v1 error code string (stable contract value).
pub type ApiV1ErrorCode = String;

/// Metadata map attached to API v1 errors.
pub type ApiV1ErrorMeta = BTreeMap<String, String>;

/// API v1 error payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiV1ErrorDto {
    /// Stable error code (e.g. `ERR_CORE_INVALID_INPUT`).
    pub code: ApiV1ErrorCode,
    /// Human-readable message for the caller.
    pub message: String,
    /// Error category.
    pub kind: ApiV1ErrorKind,
    /// Optional metadata for debugging and correlation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ApiV1ErrorMeta>,
}

/// API v1 result wrapper for success or failure payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiV1Result<T> {
    /// Success response.
    Ok {
        /// Indicates success.
        ok: bool,
        /// Success payload.
        data: T,
    },
    /// Error response.
    Err {
        /// Indicates failure.
        ok: bool,
        /// Error payload.
        error: ApiV1ErrorDto,
    },
}

impl<T> ApiV1Result<T> {
    /// Build a success response wrapper.
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self::Ok { ok: true, data }
    }

    /// Build an error response wrapper.
    #[must_use]
    pub const fn err(error: ApiV1ErrorDto) -> Self {
        Self::Err { ok: false, error }
    }
}

/// HTTP status used for validation failures.
pub const API_V1_VALIDATION_STATUS: u16 = 400;
/// Reason phrase used for validation failures.
pub const API_V1_VALIDATION_ERROR: &str = "Bad Request";

/// One rejected field in a validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ApiV1FieldErrorDto {
    /// Field name as it appears on the wire (snake_case).
    pub field: String,
    /// Resolved violation message.
    pub message: String,
}

/// Validation failure response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ApiV1ValidationFailureDto {
    /// HTTP status code (always 400).
    pub status: u16,
    /// Reason phrase.
    pub error: String,
    /// Request path the failure belongs to.
    pub path: String,
    /// Rejected fields in evaluation order.
    pub errors: Vec<ApiV1FieldErrorDto>,
}

/// Update request for a table.
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    JsonSchema,
    fieldcheck_validate_derive::Validate,
)]
pub struct ApiV1UpdateTableRequestDto {
    /// New label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nullable_not_blank)]
    pub label: Option<String>,
}

/// Update request for a comparison.
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    JsonSchema,
    fieldcheck_validate_derive::Validate,
)]
pub struct ApiV1UpdateComparisonRequestDto {
    /// New title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nullable_not_blank)]
    pub title: Option<String>,
    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nullable_not_blank)]
    pub description: Option<String>,
    /// Research field ids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub research_fields: Option<Vec<String>>,
}

/// Update request for a smart review.
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    JsonSchema,
    fieldcheck_validate_derive::Validate,
)]
pub struct ApiV1UpdateSmartReviewRequestDto {
    /// New title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nullable_not_blank)]
    pub title: Option<String>,
    /// Research field ids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub research_fields: Option<Vec<String>>,
}

/// Update request for a literature list.
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    JsonSchema,
    fieldcheck_validate_derive::Validate,
)]
pub struct ApiV1UpdateLiteratureListRequestDto {
    /// New title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nullable_not_blank)]
    pub title: Option<String>,
    /// Research field ids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub research_fields: Option<Vec<String>>,
}

/// Publish request for a versioned content type.
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    JsonSchema,
    fieldcheck_validate_derive::Validate,
)]
pub struct ApiV1PublishRequestDto {
    /// Changelog entry for the published version.
    #[validate(nullable_not_blank)]
    pub changelog: String,
    /// Whether a DOI should be registered.
    pub assign_doi: bool,
    /// Optional description of the published version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nullable_not_blank)]
    pub description: Option<String>,
}

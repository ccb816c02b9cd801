//! API v1 request validation.
//!
//! Every helper returns the request wrapped in [`Validated`] on success, or
//! the validation failure body for the request path.

use crate::v1::{
    ApiV1PublishRequestDto, ApiV1UpdateComparisonRequestDto, ApiV1UpdateLiteratureListRequestDto,
    ApiV1UpdateSmartReviewRequestDto, ApiV1UpdateTableRequestDto, ApiV1ValidationFailureDto,
    violations_to_api_v1_failure,
};
use fieldcheck_shared::{ActiveGroups, Validate, Validated, Validator};

/// Validate `dto` in the `Default` group with the default messages.
pub fn validate_request<T: Validate>(
    dto: T,
    path: &str,
) -> Result<Validated<T>, ApiV1ValidationFailureDto> {
    Validated::try_new(dto).map_err(|violations| violations_to_api_v1_failure(&violations, path))
}

/// Validate `dto` with a configured validator and group selection.
pub fn validate_request_with<T: Validate>(
    dto: T,
    path: &str,
    validator: &Validator,
    groups: &ActiveGroups,
) -> Result<Validated<T>, ApiV1ValidationFailureDto> {
    Validated::try_new_with(dto, validator, groups)
        .map_err(|violations| violations_to_api_v1_failure(&violations, path))
}

/// Validate a table update request.
pub fn validate_update_table_request(
    dto: ApiV1UpdateTableRequestDto,
    path: &str,
) -> Result<Validated<ApiV1UpdateTableRequestDto>, ApiV1ValidationFailureDto> {
    validate_request(dto, path)
}

/// Validate a comparison update request.
pub fn validate_update_comparison_request(
    dto: ApiV1UpdateComparisonRequestDto,
    path: &str,
) -> Result<Validated<ApiV1UpdateComparisonRequestDto>, ApiV1ValidationFailureDto> {
    validate_request(dto, path)
}

/// Validate a smart review update request.
pub fn validate_update_smart_review_request(
    dto: ApiV1UpdateSmartReviewRequestDto,
    path: &str,
) -> Result<Validated<ApiV1UpdateSmartReviewRequestDto>, ApiV1ValidationFailureDto> {
    validate_request(dto, path)
}

/// Validate a literature list update request.
pub fn validate_update_literature_list_request(
    dto: ApiV1UpdateLiteratureListRequestDto,
    path: &str,
) -> Result<Validated<ApiV1UpdateLiteratureListRequestDto>, ApiV1ValidationFailureDto> {
    validate_request(dto, path)
}

/// Validate a publish request.
pub fn validate_publish_request(
    dto: ApiV1PublishRequestDto,
    path: &str,
) -> Result<Validated<ApiV1PublishRequestDto>, ApiV1ValidationFailureDto> {
    validate_request(dto, path)
}

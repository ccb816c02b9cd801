//! JSON Schema exports for API v1 request DTOs.

use crate::v1::{
    ApiV1PublishRequestDto, ApiV1UpdateComparisonRequestDto, ApiV1UpdateLiteratureListRequestDto,
    ApiV1UpdateSmartReviewRequestDto, ApiV1UpdateTableRequestDto,
};
use schemars::{Schema, schema_for};

/// JSON Schema for `ApiV1UpdateTableRequestDto`.
#[must_use]
pub fn api_v1_update_table_request_schema() -> Schema {
    schema_for!(ApiV1UpdateTableRequestDto)
}

/// JSON Schema for `ApiV1UpdateComparisonRequestDto`.
#[must_use]
pub fn api_v1_update_comparison_request_schema() -> Schema {
    schema_for!(ApiV1UpdateComparisonRequestDto)
}

/// JSON Schema for `ApiV1UpdateSmartReviewRequestDto`.
#[must_use]
pub fn api_v1_update_smart_review_request_schema() -> Schema {
    schema_for!(ApiV1UpdateSmartReviewRequestDto)
}

/// JSON Schema for `ApiV1UpdateLiteratureListRequestDto`.
#[must_use]
pub fn api_v1_update_literature_list_request_schema() -> Schema {
    schema_for!(ApiV1UpdateLiteratureListRequestDto)
}

/// JSON Schema for `ApiV1PublishRequestDto`.
#[must_use]
pub fn api_v1_publish_request_schema() -> Schema {
    schema_for!(ApiV1PublishRequestDto)
}

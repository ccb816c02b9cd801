//! API v1 DTOs and helpers.

mod mappers;
mod schema;
mod types;
mod validation;

pub use mappers::{
    error_code_to_api_v1, error_envelope_to_api_v1_error, result_to_api_v1_result,
    to_snake_case, violations_to_api_v1_failure,
};
pub use schema::{
    api_v1_publish_request_schema, api_v1_update_comparison_request_schema,
    api_v1_update_literature_list_request_schema, api_v1_update_smart_review_request_schema,
    api_v1_update_table_request_schema,
};
pub use types::*;
pub use validation::{
    validate_publish_request, validate_request, validate_request_with,
    validate_update_comparison_request, validate_update_literature_list_request,
    validate_update_smart_review_request, validate_update_table_request,
};

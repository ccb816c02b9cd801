//! API v1 DTO mapping helpers.

use crate::v1::{
    API_V1_VALIDATION_ERROR, API_V1_VALIDATION_STATUS, ApiV1ErrorCode, ApiV1ErrorDto,
    ApiV1ErrorKind, ApiV1ErrorMeta, ApiV1FieldErrorDto, ApiV1Result, ApiV1ValidationFailureDto,
};
use fieldcheck_shared::{ErrorCode, ErrorEnvelope, ErrorKind, Violations};

/// Convert a shared `ErrorCode` into an API v1 error code string.
#[must_use]
pub fn error_code_to_api_v1(code: &ErrorCode) -> ApiV1ErrorCode {
    let namespace = sanitize_code_segment(code.namespace());
    let detail = sanitize_code_segment(code.code());
    format!("ERR_{namespace}_{detail}")
}

/// Map an `ErrorEnvelope` into an API v1 error DTO.
#[must_use]
pub fn error_envelope_to_api_v1_error(
    envelope: &ErrorEnvelope,
    extra_meta: Option<ApiV1ErrorMeta>,
) -> ApiV1ErrorDto {
    let mut merged = envelope.metadata.clone();
    if let Some(extra) = extra_meta {
        merged.extend(extra);
    }
    let meta = if merged.is_empty() { None } else { Some(merged) };

    ApiV1ErrorDto {
        code: error_code_to_api_v1(&envelope.code),
        message: envelope.message.clone(),
        kind: map_error_kind(envelope.kind),
        meta,
    }
}

/// Map a shared result into an API v1 result wrapper.
#[must_use]
pub fn result_to_api_v1_result<T>(
    result: Result<T, ErrorEnvelope>,
    extra_meta: Option<ApiV1ErrorMeta>,
) -> ApiV1Result<T> {
    match result {
        Ok(data) => ApiV1Result::ok(data),
        Err(error) => ApiV1Result::err(error_envelope_to_api_v1_error(&error, extra_meta)),
    }
}

/// Map collected violations into the validation failure body for `path`.
///
/// Field names are reported in snake_case; entries keep evaluation order.
#[must_use]
pub fn violations_to_api_v1_failure(
    violations: &Violations,
    path: &str,
) -> ApiV1ValidationFailureDto {
    ApiV1ValidationFailureDto {
        status: API_V1_VALIDATION_STATUS,
        error: API_V1_VALIDATION_ERROR.to_string(),
        path: path.to_string(),
        errors: violations
            .iter()
            .map(|violation| ApiV1FieldErrorDto {
                field: to_snake_case(&violation.field),
                message: violation.message.clone(),
            })
            .collect(),
    }
}

/// Convert a camelCase or PascalCase name to snake_case.
///
/// Names that are already snake_case come back unchanged.
#[must_use]
pub fn to_snake_case(name: &str) -> String {
    let mut output = String::with_capacity(name.len() + 4);
    let mut previous: Option<char> = None;
    let mut chars = name.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch.is_uppercase() {
            let after_lower = previous.is_some_and(|prev| prev.is_lowercase() || prev.is_ascii_digit());
            let acronym_end = previous.is_some_and(char::is_uppercase)
                && chars.peek().is_some_and(|next| next.is_lowercase());
            if (after_lower || acronym_end) && !output.ends_with('_') {
                output.push('_');
            }
            output.extend(ch.to_lowercase());
        } else {
            output.push(ch);
        }
        previous = Some(ch);
    }
    output
}

const fn map_error_kind(kind: ErrorKind) -> ApiV1ErrorKind {
    match kind {
        ErrorKind::Expected => ApiV1ErrorKind::Expected,
        ErrorKind::Unexpected => ApiV1ErrorKind::Unexpected,
    }
}

fn sanitize_code_segment(segment: &str) -> String {
    segment
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() {
                ch.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldcheck_shared::Violation;
    use std::collections::BTreeMap;

    fn violation(field: &str, message: &str) -> Violation {
        Violation {
            field: field.to_string(),
            constraint: "NullableNotBlank".to_string(),
            message_template: "{fieldcheck.constraints.NullableNotBlank.message}".to_string(),
            message: message.to_string(),
            payload: Vec::new(),
        }
    }

    #[test]
    fn snake_case_conversion() {
        assert_eq!(to_snake_case("title"), "title");
        assert_eq!(to_snake_case("assign_doi"), "assign_doi");
        assert_eq!(to_snake_case("researchFields"), "research_fields");
        assert_eq!(to_snake_case("assignDOI"), "assign_doi");
        assert_eq!(to_snake_case("DOIValue"), "doi_value");
        assert_eq!(to_snake_case("field2Name"), "field2_name");
    }

    #[test]
    fn failure_lists_fields_in_order() {
        let violations: Violations = [
            violation("title", "must not be blank"),
            violation("extractionMethod", "must not be blank"),
        ]
        .into_iter()
        .collect();

        let failure = violations_to_api_v1_failure(&violations, "/api/comparisons/R1");
        assert_eq!(failure.status, 400);
        assert_eq!(failure.error, "Bad Request");
        assert_eq!(failure.path, "/api/comparisons/R1");
        let fields: Vec<&str> = failure.errors.iter().map(|error| error.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "extraction_method"]);
    }

    #[test]
    fn violations_map_to_invalid_input_code() {
        let violations: Violations = [violation("label", "must not be blank")].into_iter().collect();
        let dto = error_envelope_to_api_v1_error(&ErrorEnvelope::from(violations), None);
        assert_eq!(dto.code, "ERR_CORE_INVALID_INPUT");
        assert_eq!(dto.kind, ApiV1ErrorKind::Expected);
        assert_eq!(
            dto.meta
                .as_ref()
                .and_then(|meta| meta.get("field.label"))
                .map(String::as_str),
            Some("must not be blank")
        );
    }

    #[test]
    fn unexpected_errors_keep_their_kind() {
        let envelope = ErrorEnvelope::unexpected(ErrorCode::internal(), "encoder failed");
        let dto = error_envelope_to_api_v1_error(&envelope, None);
        assert_eq!(dto.code, "ERR_CORE_INTERNAL");
        assert_eq!(dto.kind, ApiV1ErrorKind::Unexpected);
        assert!(dto.meta.is_none());
    }

    #[test]
    fn result_mapping_preserves_ok_and_err() {
        let ok_result: Result<u32, ErrorEnvelope> = Ok(10);
        let mapped = result_to_api_v1_result(ok_result, None);
        assert!(matches!(mapped, ApiV1Result::Ok { ok: true, .. }));

        let mut extra = BTreeMap::new();
        extra.insert("requestId".to_string(), "abc".to_string());
        let err_result: Result<u32, ErrorEnvelope> = Err(ErrorEnvelope::expected(
            ErrorCode::invalid_input(),
            "bad input",
        ));
        let mapped = result_to_api_v1_result(err_result, Some(extra));
        assert!(matches!(
            mapped,
            ApiV1Result::Err { ok: false, ref error } if error.meta.is_some()
        ));
    }
}

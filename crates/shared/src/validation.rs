//! Validation traits, violations, and the validated-value proof wrapper.

use crate::engine::Validator;
use crate::errors::{ErrorCode, ErrorEnvelope};
use crate::groups::ActiveGroups;
use crate::schema::Schema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Read access to the text fields a schema names.
pub trait FieldSource {
    /// Text of `field`, or `None` when absent (or not a known field).
    fn text(&self, field: &str) -> Option<&str>;
}

/// A type with a static constraint schema.
///
/// Usually implemented with `#[derive(Validate)]`.
pub trait Validate: FieldSource {
    /// Constraint declarations for this type.
    fn schema() -> &'static Schema
    where
        Self: Sized;

    /// Validate with an explicit validator and group selection.
    fn validate_with(&self, validator: &Validator, groups: &ActiveGroups) -> Result<(), Violations>
    where
        Self: Sized,
    {
        validator.validate(Self::schema(), self, groups)
    }

    /// Validate in the `Default` group with the default message catalog.
    fn validate(&self) -> Result<(), Violations>
    where
        Self: Sized,
    {
        self.validate_with(Validator::shared(), &ActiveGroups::default())
    }

    /// Validate in the given groups with the default message catalog.
    fn validate_groups(&self, groups: &ActiveGroups) -> Result<(), Violations>
    where
        Self: Sized,
    {
        self.validate_with(Validator::shared(), groups)
    }
}

/// One failed constraint on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    /// Reported field name.
    pub field: String,
    /// Constraint name (e.g. `NullableNotBlank`).
    pub constraint: String,
    /// Unresolved message template.
    pub message_template: String,
    /// Resolved message.
    pub message: String,
    /// Payload tags of the failing declaration.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub payload: Vec<String>,
}

impl fmt::Display for Violation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}: {}", self.field, self.message)
    }
}

/// Violations collected during one validation pass, in evaluation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Violations(Vec<Violation>);

impl Violations {
    /// Empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Record a violation.
    pub fn push(&mut self, violation: Violation) {
        self.0.push(violation);
    }

    /// Whether nothing failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate in evaluation order.
    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    /// Violations reported for `field`.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a Violation> {
        self.0.iter().filter(move |violation| violation.field == field)
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Violation> for Violations {
    fn from_iter<I: IntoIterator<Item = Violation>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, violation) in self.0.iter().enumerate() {
            if index > 0 {
                formatter.write_str("; ")?;
            }
            write!(formatter, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Violations {}

impl From<Violations> for ErrorEnvelope {
    fn from(violations: Violations) -> Self {
        let mut envelope = Self::expected(
            ErrorCode::invalid_input(),
            format!("validation failed: {violations}"),
        )
        .with_metadata("violations", violations.len().to_string());
        for violation in &violations {
            let key = format!("field.{}", violation.field);
            let message = match envelope.metadata.get(&key) {
                Some(existing) => format!("{existing}; {}", violation.message),
                None => violation.message.clone(),
            };
            envelope.metadata.insert(key, message);
        }
        envelope
    }
}

/// Proof wrapper indicating a value passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validated<T>(T);

impl<T: Validate> Validated<T> {
    /// Validate `value` in the `Default` group and wrap it on success.
    pub fn try_new(value: T) -> Result<Self, Violations> {
        value.validate()?;
        Ok(Self(value))
    }

    /// Validate `value` with an explicit validator and groups.
    pub fn try_new_with(
        value: T,
        validator: &Validator,
        groups: &ActiveGroups,
    ) -> Result<Self, Violations> {
        value.validate_with(validator, groups)?;
        Ok(Self(value))
    }
}

impl<T> Validated<T> {
    /// Consume and return the inner value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Validated<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn violation(field: &str, message: &str) -> Violation {
        Violation {
            field: field.to_string(),
            constraint: "NullableNotBlank".to_string(),
            message_template: message.to_string(),
            message: message.to_string(),
            payload: Vec::new(),
        }
    }

    #[test]
    fn empty_violations_are_ok() {
        assert_eq!(Violations::new().into_result(), Ok(()));
    }

    #[test]
    fn display_joins_violations() {
        let violations: Violations = [
            violation("title", "must not be blank"),
            violation("description", "must have content"),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            violations.to_string(),
            "title: must not be blank; description: must have content"
        );
        assert_eq!(violations.for_field("title").count(), 1);
    }

    #[test]
    fn violations_map_into_invalid_input_envelope() {
        let violations: Violations = [
            violation("title", "must not be blank"),
            violation("title", "title needs text"),
        ]
        .into_iter()
        .collect();
        let envelope: ErrorEnvelope = violations.into();
        assert_eq!(envelope.code, ErrorCode::invalid_input());
        assert_eq!(
            envelope.metadata.get("violations").map(String::as_str),
            Some("2")
        );
        assert_eq!(
            envelope.metadata.get("field.title").map(String::as_str),
            Some("must not be blank; title needs text")
        );
    }

    #[test]
    fn violation_serializes_camel_case() -> Result<(), serde_json::Error> {
        let value = serde_json::to_value(violation("label", "must not be blank"))?;
        assert_eq!(value["messageTemplate"], "must not be blank");
        assert!(value.get("payload").is_none());
        Ok(())
    }
}

//! The `NullableNotBlank` constraint.
//!
//! Accepts a value that is absent, or present with at least one
//! non-whitespace character. Absence is left to a separate "required" rule.

use crate::groups::{ActiveGroups, Group, Payload};
use crate::message::MessageTemplate;
use serde::Serialize;
use std::collections::BTreeSet;

/// Stable constraint name reported on violations.
pub const NULLABLE_NOT_BLANK: &str = "NullableNotBlank";

/// Message key of the default violation message.
pub const NOT_BLANK_MESSAGE_KEY: &str = "fieldcheck.constraints.NullableNotBlank.message";

/// Default message template of a declaration (a catalog lookup).
pub const DEFAULT_NOT_BLANK_TEMPLATE: &str = "{fieldcheck.constraints.NullableNotBlank.message}";

/// Text registered under [`NOT_BLANK_MESSAGE_KEY`] in the default catalog.
pub const NOT_BLANK_MESSAGE: &str = "must not be blank";

/// Full-match pattern describing a present, non-blank value.
///
/// Equivalent to `!is_blank(value)` for every string; the predicate uses the
/// trim form.
pub const NOT_BLANK_PATTERN: &str = r"(?s)\A\s*\S.*\z";

/// Returns true when `value` is empty or whitespace only.
#[must_use]
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// The "nullable, but not blank" predicate.
#[must_use]
pub fn is_nullable_not_blank(value: Option<&str>) -> bool {
    value.is_none_or(|text| !is_blank(text))
}

/// A `NullableNotBlank` declaration attached to one target field.
///
/// Declarations are built once and never mutated afterwards; the builder
/// methods consume `self`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NullableNotBlank {
    message: MessageTemplate,
    groups: BTreeSet<Group>,
    payload: BTreeSet<Payload>,
}

impl NullableNotBlank {
    /// Declaration with the default message, no explicit groups, no payload.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            message: MessageTemplate::from_static(DEFAULT_NOT_BLANK_TEMPLATE),
            groups: BTreeSet::new(),
            payload: BTreeSet::new(),
        }
    }

    /// Replace the message template.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<MessageTemplate>) -> Self {
        self.message = message.into();
        self
    }

    /// Restrict the declaration to the given groups.
    #[must_use]
    pub fn in_groups<I>(mut self, groups: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Group>,
    {
        self.groups.extend(groups.into_iter().map(Into::into));
        self
    }

    /// Attach payload tags.
    #[must_use]
    pub fn with_payload<I>(mut self, payload: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Payload>,
    {
        self.payload.extend(payload.into_iter().map(Into::into));
        self
    }

    /// Configured message template.
    #[must_use]
    pub const fn message(&self) -> &MessageTemplate {
        &self.message
    }

    /// Explicit groups (empty means the `Default` group).
    #[must_use]
    pub const fn groups(&self) -> &BTreeSet<Group> {
        &self.groups
    }

    /// Payload tags.
    #[must_use]
    pub const fn payload(&self) -> &BTreeSet<Payload> {
        &self.payload
    }

    /// Whether the declaration takes part in a pass with `active` groups.
    #[must_use]
    pub fn is_active(&self, active: &ActiveGroups) -> bool {
        if self.groups.is_empty() {
            active.contains(&Group::DEFAULT)
        } else {
            active.intersects(&self.groups)
        }
    }

    /// Evaluate the predicate.
    #[must_use]
    pub fn is_valid(&self, value: Option<&str>) -> bool {
        is_nullable_not_blank(value)
    }
}

impl Default for NullableNotBlank {
    fn default() -> Self {
        Self::new()
    }
}

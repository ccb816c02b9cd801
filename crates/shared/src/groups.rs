//! Validation groups and payload tags.
//!
//! Both are opaque to the constraint itself. Groups decide whether a
//! declaration takes part in a validation pass; payload tags are copied onto
//! the violations a declaration produces.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;

/// Validation group identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Group(Cow<'static, str>);

impl Group {
    /// Group applied to declarations that name no group.
    pub const DEFAULT: Self = Self(Cow::Borrowed("Default"));

    /// Create a group identifier.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Group name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for Group {
    fn from(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }
}

impl From<String> for Group {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

impl fmt::Display for Group {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Opaque metadata tag carried by a declaration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Cow<'static, str>);

impl Payload {
    /// Tag text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for Payload {
    fn from(tag: &'static str) -> Self {
        Self(Cow::Borrowed(tag))
    }
}

impl From<String> for Payload {
    fn from(tag: String) -> Self {
        Self(Cow::Owned(tag))
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Groups enabled for one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActiveGroups(BTreeSet<Group>);

impl ActiveGroups {
    /// Enable exactly the given groups.
    pub fn of<I>(groups: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Group>,
    {
        Self(groups.into_iter().map(Into::into).collect())
    }

    /// Whether `group` is enabled.
    #[must_use]
    pub fn contains(&self, group: &Group) -> bool {
        self.0.contains(group)
    }

    /// Whether any of `groups` is enabled.
    pub fn intersects<'a, I>(&self, groups: I) -> bool
    where
        I: IntoIterator<Item = &'a Group>,
    {
        groups.into_iter().any(|group| self.contains(group))
    }

    /// Enabled groups in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        self.0.iter()
    }

    /// Whether no group is enabled (nothing will be evaluated).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ActiveGroups {
    fn default() -> Self {
        Self::of([Group::DEFAULT])
    }
}

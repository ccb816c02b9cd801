//! Constraint registry keyed by target field.
//!
//! Each field holds an ordered list of declarations. Repeating a declaration
//! on one field is just another entry in that list.

use crate::constraint::NullableNotBlank;
use std::borrow::Cow;

/// Declarations attached to one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldConstraints {
    field: Cow<'static, str>,
    declarations: Vec<NullableNotBlank>,
}

impl FieldConstraints {
    /// Reported field name.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Declarations in the order they were attached.
    #[must_use]
    pub fn declarations(&self) -> &[NullableNotBlank] {
        &self.declarations
    }
}

/// Immutable set of field declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<FieldConstraints>,
}

impl Schema {
    /// Start building a schema.
    #[must_use]
    pub const fn builder() -> SchemaBuilder {
        SchemaBuilder { fields: Vec::new() }
    }

    /// Fields in first-declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldConstraints] {
        &self.fields
    }

    /// Declarations for one field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldConstraints> {
        self.fields.iter().find(|entry| entry.field == name)
    }

    /// Total number of declarations across fields.
    #[must_use]
    pub fn declaration_count(&self) -> usize {
        self.fields
            .iter()
            .map(|entry| entry.declarations.len())
            .sum()
    }

    /// Whether no declaration is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Builder for [`Schema`].
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    fields: Vec<FieldConstraints>,
}

impl SchemaBuilder {
    /// Attach `declaration` to `field` (appended after earlier ones).
    #[must_use]
    pub fn field(mut self, field: impl Into<Cow<'static, str>>, declaration: NullableNotBlank) -> Self {
        let field = field.into();
        match self.fields.iter_mut().find(|entry| entry.field == field) {
            Some(entry) => entry.declarations.push(declaration),
            None => self.fields.push(FieldConstraints {
                field,
                declarations: vec![declaration],
            }),
        }
        self
    }

    /// Finish the schema.
    #[must_use]
    pub fn build(self) -> Schema {
        Schema {
            fields: self.fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_declarations_share_one_entry() {
        let schema = Schema::builder()
            .field("title", NullableNotBlank::new())
            .field("description", NullableNotBlank::new())
            .field("title", NullableNotBlank::new().in_groups(["publish"]))
            .build();

        let names: Vec<&str> = schema.fields().iter().map(FieldConstraints::field).collect();
        assert_eq!(names, vec!["title", "description"]);
        assert_eq!(schema.declaration_count(), 3);

        let title = schema.field("title");
        assert_eq!(title.map(|entry| entry.declarations().len()), Some(2));
        assert!(
            title
                .and_then(|entry| entry.declarations().get(1))
                .is_some_and(|declaration| !declaration.groups().is_empty())
        );
    }

    #[test]
    fn empty_schema() {
        let schema = Schema::builder().build();
        assert!(schema.is_empty());
        assert!(schema.field("title").is_none());
    }
}

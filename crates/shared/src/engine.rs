//! Validation engine: evaluates schema declarations against a field source.
//!
//! The engine:
//! - evaluates every active declaration, never stopping at the first failure
//! - resolves messages through its [`MessageCatalog`]
//! - reports malformed templates at startup via [`Validator::check_schema`]

use crate::constraint::{NULLABLE_NOT_BLANK, NullableNotBlank};
use crate::errors::{ErrorCode, ErrorEnvelope};
use crate::groups::ActiveGroups;
use crate::logger::{LoggerPort, NoopLogger, log_fields};
use crate::message::{MessageCatalog, TemplateError};
use crate::schema::Schema;
use crate::validation::{FieldSource, Violation, Violations};
use std::fmt;
use std::sync::{Arc, LazyLock};

static SHARED_VALIDATOR: LazyLock<Validator> = LazyLock::new(Validator::default);

/// Evaluates constraint schemas.
#[derive(Clone)]
pub struct Validator {
    catalog: MessageCatalog,
    logger: Arc<dyn LoggerPort>,
}

impl Validator {
    /// Validator resolving messages through `catalog`.
    #[must_use]
    pub fn new(catalog: MessageCatalog) -> Self {
        Self {
            catalog,
            logger: Arc::new(NoopLogger),
        }
    }

    /// Process-wide validator with the default catalog and no logging.
    #[must_use]
    pub fn shared() -> &'static Self {
        &SHARED_VALIDATOR
    }

    /// Attach a structured logger.
    #[must_use]
    pub fn with_logger(mut self, logger: Arc<dyn LoggerPort>) -> Self {
        self.logger = logger;
        self
    }

    /// Message catalog in use.
    #[must_use]
    pub const fn catalog(&self) -> &MessageCatalog {
        &self.catalog
    }

    /// Check every declaration's message template.
    pub fn check_schema(&self, schema: &Schema) -> Result<(), SchemaError> {
        let mut issues = Vec::new();
        for entry in schema.fields() {
            for declaration in entry.declarations() {
                if let Err(error) = declaration.message().check() {
                    self.logger.warn(
                        "validation.template_malformed",
                        "constraint message template is malformed",
                        Some(log_fields([
                            ("field", entry.field().to_string()),
                            ("template", declaration.message().to_string()),
                            ("error", error.to_string()),
                        ])),
                    );
                    issues.push(TemplateIssue {
                        field: entry.field().to_string(),
                        template: declaration.message().to_string(),
                        error,
                    });
                }
            }
        }
        if issues.is_empty() {
            Ok(())
        } else {
            Err(SchemaError { issues })
        }
    }

    /// Evaluate one declaration against one value.
    #[must_use]
    pub fn evaluate(
        &self,
        field: &str,
        declaration: &NullableNotBlank,
        value: Option<&str>,
    ) -> Option<Violation> {
        if declaration.is_valid(value) {
            return None;
        }
        Some(Violation {
            field: field.to_string(),
            constraint: NULLABLE_NOT_BLANK.to_string(),
            message_template: declaration.message().to_string(),
            message: declaration.message().render(field, &self.catalog),
            payload: declaration
                .payload()
                .iter()
                .map(|tag| tag.as_str().to_string())
                .collect(),
        })
    }

    /// Validate `source` against `schema` for the `groups` pass.
    pub fn validate<S>(
        &self,
        schema: &Schema,
        source: &S,
        groups: &ActiveGroups,
    ) -> Result<(), Violations>
    where
        S: FieldSource + ?Sized,
    {
        let mut violations = Violations::new();
        for entry in schema.fields() {
            let value = source.text(entry.field());
            for declaration in entry.declarations() {
                if !declaration.is_active(groups) {
                    continue;
                }
                if let Some(violation) = self.evaluate(entry.field(), declaration, value) {
                    self.logger.debug(
                        "validation.violation",
                        "constraint violated",
                        Some(log_fields([
                            ("field", violation.field.clone()),
                            ("constraint", violation.constraint.clone()),
                            ("message", violation.message.clone()),
                        ])),
                    );
                    violations.push(violation);
                }
            }
        }
        violations.into_result()
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(MessageCatalog::default())
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Validator")
            .field("catalog", &self.catalog)
            .finish_non_exhaustive()
    }
}

/// A malformed template found on a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateIssue {
    /// Field the declaration is attached to.
    pub field: String,
    /// Raw template text.
    pub template: String,
    /// Parse failure.
    pub error: TemplateError,
}

/// Declaration-time misconfiguration of a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    /// Every malformed template, in schema order.
    pub issues: Vec<TemplateIssue>,
}

impl fmt::Display for SchemaError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("invalid constraint message template")?;
        for issue in &self.issues {
            write!(
                formatter,
                "; {}: {:?} ({})",
                issue.field, issue.template, issue.error
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaError {}

impl From<SchemaError> for ErrorEnvelope {
    fn from(error: SchemaError) -> Self {
        let mut envelope = Self::expected(ErrorCode::invalid_message_template(), error.to_string());
        for issue in &error.issues {
            envelope = envelope.with_metadata(format!("field.{}", issue.field), issue.template.clone());
        }
        envelope
    }
}

//! Validation config schema.
//!
//! The config selects the active validation groups, overrides message texts,
//! and sets the log level. Everything is checked once in
//! [`ValidationConfig::validate_and_normalize`]; the validated form then
//! builds a ready [`Validator`].

use fieldcheck_shared::{
    ActiveGroups, ErrorCode, ErrorEnvelope, Group, LogLevel, LoggerPort, MessageCatalog,
    MessageTemplate, TemplateError, Validator, is_blank, log_fields,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Current supported config schema version.
pub const CURRENT_CONFIG_VERSION: u32 = 1;

/// Parse a validation config from a JSON string, applying validation and normalization.
pub fn parse_validation_config_json(
    input: &str,
) -> Result<ValidatedValidationConfig, ErrorEnvelope> {
    let config: ValidationConfig = serde_json::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_json"),
            format!("invalid config JSON: {error}"),
        )
    })?;

    config.validate_and_normalize().map_err(Into::into)
}

/// Parse a validation config from a TOML string, applying validation and normalization.
pub fn parse_validation_config_toml(
    input: &str,
) -> Result<ValidatedValidationConfig, ErrorEnvelope> {
    let config: ValidationConfig = toml::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_toml"),
            format!("invalid config TOML: {error}"),
        )
    })?;

    config.validate_and_normalize().map_err(Into::into)
}

/// Validation runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ValidationConfig {
    /// Schema version.
    pub version: u32,
    /// Groups evaluated by a validation pass.
    pub active_groups: Vec<String>,
    /// Message text overrides keyed by message key.
    pub messages: BTreeMap<String, String>,
    /// Logging settings.
    pub logging: LoggingConfig,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            version: CURRENT_CONFIG_VERSION,
            active_groups: vec![Group::DEFAULT.as_str().to_owned()],
            messages: BTreeMap::new(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct LoggingConfig {
    /// Minimum level (`debug`, `info`, `warn`, `error`).
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info.as_str().to_owned(),
        }
    }
}

impl ValidationConfig {
    /// Validate the config and normalize it into its canonical form.
    ///
    /// Group names are trimmed, sorted, and deduplicated; the log level is
    /// lowercased.
    pub fn validate_and_normalize(mut self) -> Result<ValidatedValidationConfig, ConfigSchemaError> {
        if self.version != CURRENT_CONFIG_VERSION {
            return Err(ConfigSchemaError::UnsupportedVersion {
                found: self.version,
                supported: CURRENT_CONFIG_VERSION,
            });
        }

        self.active_groups = normalize_groups(self.active_groups)?;

        for (key, text) in &self.messages {
            if is_blank(key) {
                return Err(ConfigSchemaError::BlankMessageKey);
            }
            MessageTemplate::new(text.clone())
                .check()
                .map_err(|error| ConfigSchemaError::InvalidMessageTemplate {
                    key: key.clone(),
                    error,
                })?;
        }

        let level = LogLevel::parse(&self.logging.level).ok_or_else(|| {
            ConfigSchemaError::InvalidLogLevel {
                value: self.logging.level.clone(),
            }
        })?;
        self.logging.level = level.as_str().to_owned();

        Ok(ValidatedValidationConfig(self))
    }
}

fn normalize_groups(groups: Vec<String>) -> Result<Vec<String>, ConfigSchemaError> {
    let mut normalized = Vec::with_capacity(groups.len());
    for (index, group) in groups.into_iter().enumerate() {
        if is_blank(&group) {
            return Err(ConfigSchemaError::BlankGroupName { index });
        }
        normalized.push(group.trim().to_owned());
    }
    if normalized.is_empty() {
        return Err(ConfigSchemaError::NoActiveGroups);
    }
    normalized.sort_unstable();
    normalized.dedup();
    Ok(normalized)
}

/// A config that passed [`ValidationConfig::validate_and_normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedValidationConfig(ValidationConfig);

impl ValidatedValidationConfig {
    /// Groups a validation pass should evaluate.
    #[must_use]
    pub fn active_groups(&self) -> ActiveGroups {
        ActiveGroups::of(self.0.active_groups.iter().cloned())
    }

    /// Default catalog overlaid with the configured messages.
    #[must_use]
    pub fn catalog(&self) -> MessageCatalog {
        let mut catalog = MessageCatalog::default();
        catalog.extend(self.0.messages.clone());
        catalog
    }

    /// Minimum log level.
    #[must_use]
    pub fn log_level(&self) -> LogLevel {
        LogLevel::parse(&self.0.logging.level).unwrap_or(LogLevel::Info)
    }

    /// Build a validator that resolves messages through [`Self::catalog`]
    /// and logs to `logger`.
    #[must_use]
    pub fn build_validator(&self, logger: Arc<dyn LoggerPort>) -> Validator {
        logger.info(
            "config.loaded",
            "validation config loaded",
            Some(log_fields([
                (
                    "activeGroups",
                    serde_json::Value::from(self.0.active_groups.clone()),
                ),
                ("messages", serde_json::Value::from(self.0.messages.len())),
            ])),
        );
        Validator::new(self.catalog()).with_logger(logger)
    }
}

impl std::ops::Deref for ValidatedValidationConfig {
    type Target = ValidationConfig;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Config schema validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSchemaError {
    /// Unsupported config version.
    UnsupportedVersion {
        /// Version found in the input.
        found: u32,
        /// Supported version.
        supported: u32,
    },
    /// Active group list is empty.
    NoActiveGroups,
    /// Active group name is blank.
    BlankGroupName {
        /// Position in the configured list.
        index: usize,
    },
    /// Message key is blank.
    BlankMessageKey,
    /// Message text is not a well-formed template.
    InvalidMessageTemplate {
        /// Message key.
        key: String,
        /// Parse error.
        error: TemplateError,
    },
    /// Unknown log level.
    InvalidLogLevel {
        /// Configured value.
        value: String,
    },
}

impl ConfigSchemaError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::UnsupportedVersion { .. } => ErrorCode::new("config", "unsupported_version"),
            Self::NoActiveGroups | Self::BlankGroupName { .. } => {
                ErrorCode::new("config", "invalid_active_groups")
            },
            Self::BlankMessageKey => ErrorCode::new("config", "invalid_message_key"),
            Self::InvalidMessageTemplate { .. } => ErrorCode::invalid_message_template(),
            Self::InvalidLogLevel { .. } => ErrorCode::new("config", "invalid_log_level"),
        }
    }
}

impl fmt::Display for ConfigSchemaError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion { found, supported } => write!(
                formatter,
                "unsupported config version {found} (supported: {supported})"
            ),
            Self::NoActiveGroups => formatter.write_str("activeGroups must not be empty"),
            Self::BlankGroupName { index } => {
                write!(formatter, "activeGroups[{index}] must not be blank")
            },
            Self::BlankMessageKey => formatter.write_str("message keys must not be blank"),
            Self::InvalidMessageTemplate { key, error } => {
                write!(formatter, "message `{key}` is not a valid template: {error}")
            },
            Self::InvalidLogLevel { value } => {
                write!(formatter, "unsupported log level `{value}`")
            },
        }
    }
}

impl std::error::Error for ConfigSchemaError {}

impl From<ConfigSchemaError> for ErrorEnvelope {
    fn from(error: ConfigSchemaError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        let mut envelope = Self::expected(code, message);

        match error {
            ConfigSchemaError::UnsupportedVersion { found, supported } => {
                envelope = envelope
                    .with_metadata("found", found.to_string())
                    .with_metadata("supported", supported.to_string());
            },
            ConfigSchemaError::BlankGroupName { index } => {
                envelope = envelope.with_metadata("index", index.to_string());
            },
            ConfigSchemaError::InvalidMessageTemplate { key, error } => {
                envelope = envelope
                    .with_metadata("key", key)
                    .with_metadata("offset", error.offset().to_string());
            },
            ConfigSchemaError::InvalidLogLevel { value } => {
                envelope = envelope.with_metadata("value", value);
            },
            ConfigSchemaError::NoActiveGroups | ConfigSchemaError::BlankMessageKey => {},
        }

        envelope
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldcheck_shared::NOT_BLANK_MESSAGE_KEY;

    #[test]
    fn default_config_is_valid() -> Result<(), ConfigSchemaError> {
        let config = ValidationConfig::default().validate_and_normalize()?;
        assert_eq!(config.active_groups, vec!["Default".to_owned()]);
        assert_eq!(config.log_level(), LogLevel::Info);
        assert_eq!(
            config.catalog().get(NOT_BLANK_MESSAGE_KEY),
            Some("must not be blank")
        );
        Ok(())
    }

    #[test]
    fn groups_are_trimmed_sorted_and_deduped() -> Result<(), ConfigSchemaError> {
        let config = ValidationConfig {
            active_groups: vec![
                " publish ".to_owned(),
                "Default".to_owned(),
                "publish".to_owned(),
            ],
            ..ValidationConfig::default()
        }
        .validate_and_normalize()?;
        assert_eq!(
            config.active_groups,
            vec!["Default".to_owned(), "publish".to_owned()]
        );
        assert!(config.active_groups().contains(&Group::new("publish")));
        Ok(())
    }

    #[test]
    fn blank_group_is_rejected() {
        let result = ValidationConfig {
            active_groups: vec!["Default".to_owned(), "  ".to_owned()],
            ..ValidationConfig::default()
        }
        .validate_and_normalize();
        assert_eq!(
            result.err(),
            Some(ConfigSchemaError::BlankGroupName { index: 1 })
        );
    }

    #[test]
    fn empty_group_list_is_rejected() {
        let result = ValidationConfig {
            active_groups: Vec::new(),
            ..ValidationConfig::default()
        }
        .validate_and_normalize();
        assert_eq!(result.err(), Some(ConfigSchemaError::NoActiveGroups));
    }

    #[test]
    fn malformed_message_maps_to_template_code() {
        let mut messages = BTreeMap::new();
        messages.insert(NOT_BLANK_MESSAGE_KEY.to_owned(), "{field must".to_owned());
        let error = ValidationConfig {
            messages,
            ..ValidationConfig::default()
        }
        .validate_and_normalize()
        .err();
        assert!(matches!(
            error,
            Some(ConfigSchemaError::InvalidMessageTemplate { .. })
        ));

        let envelope = error.map(ErrorEnvelope::from);
        assert_eq!(
            envelope.map(|envelope| envelope.code),
            Some(ErrorCode::invalid_message_template())
        );
    }

    #[test]
    fn log_level_is_normalized() -> Result<(), ConfigSchemaError> {
        let config = ValidationConfig {
            logging: LoggingConfig {
                level: "WARNING".to_owned(),
            },
            ..ValidationConfig::default()
        }
        .validate_and_normalize()?;
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.log_level(), LogLevel::Warn);
        Ok(())
    }

    #[test]
    fn unsupported_version_carries_metadata() {
        let error = ValidationConfig {
            version: 2,
            ..ValidationConfig::default()
        }
        .validate_and_normalize()
        .err()
        .map(ErrorEnvelope::from);
        let envelope = error.as_ref();
        assert_eq!(
            envelope.map(|envelope| envelope.code.to_string()),
            Some("config:unsupported_version".to_owned())
        );
        assert_eq!(
            envelope.and_then(|envelope| envelope.metadata.get("found").cloned()),
            Some("2".to_owned())
        );
    }

    #[test]
    fn parses_toml_with_camel_case_keys() -> Result<(), ErrorEnvelope> {
        let config = parse_validation_config_toml(
            r#"
version = 1
activeGroups = ["publish", "Default"]

[messages]
"fieldcheck.constraints.NullableNotBlank.message" = "{field} needs text"

[logging]
level = "debug"
"#,
        )?;
        assert_eq!(config.log_level(), LogLevel::Debug);
        assert_eq!(
            config.catalog().get(NOT_BLANK_MESSAGE_KEY),
            Some("{field} needs text")
        );
        Ok(())
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error = parse_validation_config_json(r#"{"version":1,"groups":["x"]}"#).err();
        assert_eq!(
            error.map(|envelope| envelope.code.to_string()),
            Some("config:invalid_json".to_owned())
        );
    }
}

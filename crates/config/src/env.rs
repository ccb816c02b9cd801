//! Environment variable parsing for validation config overrides.

use crate::schema::{ValidatedValidationConfig, ValidationConfig};
use fieldcheck_shared::{ErrorCode, ErrorEnvelope, LogLevel};
use std::collections::BTreeMap;
use std::fmt;

/// Comma-separated active validation groups.
pub const ENV_ACTIVE_GROUPS: &str = "FIELDCHECK_ACTIVE_GROUPS";
/// JSON object of message key to message text overrides.
pub const ENV_MESSAGES_JSON: &str = "FIELDCHECK_MESSAGES_JSON";
/// Minimum log level.
pub const ENV_LOG_LEVEL: &str = "FIELDCHECK_LOG_LEVEL";

const MAX_CSV_ITEMS: usize = 64;

/// Parsed env overrides. `None` means the variable was not set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationEnv {
    /// Active groups, trimmed, sorted, and deduplicated.
    pub active_groups: Option<Vec<String>>,
    /// Message overrides merged over the config's messages.
    pub messages: Option<BTreeMap<String, String>>,
    /// Minimum log level.
    pub log_level: Option<LogLevel>,
}

impl ValidationEnv {
    /// Parse overrides from an explicit variable map.
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, EnvParseError> {
        Ok(Self {
            active_groups: parse_optional_csv_groups(map, ENV_ACTIVE_GROUPS)?,
            messages: parse_optional_messages_json(map, ENV_MESSAGES_JSON)?,
            log_level: parse_optional_log_level(map, ENV_LOG_LEVEL)?,
        })
    }

    /// Parse overrides from the process environment.
    pub fn from_std_env() -> Result<Self, EnvParseError> {
        let mut map = BTreeMap::new();
        for name in [ENV_ACTIVE_GROUPS, ENV_MESSAGES_JSON, ENV_LOG_LEVEL] {
            if let Ok(value) = std::env::var(name) {
                map.insert(name.to_string(), value);
            }
        }

        Self::from_map(&map)
    }
}

/// Apply env overrides to a base config (env wins over file/default values).
pub fn apply_env_overrides(
    base: ValidationConfig,
    env: &ValidationEnv,
) -> Result<ValidatedValidationConfig, ErrorEnvelope> {
    let mut config = base;
    if let Some(groups) = &env.active_groups {
        config.active_groups.clone_from(groups);
    }
    if let Some(messages) = &env.messages {
        for (key, text) in messages {
            config.messages.insert(key.clone(), text.clone());
        }
    }
    if let Some(level) = env.log_level {
        config.logging.level = level.as_str().to_owned();
    }

    config.validate_and_normalize().map_err(Into::into)
}

/// Env parsing errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvParseError {
    /// Variable is set but empty.
    EmptyValue {
        /// Variable name.
        var: &'static str,
    },
    /// Variable holds an unsupported enum value.
    InvalidEnum {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
    },
    /// Variable is not a JSON object of strings.
    InvalidJson {
        /// Variable name.
        var: &'static str,
        /// Parser message.
        reason: String,
    },
    /// CSV list has too many entries.
    CsvTooLarge {
        /// Variable name.
        var: &'static str,
        /// Entry count.
        len: usize,
        /// Allowed maximum.
        max: usize,
    },
}

impl EnvParseError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyValue { .. } => ErrorCode::new("config", "empty_env_var"),
            Self::InvalidEnum { .. } => ErrorCode::new("config", "invalid_env_enum"),
            Self::InvalidJson { .. } => ErrorCode::new("config", "invalid_env_json"),
            Self::CsvTooLarge { .. } => ErrorCode::new("config", "invalid_env_csv"),
        }
    }
}

impl fmt::Display for EnvParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyValue { var } => write!(formatter, "{var} must be non-empty"),
            Self::InvalidEnum { var, .. } => write!(formatter, "{var} has an unsupported value"),
            Self::InvalidJson { var, reason } => {
                write!(formatter, "{var} must be a JSON object of strings: {reason}")
            },
            Self::CsvTooLarge { var, len, max } => {
                write!(formatter, "{var} is too large ({len} items, max {max})")
            },
        }
    }
}

impl std::error::Error for EnvParseError {}

impl From<EnvParseError> for ErrorEnvelope {
    fn from(error: EnvParseError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        let mut envelope = Self::expected(code, message);

        match error {
            EnvParseError::EmptyValue { var } | EnvParseError::InvalidJson { var, .. } => {
                envelope = envelope.with_metadata("env_var", var);
            },
            EnvParseError::InvalidEnum { var, value } => {
                envelope = envelope
                    .with_metadata("env_var", var)
                    .with_metadata("value", value);
            },
            EnvParseError::CsvTooLarge { var, len, max } => {
                envelope = envelope
                    .with_metadata("env_var", var)
                    .with_metadata("len", len.to_string())
                    .with_metadata("max", max.to_string());
            },
        }

        envelope
    }
}

fn parse_optional_csv_groups(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<Vec<String>>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }

    let mut items = parse_csv(trimmed);
    if items.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }
    if items.len() > MAX_CSV_ITEMS {
        return Err(EnvParseError::CsvTooLarge {
            var,
            len: items.len(),
            max: MAX_CSV_ITEMS,
        });
    }

    items.sort_unstable();
    items.dedup();
    Ok(Some(items))
}

fn parse_optional_messages_json(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<BTreeMap<String, String>>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }

    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|error| EnvParseError::InvalidJson {
            var,
            reason: error.to_string(),
        })
}

fn parse_optional_log_level(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<LogLevel>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };
    if raw.trim().is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }

    LogLevel::parse(raw)
        .map(Some)
        .ok_or_else(|| EnvParseError::InvalidEnum {
            var,
            value: raw.clone(),
        })
}

fn parse_csv(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect()
    }

    #[test]
    fn unset_variables_parse_to_none() -> Result<(), EnvParseError> {
        let env = ValidationEnv::from_map(&BTreeMap::new())?;
        assert_eq!(env, ValidationEnv::default());
        Ok(())
    }

    #[test]
    fn csv_groups_are_sorted_and_deduped() -> Result<(), EnvParseError> {
        let env = ValidationEnv::from_map(&env_map(&[(
            ENV_ACTIVE_GROUPS,
            " publish, Default ,,publish ",
        )]))?;
        assert_eq!(
            env.active_groups,
            Some(vec!["Default".to_owned(), "publish".to_owned()])
        );
        Ok(())
    }

    #[test]
    fn separators_only_csv_is_empty() {
        let result = ValidationEnv::from_map(&env_map(&[(ENV_ACTIVE_GROUPS, " , ,")]));
        assert_eq!(
            result.err(),
            Some(EnvParseError::EmptyValue {
                var: ENV_ACTIVE_GROUPS
            })
        );
    }

    #[test]
    fn messages_json_must_be_string_map() {
        let result = ValidationEnv::from_map(&env_map(&[(ENV_MESSAGES_JSON, "[1, 2]")]));
        let envelope = result.err().map(ErrorEnvelope::from);
        assert_eq!(
            envelope.map(|envelope| envelope.code.to_string()),
            Some("config:invalid_env_json".to_owned())
        );
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let result = ValidationEnv::from_map(&env_map(&[(ENV_LOG_LEVEL, "verbose")]));
        assert_eq!(
            result.err(),
            Some(EnvParseError::InvalidEnum {
                var: ENV_LOG_LEVEL,
                value: "verbose".to_owned(),
            })
        );
    }

    #[test]
    fn env_wins_over_base_config() -> Result<(), Box<dyn std::error::Error>> {
        let env = ValidationEnv::from_map(&env_map(&[
            (ENV_ACTIVE_GROUPS, "publish"),
            (ENV_LOG_LEVEL, "debug"),
        ]))?;
        let config = apply_env_overrides(ValidationConfig::default(), &env)?;
        assert_eq!(config.active_groups, vec!["publish".to_owned()]);
        assert_eq!(config.log_level(), LogLevel::Debug);
        Ok(())
    }
}

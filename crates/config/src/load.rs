//! Config loading helpers (file + env).
//!
//! The loader owns the merge order and surfaces user-facing errors as typed
//! `ErrorEnvelope`s.

use crate::{ValidatedValidationConfig, ValidationConfig, ValidationEnv, apply_env_overrides};
use fieldcheck_shared::{ErrorCode, ErrorEnvelope};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Toml,
}

/// Load the validation config from in-memory JSON and env.
///
/// Precedence (highest wins):
/// - env overrides (`ValidationEnv`)
/// - config JSON
/// - defaults (`ValidationConfig::default()`)
pub fn load_validation_config_from_sources(
    config_json: Option<&str>,
    env: &ValidationEnv,
) -> Result<ValidatedValidationConfig, ErrorEnvelope> {
    let config = match config_json {
        None => ValidationConfig::default(),
        Some(input) => parse_config_unvalidated(input, ConfigFormat::Json)?,
    };

    // env goes last and also validates/normalizes the merged config.
    apply_env_overrides(config, env)
}

/// Load the validation config from an optional file path (`.json` or `.toml`).
pub fn load_validation_config_from_path(
    config_path: Option<&Path>,
    env: &ValidationEnv,
) -> Result<ValidatedValidationConfig, ErrorEnvelope> {
    let config = match config_path {
        None => ValidationConfig::default(),
        Some(path) => {
            let config_text = read_config_file(path)?;
            let format = detect_config_format(path)?;
            parse_config_unvalidated(&config_text, format)?
        },
    };

    apply_env_overrides(config, env)
}

/// Load the validation config from std env and an optional file path.
pub fn load_validation_config_std_env(
    config_path: Option<&Path>,
) -> Result<ValidatedValidationConfig, ErrorEnvelope> {
    let env = ValidationEnv::from_std_env().map_err(ErrorEnvelope::from)?;
    load_validation_config_from_path(config_path, &env)
}

/// Serialize the config as deterministic pretty JSON (with trailing newline).
pub fn to_pretty_json(config: &ValidationConfig) -> Result<String, ErrorEnvelope> {
    let mut output = serde_json::to_string_pretty(config).map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::internal(),
            format!("failed to serialize config: {error}"),
        )
    })?;
    output.push('\n');
    Ok(output)
}

/// Serialize the config as deterministic pretty TOML (with trailing newline).
pub fn to_pretty_toml(config: &ValidationConfig) -> Result<String, ErrorEnvelope> {
    let mut output = toml::to_string_pretty(config).map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::new("config", "serialize_toml"),
            format!("failed to serialize config TOML: {error}"),
        )
    })?;
    output.push('\n');
    Ok(output)
}

fn parse_config_unvalidated(
    input: &str,
    format: ConfigFormat,
) -> Result<ValidationConfig, ErrorEnvelope> {
    match format {
        ConfigFormat::Json => serde_json::from_str(input).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", "invalid_json"),
                format!("invalid config JSON: {error}"),
            )
            .with_metadata("source", "config")
        }),
        ConfigFormat::Toml => toml::from_str(input).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", "invalid_toml"),
                format!("invalid config TOML: {error}"),
            )
            .with_metadata("source", "config")
        }),
    }
}

fn read_config_file(path: &Path) -> Result<String, ErrorEnvelope> {
    std::fs::read_to_string(path).map_err(|error| {
        let code = match error.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::new("config", "config_file_not_found"),
            std::io::ErrorKind::PermissionDenied => {
                ErrorCode::new("config", "config_file_permission_denied")
            },
            _ => ErrorCode::new("config", "config_file_io"),
        };

        ErrorEnvelope::expected(code, format!("failed to read config file: {error}"))
            .with_metadata("path", path.to_string_lossy().to_string())
    })
}

fn detect_config_format(path: &Path) -> Result<ConfigFormat, ErrorEnvelope> {
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        None | Some("json") => Ok(ConfigFormat::Json),
        Some("toml") => Ok(ConfigFormat::Toml),
        Some(other) => Err(ErrorEnvelope::expected(
            ErrorCode::new("config", "unsupported_format"),
            "unsupported config format; use .json or .toml",
        )
        .with_metadata("extension", other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldcheck_shared::{LogLevel, NOT_BLANK_MESSAGE_KEY};

    #[test]
    fn env_wins_over_config_json() -> Result<(), Box<dyn std::error::Error>> {
        let config_json = r#"{
          "version": 1,
          "activeGroups": ["Default"],
          "logging": { "level": "warn" }
        }"#;

        let env = ValidationEnv {
            log_level: Some(LogLevel::Debug),
            ..ValidationEnv::default()
        };

        let config = load_validation_config_from_sources(Some(config_json), &env)?;
        assert_eq!(config.active_groups, vec!["Default".to_owned()]);
        assert_eq!(config.log_level(), LogLevel::Debug);
        Ok(())
    }

    #[test]
    fn env_messages_merge_with_config_messages() -> Result<(), Box<dyn std::error::Error>> {
        let config_json = r#"{
          "messages": { "app.title": "title is required" }
        }"#;
        let env = ValidationEnv {
            messages: Some(
                [(NOT_BLANK_MESSAGE_KEY.to_owned(), "{field} needs text".to_owned())]
                    .into_iter()
                    .collect(),
            ),
            ..ValidationEnv::default()
        };

        let config = load_validation_config_from_sources(Some(config_json), &env)?;
        let catalog = config.catalog();
        assert_eq!(catalog.get("app.title"), Some("title is required"));
        assert_eq!(catalog.get(NOT_BLANK_MESSAGE_KEY), Some("{field} needs text"));
        Ok(())
    }

    #[test]
    fn serialization_is_deterministic() -> Result<(), Box<dyn std::error::Error>> {
        let config = load_validation_config_from_sources(None, &ValidationEnv::default())?;
        let first = to_pretty_json(&config)?;
        let second = to_pretty_json(&config)?;
        assert_eq!(first, second);
        assert!(first.ends_with('\n'));
        Ok(())
    }

    #[test]
    fn toml_output_parses_back() -> Result<(), Box<dyn std::error::Error>> {
        let config = load_validation_config_from_sources(None, &ValidationEnv::default())?;
        let rendered = to_pretty_toml(&config)?;
        let reparsed = crate::parse_validation_config_toml(&rendered)?;
        assert_eq!(reparsed, config);
        Ok(())
    }

    #[test]
    fn unknown_config_keys_report_their_source() {
        let error = load_validation_config_from_sources(
            Some(r#"{"unknown": true}"#),
            &ValidationEnv::default(),
        )
        .err();
        assert_eq!(
            error
                .as_ref()
                .and_then(|envelope| envelope.metadata.get("source"))
                .map(String::as_str),
            Some("config")
        );
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let error = detect_config_format(Path::new("fieldcheck.yaml")).err();
        assert_eq!(
            error.map(|envelope| envelope.code.to_string()),
            Some("config:unsupported_format".to_owned())
        );
    }

    #[test]
    fn missing_file_maps_to_not_found() {
        let error = load_validation_config_from_path(
            Some(Path::new("/nonexistent/fieldcheck.toml")),
            &ValidationEnv::default(),
        )
        .err();
        assert_eq!(
            error.map(|envelope| envelope.code.to_string()),
            Some("config:config_file_not_found".to_owned())
        );
    }
}

//! # fieldcheck-config
//!
//! Configuration schema, env overrides, and loading for the validator.
//! This crate depends on `shared` only.

/// Environment variable parsing and merging.
pub mod env;
/// Config loading helpers (env + file + overrides).
pub mod load;
/// JSON line logger and sinks.
pub mod logging;
/// Configuration schema types and helpers.
pub mod schema;

pub use schema::{
    CURRENT_CONFIG_VERSION, ConfigSchemaError, LoggingConfig, ValidatedValidationConfig,
    ValidationConfig, parse_validation_config_json, parse_validation_config_toml,
};

pub use env::{
    ENV_ACTIVE_GROUPS, ENV_LOG_LEVEL, ENV_MESSAGES_JSON, EnvParseError, ValidationEnv,
    apply_env_overrides,
};
pub use load::{
    load_validation_config_from_path, load_validation_config_from_sources,
    load_validation_config_std_env, to_pretty_json, to_pretty_toml,
};
pub use logging::{JsonLogger, LogSink, StderrLogSink};

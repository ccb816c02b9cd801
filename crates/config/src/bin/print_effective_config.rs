//! Print the effective validation config (file + env overrides) as JSON.
//!
//! Usage: `print_effective_config [CONFIG_PATH]`

use fieldcheck_config::{JsonLogger, load_validation_config_std_env, to_pretty_json};
use fieldcheck_shared::{LoggerPort, log_fields};
use std::io;
use std::io::Write;
use std::path::PathBuf;

fn main() -> std::process::ExitCode {
    match run() {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            std::process::ExitCode::from(1)
        },
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = load_validation_config_std_env(config_path.as_deref())?;

    let logger = JsonLogger::stderr()
        .with_base_fields(log_fields([("component", "print_effective_config")]))
        .with_min_level(config.log_level());
    logger.debug(
        "config.effective",
        "effective validation config resolved",
        Some(log_fields([(
            "source",
            config_path
                .as_ref()
                .map_or_else(|| "defaults".to_owned(), |path| path.display().to_string()),
        )])),
    );

    let output = to_pretty_json(&config)?;

    let mut stdout = io::stdout();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;

    Ok(())
}

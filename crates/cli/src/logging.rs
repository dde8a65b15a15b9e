// ABOUTME: Process-wide logging initialisation with tracing-subscriber.
// ABOUTME: Resolves the level from CLI flag or APP_LOG_LEVEL and optionally mirrors logs to a file.

use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use tracing::error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Environment variable holding the log level when no flag is given.
pub const LOG_LEVEL_ENV_VAR: &str = "APP_LOG_LEVEL";
/// Level used when neither flag nor environment specify one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Picks the log level: explicit flag, then environment, then the default.
///
/// Level names are matched case-insensitively; `WARNING` and `CRITICAL` are
/// accepted as aliases for `warn` and `error`.
pub fn resolve_level(flag: Option<&str>, env: Option<&str>) -> String {
    let raw = flag
        .or(env)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_LOG_LEVEL);

    match raw.to_lowercase().as_str() {
        "warning" => "warn".to_string(),
        "critical" | "fatal" => "error".to_string(),
        "notset" => "trace".to_string(),
        other => other.to_string(),
    }
}

/// Builds the filter for a resolved level, falling back to the default on garbage.
pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
}

/// Installs the global subscriber. Call once, at process start.
///
/// Logs go to stderr. With `log_file`, they are also appended to that file
/// without colours; if the file cannot be opened, console logging still works
/// and the failure is logged.
pub fn init_logging(level: Option<&str>, log_file: Option<&Path>) -> Result<()> {
    let env_level = std::env::var(LOG_LEVEL_ENV_VAR).ok();
    let filter = build_filter(&resolve_level(level, env_level.as_deref()));

    let console = fmt::layer()
        .with_target(true)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .boxed();

    let mut file_error = None;
    let file_layer = log_file.and_then(|path| {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .boxed(),
            ),
            Err(e) => {
                file_error = Some(format!("{}: {}", path.display(), e));
                None
            }
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to initialise logging: {}", e))?;

    if let Some(err) = file_error {
        error!("Failed to set up file logger at {}", err);
    }
    Ok(())
}

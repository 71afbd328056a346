use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Debounce window used when `SHOPSEARCH_DEBOUNCE_MS` is not set.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("SHOPSEARCH_ENV", "development"))?;
    let log_level = or_default("SHOPSEARCH_LOG_LEVEL", "info");

    let debounce_ms = parse_u64("SHOPSEARCH_DEBOUNCE_MS", &DEFAULT_DEBOUNCE_MS.to_string())?;
    validate_debounce_ms(debounce_ms)?;
    let query_timeout_secs = parse_u64("SHOPSEARCH_QUERY_TIMEOUT_SECS", "30")?;

    let directory_path = PathBuf::from(or_default(
        "SHOPSEARCH_DIRECTORY_PATH",
        "./config/merchants.yaml",
    ));
    let profile_path = lookup("SHOPSEARCH_PROFILE_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    Ok(AppConfig {
        env,
        log_level,
        debounce_ms,
        query_timeout_secs,
        directory_path,
        profile_path,
    })
}

/// Rejects a zero debounce window, which would send a query per keystroke.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for `0`.
pub fn validate_debounce_ms(debounce_ms: u64) -> Result<(), ConfigError> {
    if debounce_ms == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SHOPSEARCH_DEBOUNCE_MS".to_string(),
            reason: "debounce window must be greater than zero".to_string(),
        });
    }
    Ok(())
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SHOPSEARCH_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

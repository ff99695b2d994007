use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
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
/// Returns `ConfigError` if a value is present but cannot be parsed.
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
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let require_url = |var: &str, default: &str| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Ok(raw.trim_end_matches('/').to_string())
        } else {
            Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected an http(s) URL, got \"{raw}\""),
            })
        }
    };

    let env = parse_environment(&or_default("AGROSCAN_ENV", "development"));
    let log_level = or_default("AGROSCAN_LOG_LEVEL", "info");

    let api_base_url = require_url("AGROSCAN_API_BASE_URL", "http://localhost:5000/api")?;
    let google_maps_api_key = lookup("GOOGLE_MAPS_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty());
    let places_base_url = require_url(
        "AGROSCAN_PLACES_BASE_URL",
        "https://maps.googleapis.com/maps/api/place",
    )?;

    let request_timeout_secs = parse_u64("AGROSCAN_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("AGROSCAN_USER_AGENT", "agroscan/0.1 (crop-diagnosis)");
    let geolocation_timeout_ms = parse_u64("AGROSCAN_GEOLOCATION_TIMEOUT_MS", "5000")?;
    let verify_radius_m = parse_u32("AGROSCAN_VERIFY_RADIUS_M", "150")?;
    let max_in_flight_lookups = parse_usize("AGROSCAN_MAX_IN_FLIGHT_LOOKUPS", "0")?;
    let api_max_retries = parse_u32("AGROSCAN_API_MAX_RETRIES", "2")?;
    let api_retry_backoff_base_ms = parse_u64("AGROSCAN_API_RETRY_BACKOFF_BASE_MS", "500")?;
    let places_max_retries = parse_u32("AGROSCAN_PLACES_MAX_RETRIES", "1")?;

    Ok(AppConfig {
        env,
        log_level,
        api_base_url,
        google_maps_api_key,
        places_base_url,
        request_timeout_secs,
        user_agent,
        geolocation_timeout_ms,
        verify_radius_m,
        max_in_flight_lookups,
        api_max_retries,
        api_retry_backoff_base_ms,
        places_max_retries,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

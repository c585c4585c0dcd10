use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a set variable holds an invalid value. Every
/// variable has a default, so an empty environment always succeeds.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a set variable holds an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup — no
/// `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

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

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" => Ok(false),
            _ => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected a boolean, got \"{raw}\""),
            }),
        }
    };

    let log_level = or_default("MAPSCOUT_LOG_LEVEL", "info");
    let headless = parse_bool("MAPSCOUT_HEADLESS", "true")?;
    let block_images = parse_bool("MAPSCOUT_BLOCK_IMAGES", "true")?;
    let output_dir = PathBuf::from(or_default("MAPSCOUT_OUTPUT_DIR", "output"));
    let search_url_base = or_default(
        "MAPSCOUT_SEARCH_URL_BASE",
        "https://www.google.com/maps/search/",
    );

    let nav_timeout_secs = parse_u64("MAPSCOUT_NAV_TIMEOUT_SECS", "30")?;
    let settle_poll_ms = parse_u64("MAPSCOUT_SETTLE_POLL_MS", "400")?;
    let settle_timeout_secs = parse_u64("MAPSCOUT_SETTLE_TIMEOUT_SECS", "10")?;
    let max_scroll_iterations = parse_usize("MAPSCOUT_MAX_SCROLL_ITERATIONS", "40")?;
    let max_concurrent_listings = parse_usize("MAPSCOUT_MAX_CONCURRENT_LISTINGS", "4")?;
    let max_retries = parse_u32("MAPSCOUT_MAX_RETRIES", "1")?;
    let retry_backoff_base_secs = parse_u64("MAPSCOUT_RETRY_BACKOFF_BASE_SECS", "2")?;

    Ok(AppConfig {
        log_level,
        headless,
        block_images,
        output_dir,
        search_url_base,
        nav_timeout_secs,
        settle_poll_ms,
        settle_timeout_secs,
        max_scroll_iterations,
        max_concurrent_listings,
        max_retries,
        retry_backoff_base_secs,
    })
}

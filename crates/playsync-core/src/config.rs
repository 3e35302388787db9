use crate::app_config::{AppConfig, MIN_INTER_CALL_DELAY_MS, PLACEHOLDER_PACKAGE_NAME};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable holds an invalid value.
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
/// Returns `ConfigError` if a variable holds an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can pass a `HashMap` lookup.
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

    let package_name = or_default("PLAYSYNC_PACKAGE_NAME", PLACEHOLDER_PACKAGE_NAME);
    validate_package_name(&package_name)?;

    let service_account_key_path = PathBuf::from(or_default(
        "PLAYSYNC_SERVICE_ACCOUNT_KEY_PATH",
        "service-account-key.json",
    ));
    let catalog_path = lookup("PLAYSYNC_CATALOG_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);
    let api_base_url = or_default(
        "PLAYSYNC_API_BASE_URL",
        "https://androidpublisher.googleapis.com/",
    );

    let request_timeout_secs = parse_u64("PLAYSYNC_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "PLAYSYNC_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let inter_call_delay_ms = parse_u64("PLAYSYNC_INTER_CALL_DELAY_MS", "500")?;
    if inter_call_delay_ms < MIN_INTER_CALL_DELAY_MS {
        return Err(ConfigError::InvalidEnvVar {
            var: "PLAYSYNC_INTER_CALL_DELAY_MS".to_string(),
            reason: format!("must be at least {MIN_INTER_CALL_DELAY_MS}"),
        });
    }

    let user_agent = or_default(
        "PLAYSYNC_USER_AGENT",
        "playsync/0.1 (catalog-provisioning)",
    );
    let log_level = or_default("PLAYSYNC_LOG_LEVEL", "warn");

    Ok(AppConfig {
        package_name,
        service_account_key_path,
        catalog_path,
        api_base_url,
        request_timeout_secs,
        inter_call_delay_ms,
        user_agent,
        log_level,
    })
}

/// Checks that `name` looks like an Android `applicationId`: at least two
/// dot-separated segments, each starting with a letter and containing only
/// ASCII letters, digits and underscores.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] naming `PLAYSYNC_PACKAGE_NAME`.
pub fn validate_package_name(name: &str) -> Result<(), ConfigError> {
    let segments: Vec<&str> = name.split('.').collect();
    let valid = segments.len() >= 2
        && segments.iter().all(|seg| {
            let mut chars = seg.chars();
            chars.next().is_some_and(|c| c.is_ascii_alphabetic())
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        });
    if !valid {
        return Err(ConfigError::InvalidEnvVar {
            var: "PLAYSYNC_PACKAGE_NAME".to_string(),
            reason: format!("'{name}' is not a valid application id"),
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

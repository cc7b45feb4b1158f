use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_PLACEHOLDER_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1618005182384-a83a8bd57fbe?q=80&w=1080&auto=format&fit=crop";

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
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("PINFORGE_ENV", "development"))?;
    let log_level = or_default("PINFORGE_LOG_LEVEL", "info");
    let data_dir = PathBuf::from(or_default("PINFORGE_DATA_DIR", "./.pinforge"));

    let gemini_api_key = optional("GEMINI_API_KEY");
    let ai_base_url = or_default(
        "PINFORGE_AI_BASE_URL",
        "https://generativelanguage.googleapis.com/v1beta",
    );
    let ai_analysis_model = or_default("PINFORGE_AI_ANALYSIS_MODEL", "gemini-3-flash-preview");
    let ai_strategy_model = or_default("PINFORGE_AI_STRATEGY_MODEL", "gemini-3-pro-preview");
    let ai_image_model = or_default("PINFORGE_AI_IMAGE_MODEL", "gemini-3-pro-image-preview");
    let ai_image_fallback_model = or_default(
        "PINFORGE_AI_IMAGE_FALLBACK_MODEL",
        "gemini-2.5-flash-image",
    );
    let ai_video_model = or_default("PINFORGE_AI_VIDEO_MODEL", "veo-3.1-fast-generate-preview");
    let ai_timeout_secs = parse_u64("PINFORGE_AI_TIMEOUT_SECS", "120")?;

    // Present-but-empty disables the placeholder tier.
    let placeholder_image_url = match lookup("PINFORGE_PLACEHOLDER_IMAGE_URL") {
        Ok(v) if v.trim().is_empty() => None,
        Ok(v) => Some(v.trim().to_string()),
        Err(_) => Some(DEFAULT_PLACEHOLDER_IMAGE_URL.to_string()),
    };

    let video_poll_interval_secs = parse_u64("PINFORGE_VIDEO_POLL_INTERVAL_SECS", "10")?;
    let video_max_wait_secs = parse_u64("PINFORGE_VIDEO_MAX_WAIT_SECS", "600")?;

    let pinterest_app_id = or_default("PINTEREST_APP_ID", "1539800");
    let pinterest_client_secret = optional("PINTEREST_CLIENT_SECRET");
    let pinterest_redirect_uri = or_default(
        "PINTEREST_REDIRECT_URI",
        "http://localhost:9002/api/pinterest/callback",
    );
    let pinterest_api_base = or_default("PINTEREST_API_BASE", "https://api.pinterest.com/v5");
    let pinterest_oauth_base = or_default(
        "PINTEREST_OAUTH_BASE",
        "https://www.pinterest.com/oauth",
    );
    let proxy_base = or_default("PINFORGE_PROXY_BASE", "https://corsproxy.io/?");
    let http_timeout_secs = parse_u64("PINFORGE_HTTP_TIMEOUT_SECS", "15")?;
    let default_destination_url = or_default(
        "PINFORGE_DEFAULT_DESTINATION_URL",
        "https://pinterest.com",
    );

    let export_pixel_ratio = {
        let var = "PINFORGE_EXPORT_PIXEL_RATIO";
        let raw = or_default(var, "2.5");
        let value = raw.parse::<f32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })?;
        if !(value.is_finite() && value > 0.0) {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("must be a positive number, got {raw}"),
            });
        }
        value
    };

    Ok(AppConfig {
        env,
        log_level,
        data_dir,
        gemini_api_key,
        ai_base_url,
        ai_analysis_model,
        ai_strategy_model,
        ai_image_model,
        ai_image_fallback_model,
        ai_video_model,
        ai_timeout_secs,
        placeholder_image_url,
        video_poll_interval_secs,
        video_max_wait_secs,
        pinterest_app_id,
        pinterest_client_secret,
        pinterest_redirect_uri,
        pinterest_api_base,
        pinterest_oauth_base,
        proxy_base,
        http_timeout_secs,
        default_destination_url,
        export_pixel_ratio,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PINFORGE_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read brands file at {path}: {source}")]
    BrandsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse brands file: {0}")]
    BrandsFileParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Application configuration, sourced from environment variables.
#[derive(Clone)]
pub struct AppConfig {
    /// OpenAI-compatible base URL, e.g. `https://api.openai.com/v1`.
    pub genai_api_url: String,
    /// Absent selects the canned (offline/demo) generation client.
    pub genai_api_key: Option<String>,
    pub genai_model: String,
    pub genai_request_timeout_secs: u64,
    /// Minimum wall-clock gap between two generation requests.
    pub genai_min_interval_ms: u64,
    /// Cooldown between two accepted (non-forced) brief generations.
    pub refresh_interval_hours: i64,
    pub auto_refresh: bool,
    /// Optional YAML brand-registry override.
    pub brands_path: Option<PathBuf>,
    pub log_level: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("genai_api_url", &self.genai_api_url)
            .field(
                "genai_api_key",
                &self.genai_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("genai_model", &self.genai_model)
            .field(
                "genai_request_timeout_secs",
                &self.genai_request_timeout_secs,
            )
            .field("genai_min_interval_ms", &self.genai_min_interval_ms)
            .field("refresh_interval_hours", &self.refresh_interval_hours)
            .field("auto_refresh", &self.auto_refresh)
            .field("brands_path", &self.brands_path)
            .field("log_level", &self.log_level)
            .finish()
    }
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading
/// env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in
/// the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup
/// function.
///
/// The parsing/validation logic is decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
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

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected true/false, got '{other}'"),
            }),
        }
    };

    let genai_api_url = or_default("TRENDSCOPE_GENAI_URL", "https://api.openai.com/v1");
    let genai_api_key = lookup("TRENDSCOPE_GENAI_KEY").ok();
    let genai_model = or_default("TRENDSCOPE_GENAI_MODEL", "gpt-4o-mini");
    let genai_request_timeout_secs = parse_u64("TRENDSCOPE_GENAI_TIMEOUT_SECS", "30")?;
    let genai_min_interval_ms = parse_u64("TRENDSCOPE_GENAI_MIN_INTERVAL_MS", "2000")?;

    let refresh_interval_hours = {
        let raw = or_default("TRENDSCOPE_REFRESH_HOURS", "24");
        let hours = raw.parse::<i64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: "TRENDSCOPE_REFRESH_HOURS".to_string(),
            reason: e.to_string(),
        })?;
        if hours <= 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: "TRENDSCOPE_REFRESH_HOURS".to_string(),
                reason: format!("must be positive, got {hours}"),
            });
        }
        hours
    };

    let auto_refresh = parse_bool("TRENDSCOPE_AUTO_REFRESH", "false")?;
    let brands_path = lookup("TRENDSCOPE_BRANDS_PATH").ok().map(PathBuf::from);
    let log_level = or_default("TRENDSCOPE_LOG_LEVEL", "info");

    Ok(AppConfig {
        genai_api_url,
        genai_api_key,
        genai_model,
        genai_request_timeout_secs,
        genai_min_interval_ms,
        refresh_interval_hours,
        auto_refresh,
        brands_path,
        log_level,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn build_app_config_succeeds_with_empty_env() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.genai_api_url, "https://api.openai.com/v1");
        assert!(cfg.genai_api_key.is_none());
        assert_eq!(cfg.genai_model, "gpt-4o-mini");
        assert_eq!(cfg.genai_request_timeout_secs, 30);
        assert_eq!(cfg.genai_min_interval_ms, 2000);
        assert_eq!(cfg.refresh_interval_hours, 24);
        assert!(!cfg.auto_refresh);
        assert!(cfg.brands_path.is_none());
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn build_app_config_reads_overrides() {
        let mut map = HashMap::new();
        map.insert("TRENDSCOPE_GENAI_URL", "http://localhost:1234/v1");
        map.insert("TRENDSCOPE_GENAI_KEY", "sk-test");
        map.insert("TRENDSCOPE_REFRESH_HOURS", "6");
        map.insert("TRENDSCOPE_AUTO_REFRESH", "true");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.genai_api_url, "http://localhost:1234/v1");
        assert_eq!(cfg.genai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(cfg.refresh_interval_hours, 6);
        assert!(cfg.auto_refresh);
    }

    #[test]
    fn build_app_config_rejects_invalid_timeout() {
        let mut map = HashMap::new();
        map.insert("TRENDSCOPE_GENAI_TIMEOUT_SECS", "not-a-number");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TRENDSCOPE_GENAI_TIMEOUT_SECS"),
            "expected InvalidEnvVar(TRENDSCOPE_GENAI_TIMEOUT_SECS), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_rejects_non_positive_refresh_hours() {
        let mut map = HashMap::new();
        map.insert("TRENDSCOPE_REFRESH_HOURS", "0");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TRENDSCOPE_REFRESH_HOURS"),
            "expected InvalidEnvVar(TRENDSCOPE_REFRESH_HOURS), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_rejects_garbage_auto_refresh() {
        let mut map = HashMap::new();
        map.insert("TRENDSCOPE_AUTO_REFRESH", "maybe");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TRENDSCOPE_AUTO_REFRESH"),
            "expected InvalidEnvVar(TRENDSCOPE_AUTO_REFRESH), got: {result:?}"
        );
    }

    #[test]
    fn debug_redacts_api_key() {
        let mut map = HashMap::new();
        map.insert("TRENDSCOPE_GENAI_KEY", "sk-secret");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        let debug = format!("{cfg:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[redacted]"));
    }
}

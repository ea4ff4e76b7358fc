//! Configuration module
//!
//! Settings are read from the environment once at startup. Anything not set
//! falls back to a default that works for a local single-office install.

use crate::error::{AppError, AppResult};
use chrono_tz::Tz;
use log::{info, warn};
use std::env;
use url::Url;

/// Announcements younger than this cannot be cleared.
pub const CLEAR_LOCK_DAYS: i64 = 30;

/// Rows per page in the performance report.
pub const REPORT_PAGE_SIZE: usize = 5;

pub const DEFAULT_CALENDAR_API: &str = "https://www.googleapis.com/calendar/v3";
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Kolkata;
pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub google_client_id: Option<String>,
    pub calendar_id: String,
    pub calendar_api_base: String,
    pub oauth_redirect_uri: String,
    pub time_zone: Tz,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            google_client_id: None,
            calendar_id: "primary".to_string(),
            calendar_api_base: DEFAULT_CALENDAR_API.to_string(),
            oauth_redirect_uri: "http://localhost:3000/auth/callback".to_string(),
            time_zone: DEFAULT_TIMEZONE,
        }
    }
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        let mut config = Config::default();

        if let Ok(url) = env::var("LEXBOARD_DATABASE_URL") {
            config.database_url = url;
        }
        config.google_client_id = env::var("GOOGLE_CLIENT_ID").ok().filter(|id| !id.is_empty());
        if let Ok(id) = env::var("LEXBOARD_CALENDAR_ID") {
            config.calendar_id = id;
        }
        if let Ok(base) = env::var("LEXBOARD_CALENDAR_API") {
            config.calendar_api_base = base.trim_end_matches('/').to_string();
        }
        if let Ok(redirect) = env::var("LEXBOARD_OAUTH_REDIRECT") {
            config.oauth_redirect_uri = redirect;
        }
        if let Ok(tz) = env::var("LEXBOARD_TIMEZONE") {
            config.time_zone = tz
                .parse::<Tz>()
                .map_err(|e| AppError::config(format!("Unknown time zone '{}': {}", tz, e)))?;
        }

        Ok(config)
    }
}

fn default_database_url() -> String {
    let dir = dirs::data_dir().unwrap_or_else(|| std::path::PathBuf::from("."));
    format!("sqlite:{}?mode=rwc", dir.join("lexboard").join("lexboard.db").display())
}

/// Validates the loaded configuration
///
/// A missing Google client id is not an error: calendar mirroring is simply
/// unavailable until one is configured.
pub fn validate_config(config: &Config) -> AppResult<()> {
    info!("Validating configuration");

    if !config.database_url.starts_with("sqlite:") {
        return Err(AppError::config("LEXBOARD_DATABASE_URL must be a sqlite: URL"));
    }

    Url::parse(&config.calendar_api_base)
        .map_err(|e| AppError::config(format!("Invalid calendar API URL: {}", e)))?;
    Url::parse(&config.oauth_redirect_uri)
        .map_err(|e| AppError::config(format!("Invalid OAuth redirect URL: {}", e)))?;

    if config.calendar_id.trim().is_empty() {
        return Err(AppError::config("Calendar id cannot be empty"));
    }

    if config.google_client_id.is_none() {
        warn!("GOOGLE_CLIENT_ID not set, Google Calendar sync is disabled");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "LEXBOARD_DATABASE_URL",
            "GOOGLE_CLIENT_ID",
            "LEXBOARD_CALENDAR_ID",
            "LEXBOARD_CALENDAR_API",
            "LEXBOARD_OAUTH_REDIRECT",
            "LEXBOARD_TIMEZONE",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_default_config_validates() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.time_zone, chrono_tz::Asia::Kolkata);
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        env::set_var("LEXBOARD_CALENDAR_ID", "office@firm.in");
        env::set_var("LEXBOARD_CALENDAR_API", "http://127.0.0.1:9000/");
        env::set_var("LEXBOARD_TIMEZONE", "Europe/London");

        let config = Config::from_env().unwrap();
        assert_eq!(config.calendar_id, "office@firm.in");
        assert_eq!(config.calendar_api_base, "http://127.0.0.1:9000");
        assert_eq!(config.time_zone, chrono_tz::Europe::London);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_unknown_timezone() {
        clear_env();
        env::set_var("LEXBOARD_TIMEZONE", "Mars/Olympus");
        assert!(matches!(Config::from_env(), Err(AppError::Config(_))));
        clear_env();
    }

    #[test]
    fn test_validation_rejects_non_sqlite_url() {
        let config = Config {
            database_url: "postgres://localhost/lexboard".to_string(),
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());
    }
}

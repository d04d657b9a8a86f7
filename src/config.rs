//! Process configuration read once from the environment.
//!
//! `Config::from_env` is the startup credential check: without an API
//! credential nothing else can run, so its absence is a fatal error.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Primary environment variable holding the Wolfram|Alpha app id.
pub const APP_ID_VAR: &str = "APP_ID";
/// Alternative name accepted for the app id.
pub const APP_ID_ALT_VAR: &str = "WOLFRAM_APP_ID";
pub const API_URL_VAR: &str = "WOLFRAM_API_URL";
pub const TIMEOUT_VAR: &str = "WOLFRAM_TIMEOUT_SECS";
pub const MAX_PAGES_VAR: &str = "WOLFRAM_MAX_PAGES";
pub const LOG_FILE_VAR: &str = "WOLFRAM_LOG_FILE";

/// Default query endpoint.
pub const DEFAULT_API_URL: &str = "https://api.wolframalpha.com/v2/query";
/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default upper bound on continuation pages followed per query.
pub const DEFAULT_MAX_PAGES: usize = 50;

const LOG_FILE_NAME: &str = "wolfram_alpha_tool.log";

/// Errors raised while reading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The API credential is not set
    #[error("API key not found in environment variables: set APP_ID")]
    MissingCredential,

    /// A variable is set but cannot be parsed
    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime configuration for the query tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub app_id: String,
    pub api_url: String,
    pub timeout: Duration,
    pub max_pages: usize,
    pub log_file: PathBuf,
}

impl Config {
    /// Reads configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `APP_ID` (or `WOLFRAM_APP_ID`): required API credential
    /// - `WOLFRAM_API_URL`: query endpoint, defaults to the public v2 API
    /// - `WOLFRAM_TIMEOUT_SECS`: per-request timeout, defaults to 30
    /// - `WOLFRAM_MAX_PAGES`: continuation page cap, defaults to 50
    /// - `WOLFRAM_LOG_FILE`: error log destination, defaults to
    ///   `{data_dir}/wolfram-tool/logs/wolfram_alpha_tool.log`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingCredential` if no app id is set, or
    /// `ConfigError::Invalid` if a numeric variable does not parse or the
    /// timeout is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        let app_id = read_app_id().ok_or(ConfigError::MissingCredential)?;

        let api_url = std::env::var(API_URL_VAR).unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let timeout = match read_number(TIMEOUT_VAR)? {
            // A zero timeout would fail every request
            Some(0) => {
                return Err(ConfigError::Invalid {
                    name: TIMEOUT_VAR,
                    value: std::env::var(TIMEOUT_VAR).unwrap_or_default(),
                });
            }
            Some(secs) => Duration::from_secs(secs as u64),
            None => DEFAULT_TIMEOUT,
        };

        let max_pages = read_number(MAX_PAGES_VAR)?.unwrap_or(DEFAULT_MAX_PAGES);

        let log_file = std::env::var(LOG_FILE_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_log_file());

        Ok(Self {
            app_id,
            api_url,
            timeout,
            max_pages,
            log_file,
        })
    }
}

/// Reads the app id, preferring `APP_ID` over `WOLFRAM_APP_ID`.
///
/// Blank values count as unset.
pub(crate) fn read_app_id() -> Option<String> {
    [APP_ID_VAR, APP_ID_ALT_VAR]
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

fn read_number(name: &'static str) -> Result<Option<usize>, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(None),
    }
}

/// Gets the default log file path.
///
/// Returns `{data_dir}/wolfram-tool/logs/wolfram_alpha_tool.log`, or a
/// relative `logs/wolfram_alpha_tool.log` when no data directory exists.
pub fn default_log_file() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join("wolfram-tool").join("logs").join(LOG_FILE_NAME),
        None => PathBuf::from("logs").join(LOG_FILE_NAME),
    }
}

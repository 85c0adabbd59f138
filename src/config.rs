//! Runtime configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Startup configuration problems. Fatal: the binary exits.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    Missing(&'static str),
    /// A variable is set but cannot be parsed.
    Invalid { key: &'static str, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "environment variable {} is not set", key),
            ConfigError::Invalid { key, value } => {
                write!(f, "environment variable {} has invalid value '{}'", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Shared secret the chat front end sends in the `X-Bot-Token` header.
    pub bot_token: String,
    pub history_file: PathBuf,
    /// Sessions idle this long are dropped.
    pub session_timeout: Duration,
    /// Fixed seed for bracket randomness, if set.
    pub seed: Option<u64>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

const DEFAULT_HISTORY_FILE: &str = "tournaments.json";
const DEFAULT_SESSION_TIMEOUT_HOURS: u64 = 12;

/// Trimmed, non-empty value of `key`.
fn env_value(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_parsed<T: std::str::FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match env_value(key) {
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(None),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let bot_token = env_value("BOT_TOKEN").ok_or(ConfigError::Missing("BOT_TOKEN"))?;
        let hours: u64 =
            env_parsed("SESSION_TIMEOUT_HOURS")?.unwrap_or(DEFAULT_SESSION_TIMEOUT_HOURS);
        let timeout_secs = hours
            .checked_mul(3600)
            .ok_or_else(|| ConfigError::Invalid {
                key: "SESSION_TIMEOUT_HOURS",
                value: hours.to_string(),
            })?;
        Ok(Self {
            host: env_value("HOST").unwrap_or_else(default_host),
            port: env_parsed("PORT")?.unwrap_or_else(default_port),
            bot_token,
            history_file: env_value("HISTORY_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_HISTORY_FILE)),
            session_timeout: Duration::from_secs(timeout_secs),
            seed: env_parsed("BRACKET_SEED")?,
        })
    }
}

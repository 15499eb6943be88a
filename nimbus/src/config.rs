use std::env;
use std::fmt;
use std::str::FromStr;

use crate::error::{NimbusError, Result};

/// The provider serves at most this many forecast days.
pub const MAX_FORECAST_DAYS: u8 = 14;

pub const DEFAULT_WEATHER_BASE_URL: &str = "http://api.weatherapi.com/v1";

fn parse_env_or<T: FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

fn parse_env_opt<T: FromStr>(var: &str) -> Option<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Ignoring.", val, var, e);
                None
            }
        },
        Err(_) => None,
    }
}

fn non_empty_env(var: &str) -> Option<String> {
    env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub weather: WeatherConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub auth_token: Option<String>,
    pub local_path: Option<String>,
    /// Local stores only; remote stores ignore the pragmas below.
    pub busy_timeout_ms: u64,
    pub journal_mode: JournalMode,
    pub synchronous: Synchronous,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            auth_token: None,
            local_path: None,
            busy_timeout_ms: 5000,
            journal_mode: JournalMode::Wal,
            synchronous: Synchronous::Normal,
        }
    }
}

impl DatabaseConfig {
    fn from_env(url: String) -> Self {
        let defaults = Self::default();
        Self {
            url,
            auth_token: non_empty_env("DATABASE_AUTH_TOKEN"),
            local_path: non_empty_env("DATABASE_LOCAL_PATH"),
            busy_timeout_ms: parse_env_or("DATABASE_BUSY_TIMEOUT_MS", defaults.busy_timeout_ms),
            journal_mode: parse_env_or("DATABASE_JOURNAL_MODE", defaults.journal_mode),
            synchronous: parse_env_or("DATABASE_SYNCHRONOUS", defaults.synchronous),
        }
    }
}

/// SQLite `journal_mode` values accepted from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalMode {
    Delete,
    Truncate,
    Persist,
    Memory,
    Wal,
    Off,
}

impl JournalMode {
    pub fn as_sql(self) -> &'static str {
        match self {
            JournalMode::Delete => "DELETE",
            JournalMode::Truncate => "TRUNCATE",
            JournalMode::Persist => "PERSIST",
            JournalMode::Memory => "MEMORY",
            JournalMode::Wal => "WAL",
            JournalMode::Off => "OFF",
        }
    }
}

impl FromStr for JournalMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DELETE" => Ok(JournalMode::Delete),
            "TRUNCATE" => Ok(JournalMode::Truncate),
            "PERSIST" => Ok(JournalMode::Persist),
            "MEMORY" => Ok(JournalMode::Memory),
            "WAL" => Ok(JournalMode::Wal),
            "OFF" => Ok(JournalMode::Off),
            other => Err(format!("unknown journal mode `{other}`")),
        }
    }
}

impl fmt::Display for JournalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// SQLite `synchronous` values accepted from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Synchronous {
    Off,
    Normal,
    Full,
    Extra,
}

impl Synchronous {
    pub fn as_sql(self) -> &'static str {
        match self {
            Synchronous::Off => "OFF",
            Synchronous::Normal => "NORMAL",
            Synchronous::Full => "FULL",
            Synchronous::Extra => "EXTRA",
        }
    }
}

impl FromStr for Synchronous {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OFF" => Ok(Synchronous::Off),
            "NORMAL" => Ok(Synchronous::Normal),
            "FULL" => Ok(Synchronous::Full),
            "EXTRA" => Ok(Synchronous::Extra),
            other => Err(format!("unknown synchronous level `{other}`")),
        }
    }
}

impl fmt::Display for Synchronous {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Upstream forecast provider settings.
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub api_key: String,
    pub base_url: String,
    pub forecast_days: u8,
    pub timeout_secs: u64,
    pub max_concurrent_requests: usize,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
            forecast_days: MAX_FORECAST_DAYS,
            timeout_secs: 10,
            max_concurrent_requests: 16,
        }
    }
}

impl WeatherConfig {
    fn from_env() -> Self {
        let defaults = Self::default();
        let forecast_days: u8 = parse_env_or("WEATHER_FORECAST_DAYS", defaults.forecast_days);

        Self {
            api_key: env::var("WEATHER_API_KEY").unwrap_or_default(),
            base_url: non_empty_env("WEATHER_API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            forecast_days: forecast_days.clamp(1, MAX_FORECAST_DAYS),
            timeout_secs: parse_env_or("WEATHER_TIMEOUT_SECS", defaults.timeout_secs),
            max_concurrent_requests: parse_env_or(
                "WEATHER_MAX_CONCURRENT",
                defaults.max_concurrent_requests,
            )
            .max(1),
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// The store connection string is mandatory: without `DATABASE_URL` the
    /// server refuses to start.
    pub fn from_env() -> Result<Self> {
        let url = non_empty_env("DATABASE_URL").ok_or_else(|| {
            NimbusError::Config("DATABASE_URL must be set to a store connection string".to_string())
        })?;

        let port = parse_env_opt("PORT").unwrap_or_else(|| parse_env_or("NIMBUS_PORT", 5000));

        Ok(Self {
            server: ServerConfig {
                host: env::var("NIMBUS_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port,
            },
            database: DatabaseConfig::from_env(url),
            weather: WeatherConfig::from_env(),
        })
    }
}

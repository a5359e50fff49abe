//! Process configuration assembled from environment variables.
//!
//! Every component receives its settings through one of the structs below;
//! nothing outside this module reads the environment.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Seller code written for rows whose seller matches [`ImportConfig::seller_name`].
pub const DEFAULT_SELLER_CODE: &str = "1";

const DEFAULT_DATABASE_URL: &str = "app.db";
const DEFAULT_VTEX_ENVIRONMENT: &str = "vtexcommercestable";
const DEFAULT_PAGE_SIZE: u32 = 100;
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_SYNC_INTERVAL_SECS: u64 = 600;

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while reading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable `{0}` is not set")]
    Missing(&'static str),
    #[error("environment variable `{name}` has invalid value `{value}`")]
    Invalid { name: &'static str, value: String },
}

/// Credentials and connection settings for the VTEX order management API.
#[derive(Debug, Clone)]
pub struct VtexConfig {
    pub account_name: String,
    pub environment: String,
    pub app_key: String,
    pub app_token: String,
    /// Overrides the URL derived from account and environment.
    pub base_url: Option<String>,
    pub page_size: u32,
    /// `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
}

impl VtexConfig {
    pub fn from_lookup<F>(lookup: &F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_secs: u64 = parse_or(lookup, "VTEX_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;

        Ok(Self {
            account_name: required(lookup, "VTEX_ACCOUNT_NAME")?,
            environment: lookup("VTEX_ENVIRONMENT")
                .unwrap_or_else(|| DEFAULT_VTEX_ENVIRONMENT.to_string()),
            app_key: required(lookup, "VTEX_APP_KEY")?,
            app_token: required(lookup, "VTEX_APP_TOKEN")?,
            base_url: lookup("VTEX_BASE_URL").filter(|value| !value.trim().is_empty()),
            page_size: parse_or(lookup, "VTEX_PAGE_SIZE", DEFAULT_PAGE_SIZE)?,
            timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
        })
    }

    /// Root of the API, e.g. `https://store.vtexcommercestable.com/api`.
    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!(
                "https://{}.{}.com/api",
                self.account_name, self.environment
            ),
        }
    }
}

/// Settings for the scheduled incremental sync.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub database_url: String,
    pub vtex: VtexConfig,
    pub interval: Duration,
    /// File locked while a sync process runs; defaults to `<DATABASE_URL>.sync.lock`.
    pub lock_path: PathBuf,
}

impl SyncConfig {
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(&|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: &F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let interval_secs: u64 =
            parse_or(lookup, "SYNC_INTERVAL_SECS", DEFAULT_SYNC_INTERVAL_SECS)?;
        if interval_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "SYNC_INTERVAL_SECS",
                value: interval_secs.to_string(),
            });
        }

        let database_url = database_url(lookup);
        let lock_path = lookup("SYNC_LOCK_PATH")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(format!("{database_url}.sync.lock")));

        Ok(Self {
            database_url,
            vtex: VtexConfig::from_lookup(lookup)?,
            interval: Duration::from_secs(interval_secs),
            lock_path,
        })
    }
}

/// Settings for the spreadsheet batch importer.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub database_url: String,
    /// Seller display name as it appears in exported spreadsheets.
    pub seller_name: String,
    pub seller_code: String,
}

impl ImportConfig {
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(&|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: &F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            database_url: database_url(lookup),
            seller_name: lookup("SELLER_NAME").unwrap_or_default(),
            seller_code: DEFAULT_SELLER_CODE.to_string(),
        })
    }
}

fn database_url<F>(lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string())
}

fn required<F>(lookup: &F, name: &'static str) -> ConfigResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> ConfigResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

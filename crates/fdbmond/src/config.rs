//! Daemon configuration.
//!
//! Everything comes from environment variables with a fallback default, so
//! the exporter runs with no flags at all in its usual container setting.
//! An unset or empty variable means "use the default"; a set-but-invalid
//! value is a fatal startup error, never silently replaced.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use fdbmon_store::version::DEFAULT_API_VERSION;

const ENV_STATUS_DB: &str = "FDB_STATUS_DB";
const ENV_REFRESH_EVERY: &str = "FDB_METRICS_EVERY";
const ENV_LISTEN: &str = "FDB_METRICS_LISTEN";
const ENV_EXPORT_ENABLED: &str = "FDB_EXPORT_ENABLED";
const ENV_API_VERSION: &str = "FDB_API_VERSION";

const DEFAULT_STATUS_DB: &str = "/var/fdb/data/status.db";
const DEFAULT_REFRESH_SECS: u64 = 10;
const DEFAULT_LISTEN: &str = ":8080";

/// Error reading the daemon configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot parse {var} value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Resolved exporter configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExporterConfig {
    /// Path of the status database the exporter attaches to.
    pub status_db: PathBuf,
    /// Sleep between refresh ticks.
    pub refresh_interval: Duration,
    /// Listen address for the scrape endpoint.
    pub listen: SocketAddr,
    /// Master toggle for the export step.
    pub export_enabled: bool,
    /// Requested store API version, validated against the supported range
    /// when the store is attached.
    pub api_version: u32,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            status_db: PathBuf::from(DEFAULT_STATUS_DB),
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_SECS),
            listen: SocketAddr::from(([0, 0, 0, 0], 8080)),
            export_enabled: true,
            api_version: DEFAULT_API_VERSION,
        }
    }
}

impl ExporterConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Read the configuration from an arbitrary variable lookup.
    ///
    /// An empty value counts as unset, matching how container entrypoints
    /// tend to pass `FOO=` for options they leave alone.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let status_db = get(ENV_STATUS_DB)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATUS_DB));

        let refresh_interval = match get(ENV_REFRESH_EVERY) {
            Some(raw) => Duration::from_secs(parse_refresh_secs(&raw)?),
            None => Duration::from_secs(DEFAULT_REFRESH_SECS),
        };

        let listen = parse_listen(&get(ENV_LISTEN).unwrap_or_else(|| DEFAULT_LISTEN.to_string()))?;

        let export_enabled = match get(ENV_EXPORT_ENABLED) {
            Some(raw) => parse_bool(ENV_EXPORT_ENABLED, &raw)?,
            None => true,
        };

        let api_version = match get(ENV_API_VERSION) {
            Some(raw) => raw.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::Invalid {
                    var: ENV_API_VERSION,
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?,
            None => DEFAULT_API_VERSION,
        };

        Ok(Self {
            status_db,
            refresh_interval,
            listen,
            export_enabled,
            api_version,
        })
    }
}

fn parse_refresh_secs(raw: &str) -> Result<u64, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        var: ENV_REFRESH_EVERY,
        value: raw.to_string(),
        reason,
    };

    let secs: u64 = raw.parse().map_err(|e: std::num::ParseIntError| invalid(e.to_string()))?;
    if secs == 0 {
        return Err(invalid("interval must be positive".to_string()));
    }
    Ok(secs)
}

/// Parse a listen address. A bare `:port` binds all interfaces, matching
/// the address forms container deployments pass around.
fn parse_listen(raw: &str) -> Result<SocketAddr, ConfigError> {
    let normalized = if raw.starts_with(':') {
        format!("0.0.0.0{raw}")
    } else {
        raw.to_string()
    };

    normalized
        .parse()
        .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
            var: ENV_LISTEN,
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "t" | "true" => Ok(true),
        "0" | "f" | "false" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value: raw.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}

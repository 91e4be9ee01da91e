//! Site configuration
//!
//! Loaded from a JSON file; every field has a default so an empty object
//! (or no file at all) is a valid configuration.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use netclock_core::{NetclockError, NetclockResult};
use netclock_time::{Locale, DEFAULT_ENDPOINT};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub time_source: TimeSourceConfig,
    pub clock: ClockConfig,
    pub server: ServerConfig,
    pub log: LogConfig,
}

/// Where the clock page takes its authoritative time from
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimeSourceConfig {
    pub endpoint: String,
}

impl Default for TimeSourceConfig {
    fn default() -> Self {
        TimeSourceConfig {
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

/// Clock page behaviour
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClockConfig {
    /// Display refresh period
    #[serde(with = "humantime_serde")]
    pub refresh_interval: Duration,
    /// Locale of the long date
    pub locale: Locale,
}

impl Default for ClockConfig {
    fn default() -> Self {
        ClockConfig {
            refresh_interval: Duration::from_secs(1),
            locale: Locale::ZhCn,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            listen: SocketAddr::from(([127, 0, 0, 1], 3000)),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging setup; `RUST_LOG` takes precedence over `filter`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            filter: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl SiteConfig {
    /// Parse and validate a JSON document
    pub fn from_json(raw: &str) -> NetclockResult<Self> {
        let config: SiteConfig = serde_json::from_str(raw)
            .map_err(|e| NetclockError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> NetclockResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw).map_err(|e| match e {
            NetclockError::InvalidConfig(msg) => {
                NetclockError::InvalidConfig(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    pub fn validate(&self) -> NetclockResult<()> {
        let endpoint = &self.time_source.endpoint;
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(NetclockError::InvalidConfig(format!(
                "time_source.endpoint must be an http(s) URL, got {endpoint:?}"
            )));
        }
        if self.clock.refresh_interval.is_zero() {
            return Err(NetclockError::InvalidConfig(
                "clock.refresh_interval must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

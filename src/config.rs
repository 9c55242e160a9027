//! Process configuration, read from the environment (and `.env` when present).

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;
use tracing::Level;

use crate::uber::UberConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Which collaborator prices legs and books rides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleKind {
    Uber,
    Haversine,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub log_level: Level,
    pub locations_file: Option<PathBuf>,
    pub oracle: OracleKind,
    pub uber: UberConfig,
    /// Fan out leg pricing on the rayon pool.
    pub parallel_planning: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            log_level: Level::INFO,
            locations_file: None,
            oracle: OracleKind::Haversine,
            uber: UberConfig::default(),
            parallel_planning: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(value) = lookup("TRIP_PLANNER_BIND") {
            config.bind_addr = parse("TRIP_PLANNER_BIND", value)?;
        }
        if let Some(value) = lookup("TRIP_PLANNER_LOG") {
            config.log_level = parse("TRIP_PLANNER_LOG", value)?;
        }
        if let Some(value) = lookup("TRIP_PLANNER_PARALLEL") {
            config.parallel_planning = parse("TRIP_PLANNER_PARALLEL", value)?;
        }
        config.locations_file = lookup("LOCATIONS_FILE").map(PathBuf::from);

        if let Some(value) = lookup("COST_ORACLE") {
            config.oracle = match value.to_ascii_lowercase().as_str() {
                "uber" => OracleKind::Uber,
                "haversine" => OracleKind::Haversine,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "COST_ORACLE",
                        value,
                    });
                }
            };
        }

        if let Some(value) = lookup("UBER_BASE_URL") {
            config.uber.base_url = value;
        }
        if let Some(value) = lookup("UBER_ACCESS_TOKEN") {
            config.uber.access_token = value;
        }
        if let Some(value) = lookup("UBER_TIMEOUT_SECS") {
            config.uber.timeout_secs = parse("UBER_TIMEOUT_SECS", value)?;
        }

        Ok(config)
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}

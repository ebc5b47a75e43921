//! Server configuration from environment variables

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::layout::Direction;

/// Prefix shared by every configuration variable
pub const ENV_PREFIX: &str = "CONTEXT_GRAPH_";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}: {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

/// Output format for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Configuration for the server binary
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Debounce window for layout passes
    pub layout_debounce: Duration,
    pub layout_direction: Direction,
    /// Bound of the inbound event queue
    pub inbound_capacity: usize,
    /// Buffer of the view broadcast channel; slower clients get a resync
    pub broadcast_capacity: usize,
    /// Whether `start_session` from a UI client clears the visible tree
    pub clear_on_new_run: bool,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3141,
            layout_debounce: Duration::from_millis(100),
            layout_direction: Direction::LR,
            inbound_capacity: 1024,
            broadcast_capacity: 1024,
            clear_on_new_run: true,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

fn parse<T>(key: &str, raw: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        key: format!("{}{}", ENV_PREFIX, key),
        value: raw.clone(),
        reason: e.to_string(),
    })
}

impl ServerConfig {
    /// Load from `CONTEXT_GRAPH_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load using `lookup` to resolve full variable names
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(&format!("{}{}", ENV_PREFIX, key));
        let mut config = Self::default();

        if let Some(host) = get("HOST") {
            config.host = host;
        }
        if let Some(raw) = get("PORT") {
            config.port = parse("PORT", raw)?;
        }
        if let Some(raw) = get("LAYOUT_DEBOUNCE_MS") {
            config.layout_debounce = Duration::from_millis(parse("LAYOUT_DEBOUNCE_MS", raw)?);
        }
        if let Some(raw) = get("LAYOUT_DIRECTION") {
            config.layout_direction = parse("LAYOUT_DIRECTION", raw)?;
        }
        if let Some(raw) = get("INBOUND_CAPACITY") {
            config.inbound_capacity = parse("INBOUND_CAPACITY", raw)?;
        }
        if let Some(raw) = get("BROADCAST_CAPACITY") {
            config.broadcast_capacity = parse("BROADCAST_CAPACITY", raw)?;
        }
        if let Some(raw) = get("CLEAR_ON_NEW_RUN") {
            config.clear_on_new_run = parse("CLEAR_ON_NEW_RUN", raw)?;
        }
        if let Some(level) = get("LOG_LEVEL") {
            config.log_level = level;
        }
        if let Some(raw) = get("LOG_FORMAT") {
            config.log_format = parse("LOG_FORMAT", raw)?;
        }

        // Zero-capacity channels panic on creation
        for (key, value) in [
            ("INBOUND_CAPACITY", config.inbound_capacity),
            ("BROADCAST_CAPACITY", config.broadcast_capacity),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    key: format!("{}{}", ENV_PREFIX, key),
                    value: "0".to_string(),
                    reason: "must be greater than zero".to_string(),
                });
            }
        }

        Ok(config)
    }

    /// `host:port` string to bind, resolved by the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 3141);
        assert_eq!(config.layout_debounce, Duration::from_millis(100));
        assert_eq!(config.layout_direction, Direction::LR);
        assert!(config.clear_on_new_run);
        assert_eq!(config.bind_addr(), "127.0.0.1:3141");
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("CONTEXT_GRAPH_PORT", "8080"),
            ("CONTEXT_GRAPH_LAYOUT_DEBOUNCE_MS", "250"),
            ("CONTEXT_GRAPH_LAYOUT_DIRECTION", "tb"),
            ("CONTEXT_GRAPH_CLEAR_ON_NEW_RUN", "false"),
            ("CONTEXT_GRAPH_LOG_FORMAT", "json"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.layout_debounce, Duration::from_millis(250));
        assert_eq!(config.layout_direction, Direction::TB);
        assert!(!config.clear_on_new_run);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_values() {
        let err = ServerConfig::from_lookup(lookup(&[("CONTEXT_GRAPH_PORT", "lots")])).unwrap_err();
        assert!(err.to_string().contains("CONTEXT_GRAPH_PORT"));

        assert!(ServerConfig::from_lookup(lookup(&[("CONTEXT_GRAPH_INBOUND_CAPACITY", "0")])).is_err());
        assert!(ServerConfig::from_lookup(lookup(&[("CONTEXT_GRAPH_LAYOUT_DIRECTION", "up")])).is_err());
    }
}

//! Environment configuration

use crate::state_machine::LoopBack;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_LINE_API_BASE: &str = "https://api.line.me";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Specify {0} as environment variable.")]
    Missing(&'static str),
    #[error("Invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Runtime settings
#[derive(Debug, Clone)]
pub struct Config {
    pub channel_secret: String,
    pub channel_access_token: String,
    pub port: u16,
    pub line_api_base: String,
    pub loop_back: LoopBack,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let port = match lookup("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "PORT",
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let loop_back = match lookup("HOOPSTAT_LOOP_BACK") {
            Some(raw) => raw.parse::<LoopBack>().map_err(|reason| ConfigError::Invalid {
                name: "HOOPSTAT_LOOP_BACK",
                reason,
            })?,
            None => LoopBack::default(),
        };

        Ok(Self {
            channel_secret: required("LINE_CHANNEL_SECRET")?,
            channel_access_token: required("LINE_CHANNEL_ACCESS_TOKEN")?,
            port,
            line_api_base: lookup("LINE_API_BASE")
                .unwrap_or_else(|| DEFAULT_LINE_API_BASE.to_string()),
            loop_back,
        })
    }
}

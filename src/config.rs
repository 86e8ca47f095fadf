//! Environment-driven configuration.
//!
//! Values are read once at startup (after `dotenvy` has loaded `.env`).

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use rust_decimal::Decimal;

use crate::design::calculators::BASIC_AREA_RATIO;

/// Configuration errors raised while reading the environment
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub database_max_connections: u32,
    /// Fraction of the plot reserved for basic spaces
    pub basic_area_ratio: Decimal,
    pub cors_allow_any: bool,
    /// Directory served under `/media` (uploaded images live here)
    pub media_root: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        Ok(Self {
            database_url,
            bind_addr: parse_var("BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 8000)))?,
            database_max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 5)?,
            basic_area_ratio: parse_ratio(env::var("DESIGN_BASIC_AREA_RATIO").ok())?,
            cors_allow_any: parse_var("CORS_ALLOW_ANY", true)?,
            media_root: env::var("MEDIA_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("media")),
        })
    }
}

fn parse_var<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e| invalid(key, &raw, e)),
        Err(_) => Ok(default),
    }
}

/// The ratio must leave some area available for options.
fn parse_ratio(raw: Option<String>) -> Result<Decimal, ConfigError> {
    let Some(raw) = raw else {
        return Ok(BASIC_AREA_RATIO);
    };

    let ratio: Decimal = raw
        .trim()
        .parse()
        .map_err(|e| invalid("DESIGN_BASIC_AREA_RATIO", &raw, e))?;

    if ratio < Decimal::ZERO || ratio >= Decimal::ONE {
        return Err(invalid(
            "DESIGN_BASIC_AREA_RATIO",
            &raw,
            "must be in the range [0, 1)",
        ));
    }

    Ok(ratio)
}

fn invalid(key: &'static str, value: &str, reason: impl std::fmt::Display) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

use std::env;
use std::time::Duration;

use crate::model::ConfigError;

const DEFAULT_KEYWORDS: &[&str] = &["ssd", "notebook", "smartphone", "monitor", "headset"];
const DEFAULT_COUNTRY: &str = "US";
const DEFAULT_MIN_INTERVAL_SECS: u64 = 60;
const DEFAULT_MAX_INTERVAL_SECS: u64 = 180;
const DEFAULT_SEND_INTERVAL_SECS: u64 = 60;
const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub telegram_bot_token: String,
    pub telegram_chat_id: i64,
    pub port: u16,
    pub mode: ModeConfig,
}

/// The two deployment modes are mutually exclusive: either the worker
/// discovers promotions from the catalog provider, or it broadcasts the
/// manually submitted coupon list. The Control API runs in both.
#[derive(Debug, Clone)]
pub enum ModeConfig {
    Discovery(DiscoveryConfig),
    Broadcast { send_interval: Duration },
}

#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    pub provider_key: String,
    pub provider_host: String,
    pub keywords: Vec<String>,
    pub country: String,
    pub min_interval: Duration,
    pub max_interval: Duration,
    pub min_discount_percent: f64,
}

/// Reads and validates the whole configuration from the environment.
/// Any missing or malformed required value aborts startup.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let telegram_bot_token = require("TELEGRAM_BOT_TOKEN")?;
    let telegram_chat_id = require("TELEGRAM_CHAT_ID")?.trim().parse::<i64>().map_err(|e| {
        ConfigError::Invalid {
            name: "TELEGRAM_CHAT_ID",
            reason: e.to_string(),
        }
    })?;
    let port = parse_var("PORT", env::var("PORT").ok())?.unwrap_or(DEFAULT_PORT);

    let mode = match env::var("BOT_MODE").ok().as_deref() {
        None | Some("discovery") => ModeConfig::Discovery(load_discovery_config()?),
        Some("broadcast") => ModeConfig::Broadcast {
            send_interval: Duration::from_secs(
                parse_var("SEND_INTERVAL_SECS", env::var("SEND_INTERVAL_SECS").ok())?
                    .unwrap_or(DEFAULT_SEND_INTERVAL_SECS),
            ),
        },
        Some(other) => {
            return Err(ConfigError::Invalid {
                name: "BOT_MODE",
                reason: format!("expected 'discovery' or 'broadcast', got '{other}'"),
            });
        }
    };

    Ok(AppConfig {
        telegram_bot_token,
        telegram_chat_id,
        port,
        mode,
    })
}

fn load_discovery_config() -> Result<DiscoveryConfig, ConfigError> {
    let min_secs = parse_var("MIN_INTERVAL_SECS", env::var("MIN_INTERVAL_SECS").ok())?
        .unwrap_or(DEFAULT_MIN_INTERVAL_SECS);
    let max_secs = parse_var("MAX_INTERVAL_SECS", env::var("MAX_INTERVAL_SECS").ok())?
        .unwrap_or(DEFAULT_MAX_INTERVAL_SECS);
    let (min_interval, max_interval) = validate_interval_window(min_secs, max_secs)?;

    let min_discount_percent =
        parse_var("MIN_DISCOUNT_PERCENT", env::var("MIN_DISCOUNT_PERCENT").ok())?.unwrap_or(0.0);
    validate_discount(min_discount_percent)?;

    Ok(DiscoveryConfig {
        provider_key: require("RAPIDAPI_KEY")?,
        provider_host: require("RAPIDAPI_HOST")?,
        keywords: parse_keywords(env::var("SEARCH_KEYWORDS").ok().as_deref()),
        country: env::var("SEARCH_COUNTRY").unwrap_or_else(|_| DEFAULT_COUNTRY.to_string()),
        min_interval,
        max_interval,
        min_discount_percent,
    })
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn parse_var<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(|e| ConfigError::Invalid {
            name,
            reason: format!("'{raw}': {e}"),
        }),
    }
}

pub(crate) fn parse_keywords(raw: Option<&str>) -> Vec<String> {
    let parsed: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect();
    if parsed.is_empty() {
        DEFAULT_KEYWORDS.iter().map(|k| (*k).to_string()).collect()
    } else {
        parsed
    }
}

pub(crate) fn validate_interval_window(
    min_secs: u64,
    max_secs: u64,
) -> Result<(Duration, Duration), ConfigError> {
    if min_secs == 0 || min_secs > max_secs {
        return Err(ConfigError::Invalid {
            name: "MIN_INTERVAL_SECS",
            reason: format!("window [{min_secs}, {max_secs}] must satisfy 0 < min <= max"),
        });
    }
    Ok((Duration::from_secs(min_secs), Duration::from_secs(max_secs)))
}

pub(crate) fn validate_discount(percent: f64) -> Result<(), ConfigError> {
    if !percent.is_finite() || percent < 0.0 {
        return Err(ConfigError::Invalid {
            name: "MIN_DISCOUNT_PERCENT",
            reason: format!("'{percent}' must be a finite value >= 0"),
        });
    }
    Ok(())
}

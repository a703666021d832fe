use std::path::Path;

use error_stack::{Report, ResultExt};
use serde::Deserialize;

use crate::engine::MIN_CANDLES;
use crate::error::ConfigError;
use crate::model::TimeFrame;

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "text".into()
}

fn default_symbol() -> String {
    "BTCUSDT".into()
}

fn default_interval() -> String {
    "1m".into()
}

fn default_candle_limit() -> usize {
    100
}

fn default_idle_seconds() -> u64 {
    300
}

fn default_notifier_kind() -> String {
    "telegram".into()
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub market: MarketConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub notifier: NotifierConfig,
}

#[derive(Debug, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Accepted values: `"text"` | `"json"`
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarketConfig {
    #[serde(default = "default_symbol")]
    pub symbol: String,
    #[serde(default = "default_interval")]
    pub interval: String,
    /// Candles requested per cycle. Must cover the indicator warm-up.
    #[serde(default = "default_candle_limit")]
    pub candle_limit: usize,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            interval: default_interval(),
            candle_limit: default_candle_limit(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SchedulerConfig {
    /// Idle period between cycle completions, in seconds.
    #[serde(default = "default_idle_seconds")]
    pub idle_seconds: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            idle_seconds: default_idle_seconds(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NotifierConfig {
    /// Accepted values: `"telegram"` | `"terminal"`
    #[serde(default = "default_notifier_kind")]
    pub kind: String,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            kind: default_notifier_kind(),
        }
    }
}

impl MarketConfig {
    /// Parsed form of the `interval` field. Always succeeds on a validated
    /// config.
    pub fn timeframe(&self) -> Option<TimeFrame> {
        TimeFrame::from_str(&self.interval)
    }
}

/// Load and validate an `AppConfig` from a TOML file at `path`.
pub fn load(path: &Path) -> Result<AppConfig, Report<ConfigError>> {
    let content = std::fs::read_to_string(path)
        .change_context(ConfigError::ReadFile)
        .attach_with(|| format!("path: {}", path.display()))?;

    let config: AppConfig = toml::from_str(&content).change_context(ConfigError::Parse {
        reason: "invalid TOML syntax or schema mismatch".into(),
    })?;

    validate(&config)?;

    Ok(config)
}

const VALID_NOTIFIER_KINDS: &[&str] = &["telegram", "terminal"];

fn validate(config: &AppConfig) -> Result<(), Report<ConfigError>> {
    validate_interval(config)?;
    validate_candle_limit(config)?;
    validate_idle_seconds(config)?;
    validate_notifier_kind(config)?;
    Ok(())
}

fn validate_interval(config: &AppConfig) -> Result<(), Report<ConfigError>> {
    if config.market.timeframe().is_none() {
        return Err(Report::new(ConfigError::Validation {
            field: format!(
                "market.interval: unknown timeframe \"{}\"",
                config.market.interval
            ),
        }));
    }
    Ok(())
}

fn validate_candle_limit(config: &AppConfig) -> Result<(), Report<ConfigError>> {
    if config.market.candle_limit < MIN_CANDLES {
        return Err(Report::new(ConfigError::Validation {
            field: format!(
                "market.candle_limit: {} is below the indicator warm-up of {}",
                config.market.candle_limit, MIN_CANDLES
            ),
        }));
    }
    Ok(())
}

fn validate_idle_seconds(config: &AppConfig) -> Result<(), Report<ConfigError>> {
    if config.scheduler.idle_seconds == 0 {
        return Err(Report::new(ConfigError::Validation {
            field: "scheduler.idle_seconds: must be > 0".into(),
        }));
    }
    Ok(())
}

fn validate_notifier_kind(config: &AppConfig) -> Result<(), Report<ConfigError>> {
    if !VALID_NOTIFIER_KINDS.contains(&config.notifier.kind.as_str()) {
        return Err(Report::new(ConfigError::Validation {
            field: format!("notifier.kind: \"{}\" is not valid", config.notifier.kind),
        }));
    }
    Ok(())
}

#![forbid(unsafe_code)]

//! Display configuration and environment overrides.
//!
//! Environment variables:
//! - `HANDSET_TICKER_INTERVAL_MS` (u64, 1..=3_600_000)
//! - `HANDSET_TICKER_STEP` (i32, > 0)
//! - `HANDSET_TICKER_ENABLED` (bool)
//! - `HANDSET_TIMER_THREAD_NAME` (string)
//!
//! Unparseable values are reported and the default is kept.

use std::env;
use std::fmt;
use std::time::Duration;

const ENV_TICKER_INTERVAL_MS: &str = "HANDSET_TICKER_INTERVAL_MS";
const ENV_TICKER_STEP: &str = "HANDSET_TICKER_STEP";
const ENV_TICKER_ENABLED: &str = "HANDSET_TICKER_ENABLED";
const ENV_TIMER_THREAD_NAME: &str = "HANDSET_TIMER_THREAD_NAME";

/// Pause between two ticker animation steps.
pub const DEFAULT_TICKER_INTERVAL: Duration = Duration::from_millis(250);
/// Longest accepted pause between ticker steps.
pub const MAX_TICKER_INTERVAL: Duration = Duration::from_secs(60 * 60);
/// Columns the ticker text moves per step.
pub const DEFAULT_TICKER_STEP: i32 = 5;

/// Configuration for one display instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Pause between ticker steps.
    pub ticker_interval: Duration,
    /// Leftward movement per ticker step.
    pub ticker_step: i32,
    /// Start the ticker animator when the display is built.
    pub animate_tickers: bool,
    /// Name of the scheduler worker thread.
    pub timer_thread_name: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            ticker_interval: DEFAULT_TICKER_INTERVAL,
            ticker_step: DEFAULT_TICKER_STEP,
            animate_tickers: true,
            timer_thread_name: "handset-timers".to_string(),
        }
    }
}

/// Configuration parse diagnostics (env + validation).
#[derive(Debug, Clone)]
pub struct DisplayConfigParse {
    pub config: DisplayConfig,
    pub errors: Vec<ConfigError>,
}

/// Configuration error with field context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl ConfigError {
    fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl DisplayConfig {
    /// Parse config from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let parsed = Self::from_env_with_diagnostics();
        for error in &parsed.errors {
            tracing::warn!(field = error.field, value = %error.value, "{}", error.message);
        }
        parsed.config
    }

    /// Parse config from environment variables and return diagnostics.
    #[must_use]
    pub fn from_env_with_diagnostics() -> DisplayConfigParse {
        from_env_with(|key| env::var(key).ok())
    }

    /// Set the ticker step interval.
    #[must_use]
    pub fn with_ticker_interval(mut self, interval: Duration) -> Self {
        self.ticker_interval = interval;
        self
    }

    /// Set the ticker step size.
    #[must_use]
    pub fn with_ticker_step(mut self, step: i32) -> Self {
        self.ticker_step = step;
        self
    }

    /// Disable the ticker animator.
    #[must_use]
    pub fn without_ticker(mut self) -> Self {
        self.animate_tickers = false;
        self
    }

    #[must_use]
    pub fn with_timer_thread_name(mut self, name: impl Into<String>) -> Self {
        self.timer_thread_name = name.into();
        self
    }

    /// Validate config constraints and return all violations.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();
        if self.ticker_interval.is_zero() {
            errors.push(ConfigError::new(
                "ticker_interval",
                format!("{:?}", self.ticker_interval),
                "must be greater than zero",
            ));
        } else if self.ticker_interval > MAX_TICKER_INTERVAL {
            errors.push(ConfigError::new(
                "ticker_interval",
                format!("{:?}", self.ticker_interval),
                "must be at most one hour",
            ));
        }
        if self.ticker_step <= 0 {
            errors.push(ConfigError::new(
                "ticker_step",
                self.ticker_step.to_string(),
                "must be positive",
            ));
        }
        if self.timer_thread_name.is_empty() {
            errors.push(ConfigError::new(
                "timer_thread_name",
                "",
                "must not be empty",
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn from_env_with<F>(mut get: F) -> DisplayConfigParse
where
    F: FnMut(&str) -> Option<String>,
{
    let mut config = DisplayConfig::default();
    let mut errors = Vec::new();

    if let Some(value) = get(ENV_TICKER_INTERVAL_MS) {
        match value.trim().parse::<u64>() {
            Ok(ms) if ms > 0 && Duration::from_millis(ms) <= MAX_TICKER_INTERVAL => {
                config.ticker_interval = Duration::from_millis(ms);
            }
            _ => errors.push(ConfigError::new(
                "ticker_interval",
                value,
                "expected milliseconds in 1..=3600000",
            )),
        }
    }

    if let Some(value) = get(ENV_TICKER_STEP) {
        match value.trim().parse::<i32>() {
            Ok(step) if step > 0 => config.ticker_step = step,
            _ => errors.push(ConfigError::new(
                "ticker_step",
                value,
                "expected positive integer",
            )),
        }
    }

    if let Some(value) = get(ENV_TICKER_ENABLED) {
        match parse_bool(&value) {
            Some(parsed) => config.animate_tickers = parsed,
            None => errors.push(ConfigError::new(
                "animate_tickers",
                value,
                "expected bool (1/0/true/false)",
            )),
        }
    }

    if let Some(value) = get(ENV_TIMER_THREAD_NAME) {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            errors.push(ConfigError::new(
                "timer_thread_name",
                value,
                "must not be empty",
            ));
        } else {
            config.timer_thread_name = trimmed.to_string();
        }
    }

    DisplayConfigParse { config, errors }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

//! Tick loop configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for the fixed-timestep tick loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    /// Target ticks per second.
    pub tick_rate: f64,
    /// Maximum number of ticks to run (0 = unlimited).
    pub max_ticks: u64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_ticks: 0,
        }
    }
}

impl TickConfig {
    /// Parse and validate a configuration from JSON. Missing fields take
    /// their default values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::InvalidTickRate`] if the tick rate is unusable.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Override the tick rate.
    #[must_use]
    pub fn with_tick_rate(mut self, tick_rate: f64) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    /// Override the tick limit.
    #[must_use]
    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    /// Check that the tick rate is a positive finite number whose tick
    /// length fits in a [`Duration`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTickRate`] otherwise.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tick_duration().map(|_| ())
    }

    /// Length of one tick.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTickRate`] if the tick rate is not a
    /// positive finite number or its tick length overflows a [`Duration`].
    pub fn tick_duration(&self) -> Result<Duration, ConfigError> {
        if !(self.tick_rate.is_finite() && self.tick_rate > 0.0) {
            return Err(ConfigError::InvalidTickRate(self.tick_rate));
        }
        Duration::try_from_secs_f64(self.dt())
            .map_err(|_| ConfigError::InvalidTickRate(self.tick_rate))
    }

    /// Seconds per tick.
    #[must_use]
    pub fn dt(&self) -> f64 {
        1.0 / self.tick_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TickConfig::default();
        assert_eq!(config.tick_rate, 60.0);
        assert_eq!(config.max_ticks, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_fills_missing_fields() {
        let config = TickConfig::from_json(r#"{ "max_ticks": 10 }"#).unwrap();
        assert_eq!(config, TickConfig::default().with_max_ticks(10));
    }

    #[test]
    fn test_from_json_full() {
        let config = TickConfig::from_json(r#"{ "tick_rate": 20.0, "max_ticks": 3 }"#).unwrap();
        assert_eq!(config.tick_rate, 20.0);
        assert_eq!(config.max_ticks, 3);
        assert_eq!(config.dt(), 0.05);
    }

    #[test]
    fn test_rejects_non_positive_tick_rate() {
        assert!(matches!(
            TickConfig::from_json(r#"{ "tick_rate": 0.0 }"#),
            Err(ConfigError::InvalidTickRate(rate)) if rate == 0.0
        ));
        assert!(matches!(
            TickConfig::default().with_tick_rate(-5.0).validate(),
            Err(ConfigError::InvalidTickRate(_))
        ));
        assert!(TickConfig::default().with_tick_rate(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_rejects_tick_rate_too_slow_for_duration() {
        let config = TickConfig::default().with_tick_rate(1e-30).with_max_ticks(1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTickRate(rate)) if rate == 1e-30
        ));
        assert!(TickConfig::from_json(r#"{ "tick_rate": 1e-30 }"#).is_err());
    }

    #[test]
    fn test_tick_duration_matches_rate() {
        let config = TickConfig::default().with_tick_rate(4.0);
        assert_eq!(config.tick_duration().unwrap(), Duration::from_millis(250));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            TickConfig::from_json("{ tick_rate: 60 }"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            TickConfig::from_json(r#"{ "tick_rate": "fast" }"#),
            Err(ConfigError::Parse(_))
        ));
    }
}

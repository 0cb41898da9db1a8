//! Handler configuration parsed from environment variables.

use crate::consts::{ENV_MOVE_THROTTLE, ENV_PRIMARY_PANE};
use crate::error::ConfigError;
use crate::pane::PaneId;
use crate::throttle::ThrottleMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    /// How the move gate reopens.
    pub throttle: ThrottleMode,
    /// Pane on which right-clicks may remove graphic marks.
    pub primary_pane: PaneId,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self { throttle: ThrottleMode::default(), primary_pane: PaneId::candle() }
    }
}

impl HandlerConfig {
    /// Build typed handler config from environment variables.
    ///
    /// Optional:
    /// - `OVERLAY_MOVE_THROTTLE`: `in_flight` (default) or `per_frame`
    /// - `OVERLAY_PRIMARY_PANE`: default `candle_pane`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an unknown throttle mode.
    pub fn from_env() -> Result<Self, ConfigError> {
        let throttle = parse_throttle(env_var(ENV_MOVE_THROTTLE).as_deref())?;
        let primary_pane = match env_var(ENV_PRIMARY_PANE) {
            Some(id) if !id.trim().is_empty() => PaneId::new(id.trim()),
            _ => PaneId::candle(),
        };
        Ok(Self { throttle, primary_pane })
    }
}

fn env_var(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(value) => Some(value),
        Err(_) => None,
    }
}

fn parse_throttle(raw: Option<&str>) -> Result<ThrottleMode, ConfigError> {
    match raw.map(str::trim).unwrap_or("in_flight") {
        "in_flight" | "" => Ok(ThrottleMode::InFlight),
        "per_frame" => Ok(ThrottleMode::PerFrame),
        other => Err(ConfigError::InvalidValue {
            var: ENV_MOVE_THROTTLE,
            value: other.to_string(),
            expected: "'in_flight' or 'per_frame'",
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

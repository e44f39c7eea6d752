//! Run configuration
//!
//! Persisted as JSON. Missing fields take their defaults, so a config file
//! only needs to name what it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::sensor::SENSOR_LAYOUT;

/// Simulation parameters for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Field ===
    pub width: f64,
    pub height: f64,
    pub lane_count: usize,

    // === Budgets ===
    /// Run stops after this many ticks
    pub max_ticks: u64,
    /// Run stops after this much simulated time (ms)
    pub max_elapsed_ms: f64,
    /// Simulated time per tick (ms)
    pub tick_ms: f64,

    // === Ego car ===
    pub ego_start_speed: f64,
    pub speed_step: f64,
    pub steer_step: f64,

    // === Traffic ===
    pub traffic_start_speed: f64,
    pub retire_margin: f64,
    pub spawn_speed_coefficient: f64,
    pub spawn_offset_behind: f64,
    pub spawn_offset_ahead: f64,

    // === Cars ===
    /// Footprint height as a fraction of lane height
    pub car_height_ratio: f64,

    // === Sensors ===
    pub sensor_strength: f64,
    /// Number of beams randomly removed at start
    pub sensor_removal: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
            lane_count: LANE_COUNT,

            max_ticks: MAX_TICKS,
            max_elapsed_ms: MAX_ELAPSED_MS,
            tick_ms: TICK_MS,

            ego_start_speed: EGO_START_SPEED,
            speed_step: SPEED_STEP,
            steer_step: STEER_STEP,

            traffic_start_speed: TRAFFIC_START_SPEED,
            retire_margin: RETIRE_MARGIN,
            spawn_speed_coefficient: SPAWN_SPEED_COEFFICIENT,
            spawn_offset_behind: SPAWN_OFFSET_BEHIND,
            spawn_offset_ahead: SPAWN_OFFSET_AHEAD,

            car_height_ratio: CAR_HEIGHT_RATIO,

            sensor_strength: SENSOR_STRENGTH,
            sensor_removal: 0,
        }
    }
}

impl SimConfig {
    /// Default config with a different lane count
    pub fn with_lanes(lane_count: usize) -> Self {
        Self {
            lane_count,
            ..Self::default()
        }
    }

    /// Reject values no run can start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
            ConfigError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(invalid("width", format!("must be positive, got {}", self.width)));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(invalid("height", format!("must be positive, got {}", self.height)));
        }
        if self.lane_count == 0 {
            return Err(invalid("lane_count", "must be at least 1"));
        }
        if self.max_ticks == 0 {
            return Err(invalid("max_ticks", "must be at least 1"));
        }
        if !(self.tick_ms.is_finite() && self.tick_ms > 0.0) {
            return Err(invalid("tick_ms", format!("must be positive, got {}", self.tick_ms)));
        }
        if !(self.max_elapsed_ms.is_finite() && self.max_elapsed_ms > 0.0) {
            return Err(invalid(
                "max_elapsed_ms",
                format!("must be positive, got {}", self.max_elapsed_ms),
            ));
        }
        if !(self.car_height_ratio > 0.0 && self.car_height_ratio <= 1.0) {
            return Err(invalid(
                "car_height_ratio",
                format!("must be in (0, 1], got {}", self.car_height_ratio),
            ));
        }
        if !(self.sensor_strength.is_finite() && self.sensor_strength > 0.0) {
            return Err(invalid(
                "sensor_strength",
                format!("must be positive, got {}", self.sensor_strength),
            ));
        }
        if self.sensor_removal > SENSOR_LAYOUT.len() {
            return Err(invalid(
                "sensor_removal",
                format!(
                    "cannot exceed {} sensors, got {}",
                    SENSOR_LAYOUT.len(),
                    self.sensor_removal
                ),
            ));
        }
        Ok(())
    }

    /// Load from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Malformed config {}: {e}, using defaults", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No config at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Write as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Config saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_lanes() {
        let err = SimConfig::with_lanes(0).validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "lane_count", .. }));
    }

    #[test]
    fn test_rejects_bad_time_budget() {
        for max_elapsed_ms in [f64::NAN, -1.0, 0.0, f64::INFINITY] {
            let config = SimConfig {
                max_elapsed_ms,
                ..SimConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::Invalid {
                    field: "max_elapsed_ms",
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_rejects_excess_sensor_removal() {
        let config = SimConfig {
            sensor_removal: 17,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: SimConfig = serde_json::from_str(r#"{"lane_count": 3}"#).unwrap();
        assert_eq!(config.lane_count, 3);
        assert_eq!(config.width, SCREEN_WIDTH);
        assert_eq!(config.max_ticks, MAX_TICKS);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = SimConfig {
            sensor_removal: 3,
            ..SimConfig::with_lanes(4)
        };
        config.save(&path).unwrap();
        let loaded = SimConfig::load(&path);
        assert_eq!(loaded.lane_count, 4);
        assert_eq!(loaded.sensor_removal, 3);
        assert!((loaded.tick_ms - config.tick_ms).abs() < 1e-9);
    }

    #[test]
    fn test_load_missing_or_malformed_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(SimConfig::load(dir.path().join("missing.json")), SimConfig::default());

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "not json").unwrap();
        assert_eq!(SimConfig::load(&bad), SimConfig::default());
    }
}

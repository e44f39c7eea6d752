//! Error types for the simulation.
//!
//! Only conditions that stop a run from starting (or from continuing
//! deterministically) are errors. Lenient inputs such as unknown action
//! strings or a missing action log never surface here.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the seeded random source.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RngError {
    #[error("RNG not seeded")]
    Unseeded,

    #[error("Cannot choose from an empty collection")]
    EmptyChoice,
}

/// Errors raised while building the road.
#[derive(Debug, Error, PartialEq)]
pub enum RoadError {
    #[error("Lane count must be positive, got {lane_count}")]
    NoLanes { lane_count: usize },

    #[error("Computed lane height {lane_height} is not positive (height {height}, margin {margin})")]
    NonPositiveLaneHeight {
        lane_height: f64,
        height: f64,
        margin: f64,
    },
}

/// Errors raised while loading a car footprint.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("No footprint for car color '{color}'")]
    Missing { color: String },

    #[error("Invalid footprint {width}x{height} for car color '{color}'")]
    Invalid {
        color: String,
        width: f64,
        height: f64,
    },
}

/// Configuration validation and file errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {field} {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("Failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode config: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Action log persistence errors.
#[derive(Debug, Error)]
pub enum ActionLogError {
    #[error("Failed to write action log {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode action log: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Top-level simulation error.
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Rng(#[from] RngError),

    #[error(transparent)]
    Road(#[from] RoadError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    ActionLog(#[from] ActionLogError),
}

/// Result alias for simulation operations.
pub type SimResult<T> = Result<T, SimError>;

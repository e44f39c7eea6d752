//! Race Sim - a deterministic lane-driving simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (road, cars, sensors, tick loop)
//! - `settings`: Data-driven run configuration
//! - `action_log`: Per-tick action recording and replay
//! - `protocol`: Observation contract and decision sources
//! - `runner`: Episode driver

pub mod action_log;
pub mod error;
pub mod protocol;
pub mod runner;
pub mod settings;
pub mod sim;

pub use action_log::{ActionLog, ActionRecord};
pub use error::{ActionLogError, AssetError, ConfigError, RngError, RoadError, SimError};
pub use protocol::{ActionQueue, DecisionSource, Idle, Observation, PredictResponse};
pub use runner::{RunSummary, run_episode};
pub use settings::SimConfig;

use glam::DVec2;

/// 2D vector used for every position and velocity in the simulation
pub type Vector2 = DVec2;

/// Simulation configuration constants
pub mod consts {
    /// Playing field dimensions (pixels)
    pub const SCREEN_WIDTH: f64 = 1600.0;
    pub const SCREEN_HEIGHT: f64 = 1200.0;

    /// Number of parallel lanes
    pub const LANE_COUNT: usize = 5;
    /// Top/bottom margin occupied by the boundary walls
    pub const ROAD_MARGIN: f64 = 40.0;

    /// Tick budget (60 seconds @ 60 ticks per second)
    pub const MAX_TICKS: u64 = 60 * 60;
    /// Simulated time budget (ms)
    pub const MAX_ELAPSED_MS: f64 = 60.0 * 1000.0;
    /// Simulated time per tick (ms)
    pub const TICK_MS: f64 = 1000.0 / 60.0;

    /// Ego starting velocity (pixels/tick)
    pub const EGO_START_SPEED: f64 = 10.0;
    /// Traffic car velocity at creation (overwritten on spawn)
    pub const TRAFFIC_START_SPEED: f64 = 8.0;
    /// Horizontal velocity change per ACCELERATE/DECELERATE
    pub const SPEED_STEP: f64 = 0.1;
    /// Vertical velocity change per STEER_LEFT/STEER_RIGHT
    pub const STEER_STEP: f64 = 0.1;
    /// Car footprint height as a fraction of lane height
    pub const CAR_HEIGHT_RATIO: f64 = 0.8;

    /// Max beam length of a sensor
    pub const SENSOR_STRENGTH: f64 = 1000.0;

    /// Cars further than this past either field edge are retired
    pub const RETIRE_MARGIN: f64 = 1000.0;
    /// Max speed difference of a freshly spawned car relative to ego
    pub const SPAWN_SPEED_COEFFICIENT: f64 = 5.0;
    /// Spawn offsets as a fraction of field width
    pub const SPAWN_OFFSET_BEHIND: f64 = -0.5;
    pub const SPAWN_OFFSET_AHEAD: f64 = 1.5;

    /// Jitter amplitude applied to traffic horizontal velocity each tick
    pub const TRAFFIC_JITTER: f64 = 0.1;
}

/// Rotate a vector by an angle in degrees (counter-clockwise in math
/// coordinates, clockwise on screen where y points down)
#[inline]
pub fn rotate_degrees(v: Vector2, degrees: f64) -> Vector2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vector2::new(cos * v.x - sin * v.y, sin * v.x + cos * v.y)
}

/// Scalar 2D cross product
#[inline]
pub fn cross(a: Vector2, b: Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

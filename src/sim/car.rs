//! Car entity and arcade physics
//!
//! The ego car is the reference frame: it never moves horizontally on
//! screen. Traffic cars move by their velocity relative to the ego car.

use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::road::{Lane, LaneId};
use super::rng::Randomizer;
use crate::Vector2;
use crate::consts::TRAFFIC_JITTER;
use crate::error::{AssetError, RngError};

/// Car paint, also the key for its footprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarColor {
    Yellow,
    Blue,
    Red,
}

impl CarColor {
    /// Colors available to traffic cars
    pub const TRAFFIC: [CarColor; 2] = [CarColor::Blue, CarColor::Red];

    pub fn as_str(&self) -> &'static str {
        match self {
            CarColor::Yellow => "yellow",
            CarColor::Blue => "blue",
            CarColor::Red => "red",
        }
    }
}

/// Collision footprint of a car (pixels)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub width: f64,
    pub height: f64,
}

impl Footprint {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Square stand-in used when no footprint can be loaded
    pub fn placeholder(target_height: f64) -> Self {
        Self::new(target_height, target_height)
    }

    fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Supplies car footprints, e.g. from sprite dimensions
pub trait FootprintSource {
    fn footprint(&self, color: CarColor, target_height: f64) -> Result<Footprint, AssetError>;
}

/// Width/height ratio of the bundled car sprites
pub const SPRITE_ASPECT_RATIO: f64 = 2.0;

/// Footprints matching the bundled sprites scaled to `target_height`
#[derive(Debug, Clone, Copy, Default)]
pub struct SpriteFootprints;

impl FootprintSource for SpriteFootprints {
    fn footprint(&self, _color: CarColor, target_height: f64) -> Result<Footprint, AssetError> {
        Ok(Footprint::new(
            (SPRITE_ASPECT_RATIO * target_height).floor(),
            target_height,
        ))
    }
}

/// Ask `source` for a footprint, degrading to a placeholder on failure
pub fn resolve_footprint(
    source: &dyn FootprintSource,
    color: CarColor,
    target_height: f64,
) -> Footprint {
    let footprint = source.footprint(color, target_height).and_then(|footprint| {
        if footprint.is_valid() {
            Ok(footprint)
        } else {
            Err(AssetError::Invalid {
                color: color.as_str().to_string(),
                width: footprint.width,
                height: footprint.height,
            })
        }
    });

    footprint.unwrap_or_else(|e| {
        log::warn!("Error loading footprint: {e}, using placeholder");
        Footprint::placeholder(target_height)
    })
}

/// Whether a car is under external control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CarRole {
    Ego,
    Traffic,
}

/// Stable identity of a car across pool round trips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CarId(pub u32);

/// A car entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Car {
    pub id: CarId,
    pub role: CarRole,
    pub color: CarColor,
    pub velocity: Vector2,
    /// Lane the car was placed in (bookkeeping only)
    pub lane: Option<LaneId>,
    /// Top-left corner of the bounding box
    pub position: Vector2,
    pub footprint: Footprint,
}

impl Car {
    pub fn new(
        id: CarId,
        role: CarRole,
        color: CarColor,
        velocity: Vector2,
        footprint: Footprint,
    ) -> Self {
        Self {
            id,
            role,
            color,
            velocity,
            lane: None,
            position: Vector2::ZERO,
            footprint,
        }
    }

    #[inline]
    pub fn is_ego(&self) -> bool {
        self.role == CarRole::Ego
    }

    /// Advance one tick relative to the ego car's velocity
    ///
    /// Traffic cars also get a multiplicative speed jitter of
    /// `1 + 0.1 * (u - 0.5)` drawn from `rng`.
    pub fn update(&mut self, ego_velocity: Vector2, rng: &mut Randomizer) -> Result<(), RngError> {
        if self.is_ego() {
            self.position.y += self.velocity.y;
            return Ok(());
        }

        self.position.x += self.velocity.x - ego_velocity.x;
        self.position.y += self.velocity.y;

        let u = rng.random_uniform()? - 0.5;
        let velocity_change = TRAFFIC_JITTER * u + 1.0;
        self.velocity.x *= velocity_change;
        Ok(())
    }

    pub fn speed_up(&mut self, amount: f64) {
        self.velocity.x += amount;
    }

    /// Reduce horizontal speed, never below zero
    pub fn slow_down(&mut self, amount: f64) {
        self.velocity.x = (self.velocity.x - amount).max(0.0);
    }

    /// Drift vertically; negative is left (toward the top of the screen)
    pub fn turn(&mut self, amount: f64) {
        self.velocity.y += amount;
    }

    pub fn bounding_box(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.footprint.width,
            self.footprint.height,
        )
    }

    pub fn center(&self) -> Vector2 {
        self.bounding_box().center()
    }

    /// Put the car at horizontal position `x`, vertically centered in `lane`
    pub fn place_in_lane(&mut self, lane_id: LaneId, lane: &Lane, x: f64) {
        self.position = Vector2::new(x, (lane.center_y() - self.footprint.height / 2.0).floor());
        self.lane = Some(lane_id);
    }

    /// Drop the lane assignment (car leaves the scene)
    pub fn clear_lane(&mut self) {
        self.lane = None;
    }
}

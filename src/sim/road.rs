//! Road model: parallel lanes between two boundary walls

use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::rng::Randomizer;
use crate::consts::ROAD_MARGIN;
use crate::error::{RngError, RoadError};

/// Index of a lane in `Road::lanes` (top to bottom)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LaneId(pub usize);

/// A horizontal band of the road
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    pub y_start: f64,
    pub y_end: f64,
    pub name: String,
}

impl Lane {
    #[inline]
    pub fn center_y(&self) -> f64 {
        (self.y_start + self.y_end) / 2.0
    }
}

/// A track boundary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub rect: Rect,
}

impl Wall {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            rect: Rect::new(x, y, width, height),
        }
    }

    pub fn bounds(&self) -> Rect {
        self.rect
    }
}

/// The playing field. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Road {
    width: f64,
    height: f64,
    margin: f64,
    lane_height: f64,
    lanes: Vec<Lane>,
    walls: [Wall; 2],
}

impl Road {
    /// Split `height` minus the top/bottom margins into `lane_count` equal lanes
    pub fn build(width: f64, height: f64, lane_count: usize) -> Result<Self, RoadError> {
        Self::with_margin(width, height, lane_count, ROAD_MARGIN)
    }

    pub fn with_margin(
        width: f64,
        height: f64,
        lane_count: usize,
        margin: f64,
    ) -> Result<Self, RoadError> {
        if lane_count == 0 {
            return Err(RoadError::NoLanes { lane_count });
        }

        let lane_height = (height - 2.0 * margin) / lane_count as f64;
        if lane_height.is_nan() || lane_height <= 0.0 {
            return Err(RoadError::NonPositiveLaneHeight {
                lane_height,
                height,
                margin,
            });
        }

        let lanes = (0..lane_count)
            .map(|i| {
                let y_start = margin + i as f64 * lane_height;
                Lane {
                    y_start,
                    y_end: y_start + lane_height,
                    name: format!("Lane {}", i + 1),
                }
            })
            .collect();

        let walls = [
            Wall::new(0.0, 0.0, width, margin),
            Wall::new(0.0, height - margin, width, margin),
        ];

        Ok(Self {
            width,
            height,
            margin,
            lane_height,
            lanes,
            walls,
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    pub fn lane_height(&self) -> f64 {
        self.lane_height
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    pub fn lane_ids(&self) -> impl Iterator<Item = LaneId> + '_ {
        (0..self.lanes.len()).map(LaneId)
    }

    pub fn lane(&self, id: LaneId) -> Option<&Lane> {
        self.lanes.get(id.0)
    }

    /// Top and bottom walls
    pub fn walls(&self) -> &[Wall; 2] {
        &self.walls
    }

    pub fn first_lane(&self) -> LaneId {
        LaneId(0)
    }

    pub fn middle_lane(&self) -> LaneId {
        LaneId(self.lanes.len() / 2)
    }

    pub fn last_lane(&self) -> LaneId {
        LaneId(self.lanes.len() - 1)
    }

    pub fn random_lane(&self, rng: &mut Randomizer) -> Result<LaneId, RngError> {
        let u = rng.random_uniform()?;
        let index = ((u * self.lanes.len() as f64) as usize).min(self.lanes.len() - 1);
        Ok(LaneId(index))
    }

    /// Top edge of the first lane
    pub fn y_start(&self) -> f64 {
        self.lanes[0].y_start
    }

    /// Bottom edge of the last lane
    pub fn y_end(&self) -> f64 {
        self.lanes[self.lanes.len() - 1].y_end
    }
}

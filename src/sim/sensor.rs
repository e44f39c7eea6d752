//! Ray-cast range finders mounted on the ego car
//!
//! Each sensor is a fixed-length beam from the ego car's center at a fixed
//! angle. A reference vector `(0, -strength)` rotated by the angle gives the
//! beam, so 90° points forward (+x) and 270° points back.

use serde::{Deserialize, Serialize};

use super::car::{Car, CarId};
use super::geometry::{Line, Rect, nearest_hit};
use super::rng::Randomizer;
use super::road::Wall;
use crate::error::RngError;
use crate::{Vector2, rotate_degrees};

/// Default beam layout: (angle in degrees, name)
pub const SENSOR_LAYOUT: [(f64, &str); 16] = [
    (90.0, "front"),
    (135.0, "right_front"),
    (180.0, "right_side"),
    (225.0, "right_back"),
    (270.0, "back"),
    (315.0, "left_back"),
    (0.0, "left_side"),
    (45.0, "left_front"),
    (22.5, "left_side_front"),
    (67.5, "front_left_front"),
    (112.5, "front_right_front"),
    (157.5, "right_side_front"),
    (202.5, "right_side_back"),
    (247.5, "back_right_back"),
    (292.5, "back_left_back"),
    (337.5, "left_side_back"),
];

/// A single range finder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    /// Car the sensor is mounted on
    pub car: CarId,
    pub angle_degrees: f64,
    pub name: String,
    /// Beam length
    pub strength: f64,
    pub beam_start: Vector2,
    pub beam_end: Vector2,
    /// Distance to the nearest obstacle, `None` if nothing is in range
    pub reading: Option<f64>,
}

impl Sensor {
    pub fn new(car: CarId, angle_degrees: f64, name: impl Into<String>, strength: f64) -> Self {
        Self {
            car,
            angle_degrees,
            name: name.into(),
            strength,
            beam_start: Vector2::ZERO,
            beam_end: rotate_degrees(Vector2::new(0.0, -strength), angle_degrees),
            reading: None,
        }
    }

    pub fn beam(&self) -> Line {
        Line::new(self.beam_start, self.beam_end)
    }

    /// Re-anchor the beam on `ego` and measure against traffic and walls
    pub fn update<'a>(&mut self, ego: &Car, cars: impl IntoIterator<Item = &'a Car>, walls: &[Wall]) {
        let center = ego.center();
        self.beam_start = center;
        self.beam_end = center + rotate_degrees(Vector2::new(0.0, -self.strength), self.angle_degrees);

        let beam = self.beam();
        let obstacles = cars
            .into_iter()
            .filter(|car| car.id != ego.id)
            .map(Car::bounding_box)
            .chain(walls.iter().map(Wall::bounds));

        self.reading = self.closest(&beam, center, obstacles);
    }

    fn closest(
        &self,
        beam: &Line,
        origin: Vector2,
        obstacles: impl Iterator<Item = Rect>,
    ) -> Option<f64> {
        obstacles
            .filter_map(|bounds| nearest_hit(beam, &bounds, origin))
            .filter(|distance| (0.0..=self.strength).contains(distance))
            .min_by(f64::total_cmp)
    }
}

/// Build the sensor suite for `car`, removing `removal` random beams
pub fn build_sensor_array(
    car: CarId,
    strength: f64,
    removal: usize,
    rng: &mut Randomizer,
) -> Result<Vec<Sensor>, RngError> {
    let mut options: Vec<(f64, &str)> = SENSOR_LAYOUT.to_vec();
    for _ in 0..removal.min(SENSOR_LAYOUT.len()) {
        let index = rng.random_index(options.len())?;
        let (_, name) = options.remove(index);
        log::debug!("Removed sensor {name}");
    }

    Ok(options
        .into_iter()
        .map(|(angle, name)| Sensor::new(car, angle, name, strength))
        .collect())
}

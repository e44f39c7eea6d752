//! Simulation state and construction
//!
//! One `SimulationState` per run. It owns its road, cars, sensors and RNG
//! stream, so independent runs never share anything.

use serde::Serialize;

use super::car::{Car, CarColor, CarId, CarRole, FootprintSource, SpriteFootprints, resolve_footprint};
use super::road::{LaneId, Road};
use super::rng::{Randomizer, Seed};
use super::sensor::{Sensor, build_sensor_array};
use super::tick::Action;
use crate::Vector2;
use crate::error::SimResult;
use crate::runner::RunSummary;
use crate::settings::SimConfig;

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize)]
pub enum SimPhase {
    /// Accepting ticks
    Running,
    /// Ego hit a car or wall
    Crashed,
    /// Tick or simulated-time budget used up
    TimedOut,
}

impl SimPhase {
    pub fn is_terminal(&self) -> bool {
        *self != SimPhase::Running
    }
}

/// Complete state of one run (deterministic given seed and actions)
#[derive(Debug, Clone, Serialize)]
pub struct SimulationState {
    pub config: SimConfig,
    pub seed: Seed,
    /// Random stream for this run only
    #[serde(skip)]
    pub(crate) rng: Randomizer,
    pub road: Road,
    pub ego: Car,
    /// Active traffic cars, in placement order
    pub traffic: Vec<Car>,
    /// Inactive traffic cars awaiting placement
    pub pool: Vec<Car>,
    pub sensors: Vec<Sensor>,
    pub ticks: u64,
    /// Simulated time (ms)
    pub elapsed_ms: f64,
    /// Accumulated ego horizontal travel
    pub distance: f64,
    pub crashed: bool,
    pub phase: SimPhase,
    pub latest_action: Action,
}

impl SimulationState {
    /// Build a run using the bundled sprite footprints
    pub fn new(config: SimConfig, seed: impl Into<Seed>) -> SimResult<Self> {
        Self::with_footprints(config, seed, &SpriteFootprints)
    }

    /// Build a run, sizing cars from `footprints`
    pub fn with_footprints(
        config: SimConfig,
        seed: impl Into<Seed>,
        footprints: &dyn FootprintSource,
    ) -> SimResult<Self> {
        config.validate()?;
        let seed = seed.into();
        let mut rng = Randomizer::seeded(seed.clone());

        let road = Road::build(config.width, config.height, config.lane_count)?;
        let target_height = (road.lane_height() * config.car_height_ratio).floor();

        let mut ego = Car::new(
            CarId(0),
            CarRole::Ego,
            CarColor::Yellow,
            Vector2::new(config.ego_start_speed, 0.0),
            resolve_footprint(footprints, CarColor::Yellow, target_height),
        );
        let ego_lane = road.middle_lane();
        let ego_x = (config.width / 2.0).floor() - (ego.footprint.width / 2.0).floor();
        if let Some(lane) = road.lane(ego_lane) {
            ego.place_in_lane(ego_lane, lane, ego_x);
        }

        let sensors = build_sensor_array(
            ego.id,
            config.sensor_strength,
            config.sensor_removal,
            &mut rng,
        )?;

        let mut pool = Vec::with_capacity(config.lane_count.saturating_sub(1));
        for i in 1..config.lane_count {
            let color = *rng.random_choice(&CarColor::TRAFFIC)?;
            pool.push(Car::new(
                CarId(i as u32),
                CarRole::Traffic,
                color,
                Vector2::new(config.traffic_start_speed, 0.0),
                resolve_footprint(footprints, color, target_height),
            ));
        }

        log::info!(
            "New run: seed {seed}, {} lanes, {} sensors, {} pooled cars",
            road.lane_count(),
            sensors.len(),
            pool.len()
        );

        Ok(Self {
            config,
            seed,
            rng,
            road,
            ego,
            traffic: Vec::new(),
            pool,
            sensors,
            ticks: 0,
            elapsed_ms: 0.0,
            distance: 0.0,
            crashed: false,
            phase: SimPhase::Running,
            latest_action: Action::Nothing,
        })
    }

    pub fn is_running(&self) -> bool {
        self.phase == SimPhase::Running
    }

    /// Ego followed by active traffic
    pub fn active_cars(&self) -> impl Iterator<Item = &Car> {
        std::iter::once(&self.ego).chain(self.traffic.iter())
    }

    pub fn active_count(&self) -> usize {
        1 + self.traffic.len()
    }

    /// Traffic cars active or pooled; fixed for the whole run
    pub fn traffic_total(&self) -> usize {
        self.traffic.len() + self.pool.len()
    }

    /// Lanes currently held by active traffic
    pub fn occupied_lanes(&self) -> Vec<LaneId> {
        self.traffic.iter().filter_map(|car| car.lane).collect()
    }

    pub fn sensor(&self, name: &str) -> Option<&Sensor> {
        self.sensors.iter().find(|s| s.name == name)
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            phase: self.phase,
            ticks: self.ticks,
            elapsed_ms: self.elapsed_ms,
            distance: self.distance,
        }
    }
}

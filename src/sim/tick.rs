//! Fixed-step simulation tick
//!
//! One tick consumes one action and runs, in order: apply action, accumulate
//! distance, move cars, retire off-field cars, spawn from the pool, refresh
//! sensors, check collisions, check budgets.

use serde::{Deserialize, Serialize};

use super::geometry::intersects;
use super::road::LaneId;
use super::state::{SimPhase, SimulationState};
use crate::Vector2;
use crate::error::SimResult;

/// Driving command for a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Action {
    Accelerate,
    Decelerate,
    SteerLeft,
    SteerRight,
    #[default]
    Nothing,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Accelerate,
        Action::Decelerate,
        Action::SteerLeft,
        Action::SteerRight,
        Action::Nothing,
    ];

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Accelerate => "ACCELERATE",
            Action::Decelerate => "DECELERATE",
            Action::SteerLeft => "STEER_LEFT",
            Action::SteerRight => "STEER_RIGHT",
            Action::Nothing => "NOTHING",
        }
    }

    /// Exact, case-sensitive parse
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == s)
    }

    /// Lenient parse: anything unrecognized is `Nothing`
    pub fn from_wire(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }
}

impl From<String> for Action {
    fn from(value: String) -> Self {
        Self::from_wire(&value)
    }
}

impl From<Action> for String {
    fn from(value: Action) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a spawned car enters relative to the visible field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpawnSide {
    /// Enters from the left, faster than ego
    Behind,
    /// Enters from the right, slower than ego
    Ahead,
}

impl SimulationState {
    /// Advance the run by one tick. Terminal states ignore further ticks.
    pub fn tick(&mut self, action: Action) -> SimResult<SimPhase> {
        if self.phase.is_terminal() {
            return Ok(self.phase);
        }

        self.ticks += 1;
        self.elapsed_ms += self.config.tick_ms;
        self.latest_action = action;

        self.apply_action(action);
        self.distance += self.ego.velocity.x;
        self.update_cars()?;
        self.retire_passed_cars();
        self.place_car()?;
        self.update_sensors();

        if self.detect_collision() {
            self.crashed = true;
            self.phase = SimPhase::Crashed;
            log::info!("Crashed at tick {} (distance {:.1})", self.ticks, self.distance);
        } else if self.budget_exhausted() {
            self.phase = SimPhase::TimedOut;
            log::info!("Timed out at tick {} ({:.0} ms)", self.ticks, self.elapsed_ms);
        }

        Ok(self.phase)
    }

    /// Tick with a wire action string
    pub fn tick_wire(&mut self, action: &str) -> SimResult<SimPhase> {
        self.tick(Action::from_wire(action))
    }

    fn apply_action(&mut self, action: Action) {
        let speed = self.config.speed_step;
        let steer = self.config.steer_step;
        match action {
            Action::Accelerate => self.ego.speed_up(speed),
            Action::Decelerate => self.ego.slow_down(speed),
            Action::SteerLeft => self.ego.turn(-steer),
            Action::SteerRight => self.ego.turn(steer),
            Action::Nothing => {}
        }
    }

    fn update_cars(&mut self) -> SimResult<()> {
        let ego_velocity = self.ego.velocity;
        self.ego.update(ego_velocity, &mut self.rng)?;
        for car in &mut self.traffic {
            car.update(ego_velocity, &mut self.rng)?;
        }
        Ok(())
    }

    /// Move cars far past either edge of the field back into the pool
    fn retire_passed_cars(&mut self) {
        let min_x = -self.config.retire_margin;
        let max_x = self.config.width + self.config.retire_margin;

        let (retired, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.traffic)
            .into_iter()
            .partition(|car| car.position.x < min_x || car.position.x > max_x);

        self.traffic = kept;
        for mut car in retired {
            log::debug!("Retired car {:?} at x={:.1}", car.id, car.position.x);
            car.clear_lane();
            self.pool.push(car);
        }
    }

    /// Place one pooled car in a free lane if the scene is below capacity
    fn place_car(&mut self) -> SimResult<()> {
        if self.active_count() >= self.road.lane_count() || self.pool.is_empty() {
            return Ok(());
        }

        let occupied = self.occupied_lanes();
        let open: Vec<LaneId> = self
            .road
            .lane_ids()
            .filter(|id| !occupied.contains(id))
            .collect();
        if open.is_empty() {
            return Ok(());
        }

        let lane_id = *self.rng.random_choice(&open)?;
        let side = *self.rng.random_choice(&[SpawnSide::Behind, SpawnSide::Ahead])?;
        let speed_delta = self.rng.random_uniform()? * self.config.spawn_speed_coefficient;

        let Some(mut car) = self.pool.pop() else {
            return Ok(());
        };

        let (offset, velocity_x) = match side {
            SpawnSide::Behind => (
                self.config.spawn_offset_behind,
                self.ego.velocity.x + speed_delta,
            ),
            SpawnSide::Ahead => (
                self.config.spawn_offset_ahead,
                self.ego.velocity.x - speed_delta,
            ),
        };
        car.velocity = Vector2::new(velocity_x, 0.0);

        let x = self.config.width * offset - (car.footprint.width / 2.0).floor();
        if let Some(lane) = self.road.lane(lane_id) {
            car.place_in_lane(lane_id, lane, x);
        }
        log::debug!(
            "Placed car {:?} in {:?} ({side:?}) at vx={velocity_x:.2}",
            car.id,
            lane_id
        );
        self.traffic.push(car);
        Ok(())
    }

    fn update_sensors(&mut self) {
        let walls = self.road.walls();
        for sensor in &mut self.sensors {
            sensor.update(&self.ego, &self.traffic, walls);
        }
    }

    /// Ego overlapping any traffic car or wall
    pub fn detect_collision(&self) -> bool {
        let ego_box = self.ego.bounding_box();
        self.traffic
            .iter()
            .any(|car| intersects(&ego_box, &car.bounding_box()))
            || self
                .road
                .walls()
                .iter()
                .any(|wall| intersects(&ego_box, &wall.bounds()))
    }

    fn budget_exhausted(&self) -> bool {
        self.ticks >= self.config.max_ticks || self.elapsed_ms >= self.config.max_elapsed_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SimConfig;

    fn new_state(seed: &str) -> SimulationState {
        SimulationState::new(SimConfig::default(), seed).unwrap()
    }

    #[test]
    fn test_action_wire_names() {
        for action in Action::ALL {
            assert_eq!(Action::parse(action.as_str()), Some(action));
        }
        assert_eq!(Action::from_wire("accelerate"), Action::Nothing);
        assert_eq!(Action::from_wire("JUMP"), Action::Nothing);
    }

    #[test]
    fn test_action_serde() {
        let json = serde_json::to_string(&[Action::SteerLeft, Action::Nothing]).unwrap();
        assert_eq!(json, r#"["STEER_LEFT","NOTHING"]"#);
        let parsed: Vec<Action> = serde_json::from_str(r#"["ACCELERATE","WARP"]"#).unwrap();
        assert_eq!(parsed, vec![Action::Accelerate, Action::Nothing]);
    }

    #[test]
    fn test_accelerate_then_steer_left() {
        let mut state = new_state("test-1");
        let initial = state.ego.velocity;
        for _ in 0..5 {
            state.tick(Action::Accelerate).unwrap();
        }
        for _ in 0..3 {
            state.tick(Action::SteerLeft).unwrap();
        }
        assert_eq!(state.ticks, 8);
        assert!(state.ego.velocity.x > initial.x);
        assert!(state.ego.velocity.y < initial.y);
        assert_eq!(state.phase, SimPhase::Running);
    }

    #[test]
    fn test_distance_accumulates_ego_speed() {
        let mut state = new_state("distance");
        state.tick(Action::Nothing).unwrap();
        state.tick(Action::Accelerate).unwrap();
        assert!((state.distance - 20.1).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_action_is_noop() {
        let mut state = new_state("noop");
        let before = state.ego.velocity;
        state.tick_wire("HONK").unwrap();
        assert_eq!(state.ego.velocity, before);
        assert_eq!(state.latest_action, Action::Nothing);
    }

    #[test]
    fn test_decelerate_never_reverses() {
        let mut state = new_state("brake");
        state.pool.clear();
        for _ in 0..150 {
            state.tick(Action::Decelerate).unwrap();
        }
        assert_eq!(state.ego.velocity.x, 0.0);
    }

    #[test]
    fn test_spawns_one_car_per_tick_up_to_capacity() {
        let mut state = new_state("spawn");
        state.tick(Action::Nothing).unwrap();
        assert_eq!(state.traffic.len(), 1);
        assert_eq!(state.pool.len(), 3);
        for _ in 0..3 {
            state.tick(Action::Nothing).unwrap();
        }
        assert_eq!(state.active_count(), 5);
        assert!(state.pool.is_empty());
    }

    #[test]
    fn test_spawned_car_placement() {
        let mut state = new_state("placement");
        state.tick(Action::Nothing).unwrap();
        let car = &state.traffic[0];
        let lane = state.road.lane(car.lane.unwrap()).unwrap();
        assert!(car.position.y >= lane.y_start && car.position.y < lane.y_end);
        assert_eq!(car.velocity.y, 0.0);

        let half = (car.footprint.width / 2.0).floor();
        let behind = car.position.x == -800.0 - half;
        let ahead = car.position.x == 2400.0 - half;
        assert!(behind || ahead);
        if behind {
            assert!(car.velocity.x >= state.ego.velocity.x);
        } else {
            assert!(car.velocity.x <= state.ego.velocity.x);
        }
    }

    #[test]
    fn test_retired_car_returns_to_pool() {
        let mut state = new_state("retire");
        state.tick(Action::Nothing).unwrap();
        state.traffic[0].position.x = -5000.0;
        state.tick(Action::Nothing).unwrap();
        assert!(state.traffic.iter().all(|c| c.position.x > -5000.0));
        assert_eq!(state.traffic_total(), 4);
    }

    #[test]
    fn test_retire_clears_lane() {
        let mut state = new_state("retire-lane");
        state.tick(Action::Nothing).unwrap();
        state.traffic[0].position.x = 10_000.0;
        state.retire_passed_cars();
        assert!(state.traffic.is_empty());
        assert_eq!(state.pool.len(), 4);
        assert!(state.pool.iter().all(|c| c.lane.is_none()));
    }

    #[test]
    fn test_empty_pool_is_noop() {
        let mut state = new_state("empty-pool");
        state.pool.clear();
        state.tick(Action::Nothing).unwrap();
        assert!(state.traffic.is_empty());
        assert_eq!(state.phase, SimPhase::Running);
    }

    #[test]
    fn test_wall_overlap_crashes() {
        for action in Action::ALL {
            let mut state = new_state("wall");
            state.ego.position.y = 0.0;
            assert_eq!(state.tick(action).unwrap(), SimPhase::Crashed);
            assert!(state.crashed);
        }
    }

    #[test]
    fn test_car_overlap_crashes() {
        let mut state = new_state("rear-end");
        state.tick(Action::Nothing).unwrap();
        let ego_pos = state.ego.position;
        let car = &mut state.traffic[0];
        car.position = ego_pos;
        car.velocity = state.ego.velocity;
        assert_eq!(state.tick(Action::Nothing).unwrap(), SimPhase::Crashed);
    }

    #[test]
    fn test_terminal_state_halts() {
        let mut state = new_state("halt");
        state.ego.position.y = 0.0;
        state.tick(Action::Nothing).unwrap();
        let snapshot = serde_json::to_string(&state).unwrap();
        assert_eq!(state.tick(Action::Accelerate).unwrap(), SimPhase::Crashed);
        assert_eq!(serde_json::to_string(&state).unwrap(), snapshot);
    }

    #[test]
    fn test_tick_budget_times_out() {
        let config = SimConfig {
            max_ticks: 3,
            ..SimConfig::default()
        };
        let mut state = SimulationState::new(config, "budget").unwrap();
        assert_eq!(state.tick(Action::Nothing).unwrap(), SimPhase::Running);
        assert_eq!(state.tick(Action::Nothing).unwrap(), SimPhase::Running);
        assert_eq!(state.tick(Action::Nothing).unwrap(), SimPhase::TimedOut);
        assert_eq!(state.tick(Action::Nothing).unwrap(), SimPhase::TimedOut);
        assert_eq!(state.ticks, 3);
    }

    #[test]
    fn test_time_budget_times_out() {
        let config = SimConfig {
            max_elapsed_ms: 100.0,
            tick_ms: 40.0,
            ..SimConfig::default()
        };
        let mut state = SimulationState::new(config, "clock").unwrap();
        state.tick(Action::Nothing).unwrap();
        state.tick(Action::Nothing).unwrap();
        assert_eq!(state.tick(Action::Nothing).unwrap(), SimPhase::TimedOut);
        assert_eq!(state.elapsed_ms, 120.0);
    }

    #[test]
    fn test_sensors_refresh_each_tick() {
        let mut state = new_state("sensors");
        state.tick(Action::Nothing).unwrap();
        let center = state.ego.center();
        assert!(state.sensors.iter().all(|s| s.beam_start == center));
        // Lateral beams reach the walls from the middle lane
        let left = state.sensor("left_side").unwrap();
        assert!(left.reading.is_some());
    }
}

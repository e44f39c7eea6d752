//! Observation contract and decision sources
//!
//! The engine asks a `DecisionSource` for one action per tick. Remote
//! policies answer with batches of actions (`PredictResponse`) which
//! `ActionQueue` hands out one tick at a time.

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::Vector2;
use crate::sim::{Action, SimulationState};

/// What a decision source sees before each tick. Serializes as the remote
/// prediction request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub did_crash: bool,
    pub elapsed_time_ms: i64,
    pub distance: i64,
    pub velocity: BTreeMap<String, i64>,
    pub coordinates: BTreeMap<String, i64>,
    pub sensors: BTreeMap<String, Option<i64>>,
}

fn xy(v: Vector2) -> BTreeMap<String, i64> {
    BTreeMap::from([
        ("x".to_string(), v.x.round() as i64),
        ("y".to_string(), v.y.round() as i64),
    ])
}

impl From<&SimulationState> for Observation {
    fn from(state: &SimulationState) -> Self {
        Self {
            did_crash: state.crashed,
            elapsed_time_ms: state.elapsed_ms.round() as i64,
            distance: state.distance.round() as i64,
            velocity: xy(state.ego.velocity),
            coordinates: xy(state.ego.position),
            sensors: state
                .sensors
                .iter()
                .map(|s| (s.name.clone(), s.reading.map(|r| r.round() as i64)))
                .collect(),
        }
    }
}

impl SimulationState {
    pub fn observation(&self) -> Observation {
        Observation::from(self)
    }
}

/// Remote policy answer: actions to play one per tick
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub actions: Vec<Action>,
}

/// Supplies the next action (keyboard, replay, remote policy...)
pub trait DecisionSource {
    /// `tick` is the number of the tick about to run (first tick is 1)
    fn next_action(&mut self, tick: u64, observation: &Observation) -> Action;
}

/// Always `NOTHING`
#[derive(Debug, Clone, Copy, Default)]
pub struct Idle;

impl DecisionSource for Idle {
    fn next_action(&mut self, _tick: u64, _observation: &Observation) -> Action {
        Action::Nothing
    }
}

/// Buffers action batches from a policy and plays them back one per tick
pub struct ActionQueue<P> {
    policy: P,
    pending: VecDeque<Action>,
}

impl<P> ActionQueue<P>
where
    P: FnMut(&Observation) -> PredictResponse,
{
    pub fn new(policy: P) -> Self {
        Self {
            policy,
            pending: VecDeque::new(),
        }
    }

    /// Actions left from the current batch
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl<P> DecisionSource for ActionQueue<P>
where
    P: FnMut(&Observation) -> PredictResponse,
{
    fn next_action(&mut self, tick: u64, observation: &Observation) -> Action {
        if self.pending.is_empty() {
            let batch = (self.policy)(observation);
            if batch.actions.is_empty() {
                log::warn!("Policy returned no actions at tick {tick}");
            }
            self.pending.extend(batch.actions);
        }
        self.pending.pop_front().unwrap_or_default()
    }
}

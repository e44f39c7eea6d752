//! Episode driver

use serde::{Deserialize, Serialize};

use crate::action_log::ActionLog;
use crate::error::SimResult;
use crate::protocol::DecisionSource;
use crate::sim::{SimPhase, SimulationState};

/// Final report of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub phase: SimPhase,
    pub ticks: u64,
    pub elapsed_ms: f64,
    pub distance: f64,
}

/// Tick `state` until it crashes or times out, asking `source` for each action
///
/// When `recorder` is given, every executed tick is appended to it.
pub fn run_episode(
    state: &mut SimulationState,
    source: &mut dyn DecisionSource,
    mut recorder: Option<&mut ActionLog>,
) -> SimResult<RunSummary> {
    while state.is_running() {
        let tick = state.ticks + 1;
        let action = source.next_action(tick, &state.observation());
        if let Some(recorder) = recorder.as_deref_mut() {
            recorder.record(tick, action);
        }
        state.tick(action)?;
    }

    let summary = state.summary();
    log::info!(
        "Game over: crashed: {}, ticks: {}, elapsed time: {:.0} ms, distance: {:.1}",
        summary.phase == SimPhase::Crashed,
        summary.ticks,
        summary.elapsed_ms,
        summary.distance
    );
    Ok(summary)
}

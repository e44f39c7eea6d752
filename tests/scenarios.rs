//! End-to-end driving scenarios

use race_sim::action_log::ActionLog;
use race_sim::sim::{Action, SimPhase, SimulationState};
use race_sim::{Idle, SimConfig, run_episode};

#[test]
fn accelerate_then_steer_left() {
    let mut state = SimulationState::new(SimConfig::with_lanes(5), "test-1").unwrap();
    let initial = state.ego.velocity;

    let script = [[Action::Accelerate; 5].as_slice(), [Action::SteerLeft; 3].as_slice()].concat();
    for action in script {
        state.tick(action).unwrap();
    }

    assert_eq!(state.ticks, 8);
    assert!(state.ego.velocity.x > initial.x);
    assert!(state.ego.velocity.y < initial.y);
}

#[test]
fn ego_inside_wall_crashes_regardless_of_action() {
    for action in Action::ALL {
        let mut state = SimulationState::new(SimConfig::default(), "wall").unwrap();
        let bottom = state.road.walls()[1].rect;
        state.ego.position.y = bottom.y;
        assert_eq!(state.tick(action).unwrap(), SimPhase::Crashed);
        assert!(state.crashed);
        assert!(state.observation().did_crash);
    }
}

#[test]
fn empty_log_replays_nothing_at_tick_42() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("actions_log.json");
    std::fs::write(&path, "").unwrap();
    assert_eq!(ActionLog::replay_action(&path, 42), Action::Nothing);
}

#[test]
fn interleaved_runs_do_not_share_state() {
    let script: Vec<Action> = (0..120).map(|i| Action::ALL[i % Action::ALL.len()]).collect();

    let mut sequential = SimulationState::new(SimConfig::default(), "solo").unwrap();
    for &action in &script {
        sequential.tick(action).unwrap();
    }

    let mut a = SimulationState::new(SimConfig::default(), "solo").unwrap();
    let mut b = SimulationState::new(SimConfig::default(), "other").unwrap();
    for &action in &script {
        a.tick(action).unwrap();
        b.tick(Action::Accelerate).unwrap();
    }

    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&sequential).unwrap()
    );
}

#[test]
fn full_idle_run_terminates_within_budget() {
    let mut state = SimulationState::new(SimConfig::default(), "marathon").unwrap();
    let summary = run_episode(&mut state, &mut Idle, None).unwrap();
    assert!(summary.phase.is_terminal());
    assert!(summary.ticks <= SimConfig::default().max_ticks);
    assert_eq!(state.traffic_total(), 4);
    if summary.phase == SimPhase::TimedOut {
        assert_eq!(summary.ticks, 3600);
    }
}

#[test]
fn recorded_log_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("actions_log.json");
    let config = SimConfig {
        max_ticks: 50,
        ..SimConfig::default()
    };

    let mut recorded = ActionLog::new();
    let mut first = SimulationState::new(config.clone(), 777u64).unwrap();
    let mut steering = race_sim::ActionQueue::new(|_: &race_sim::Observation| {
        race_sim::PredictResponse {
            actions: vec![Action::SteerLeft, Action::Accelerate, Action::SteerRight],
        }
    });
    let expected = run_episode(&mut first, &mut steering, Some(&mut recorded)).unwrap();
    recorded.save(&path).unwrap();

    let mut replay = ActionLog::load(&path);
    let mut second = SimulationState::new(config, "777").unwrap();
    let actual = run_episode(&mut second, &mut replay, None).unwrap();
    assert_eq!(expected, actual);
}

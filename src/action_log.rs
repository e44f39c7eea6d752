//! Per-tick action log
//!
//! Stored as a JSON list of `{"tick": n, "action": "..."}` records. Reading is
//! lenient: a missing, empty or malformed file is an empty log, and any tick
//! without a record replays as `NOTHING`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ActionLogError;
use crate::protocol::{DecisionSource, Observation};
use crate::sim::Action;

/// Default file name used by the binary
pub const DEFAULT_LOG_PATH: &str = "actions_log.json";

/// One executed tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub tick: u64,
    pub action: Action,
}

/// Ordered action history of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionLog {
    pub entries: Vec<ActionRecord>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, tick: u64, action: Action) {
        self.entries.push(ActionRecord { tick, action });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Action recorded for `tick`, `Nothing` if absent
    pub fn action_for(&self, tick: u64) -> Action {
        self.entries
            .iter()
            .find(|entry| entry.tick == tick)
            .map(|entry| entry.action)
            .unwrap_or_default()
    }

    /// Load a log, treating a missing or unreadable file as empty
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(_) => {
                log::info!("No action log at {}, starting empty", path.display());
                return Self::new();
            }
        };

        let records = match serde_json::from_str::<Vec<serde_json::Value>>(&json) {
            Ok(records) => records,
            Err(e) => {
                log::warn!("Malformed action log {}: {e}", path.display());
                return Self::new();
            }
        };

        let mut log = Self::new();
        for (index, record) in records.iter().enumerate() {
            let Some(tick) = record.get("tick").and_then(serde_json::Value::as_u64) else {
                log::warn!(
                    "Skipping action log record {index} in {}: no valid tick",
                    path.display()
                );
                continue;
            };
            // Missing, null and unknown actions all replay as NOTHING
            let action = record
                .get("action")
                .and_then(serde_json::Value::as_str)
                .map(Action::from_wire)
                .unwrap_or_default();
            log.record(tick, action);
        }

        log::info!("Loaded {} actions from {}", log.len(), path.display());
        log
    }

    /// Action for `tick` from the log file at `path`
    pub fn replay_action(path: impl AsRef<Path>, tick: u64) -> Action {
        Self::load(path).action_for(tick)
    }

    /// Write as pretty JSON, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ActionLogError> {
        let path = path.as_ref();
        let write_err = |source: std::io::Error| ActionLogError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(write_err)?;
        log::info!("Action log saved ({} entries)", self.len());
        Ok(())
    }
}

impl DecisionSource for ActionLog {
    fn next_action(&mut self, tick: u64, _observation: &Observation) -> Action {
        self.action_for(tick)
    }
}

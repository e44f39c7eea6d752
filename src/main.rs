//! Race Sim headless entry point
//!
//! Without `--replay` the ego car idles. `--record` writes the executed
//! actions as an action log.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = native::run(native::Args::parse()) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use clap::Parser;
    use race_sim::action_log::ActionLog;
    use race_sim::sim::SimulationState;
    use race_sim::{DecisionSource, Idle, SimConfig, SimError, run_episode};

    /// Headless deterministic driving run
    #[derive(Parser, Debug)]
    #[command(name = "race-sim")]
    #[command(about = "Run a seeded driving simulation headless", long_about = None)]
    pub struct Args {
        /// Seed for the run's random stream
        #[arg(default_value = "12345")]
        pub seed: String,

        /// JSON config file (missing fields take defaults)
        #[arg(long)]
        pub config: Option<PathBuf>,

        /// Action log to replay, one action per tick
        #[arg(long)]
        pub replay: Option<PathBuf>,

        /// Write the executed actions to this action log
        #[arg(long)]
        pub record: Option<PathBuf>,
    }

    pub fn run(args: Args) -> Result<(), SimError> {
        let config = args
            .config
            .as_deref()
            .map(SimConfig::load)
            .unwrap_or_default();

        let mut state = SimulationState::new(config, args.seed)?;
        let mut source: Box<dyn DecisionSource> = match &args.replay {
            Some(path) => Box::new(ActionLog::load(path)),
            None => Box::new(Idle),
        };

        let mut recorded = ActionLog::new();
        let recorder = args.record.is_some().then_some(&mut recorded);
        let summary = run_episode(&mut state, source.as_mut(), recorder)?;

        if let Some(path) = &args.record {
            recorded.save(path)?;
        }

        println!(
            "{}",
            serde_json::json!({
                "crashed": state.crashed,
                "ticks": summary.ticks,
                "elapsed_time_ms": summary.elapsed_ms.round() as i64,
                "distance": summary.distance.round() as i64,
            })
        );
        Ok(())
    }

}

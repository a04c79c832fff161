//! `relic` command-line front end for the relic reward loop.
//!
//! Each invocation runs one command against the save slot and exits.
//!
//! # Startup Sequence
//!
//! 1. Parse the command line
//! 2. Load configuration (`--config`, else `relic-config.yaml`, else defaults)
//! 3. Initialize structured logging (tracing) on stderr
//! 4. Read the platform readiness flag
//! 5. Open the file store and build the engine
//! 6. Run the command at the current wall-clock time and print the result

mod args;
mod error;
mod platform;
mod render;

use std::path::Path;
use std::process::ExitCode;

use relic_core::{EngineSettings, FusionRoll, ProgressionConfig, ProgressionEngine, RngRoll};
use relic_store::{JsonFileStore, StateStore};
use relic_types::Timestamp;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::args::{Command, USAGE};
use crate::error::CliError;
use crate::platform::PlatformStatus;
use crate::render::StatusContext;

/// Default configuration file, looked up in the working directory.
const DEFAULT_CONFIG_PATH: &str = "relic-config.yaml";

fn main() -> ExitCode {
    match run() {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            if matches!(err, CliError::Usage { .. }) {
                eprintln!("{USAGE}");
            }
            if err.is_rejection() {
                ExitCode::from(1)
            } else {
                ExitCode::from(2)
            }
        }
    }
}

fn run() -> Result<String, CliError> {
    // 1. Parse the command line.
    let invocation = args::parse(std::env::args().skip(1))?;
    if invocation.command == Command::Help {
        return Ok(USAGE.to_owned());
    }

    // 2. Load configuration.
    let config = load_config(invocation.config.as_deref())?;

    // 3. Initialize structured logging. Stdout carries command output only.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!(
        storage_dir = %config.storage.dir,
        storage_key = %config.storage.key,
        cooldown_ms = config.claim.cooldown_ms,
        milestone_policy = ?config.milestones.policy,
        "Configuration loaded"
    );

    // 4. Platform readiness is display-only.
    let platform = PlatformStatus::from_env();
    info!(ready = platform.ready, "Platform status read");

    // 5. Build the engine once and pass it down explicitly.
    let settings = EngineSettings::from_config(&config)?;
    let store = JsonFileStore::new(&config.storage.dir);
    let mut engine = ProgressionEngine::open(store, RngRoll::thread(), settings)?;

    // 6. Run the command.
    let now: Timestamp = chrono::Utc::now().timestamp_millis();
    execute(&mut engine, &invocation.command, now, platform)
}

/// Load configuration from an explicit path, the default file, or
/// built-in defaults (with environment overrides) in that order.
fn load_config(explicit: Option<&Path>) -> Result<ProgressionConfig, CliError> {
    if let Some(path) = explicit {
        return Ok(ProgressionConfig::from_file(path)?);
    }
    let default_path = Path::new(DEFAULT_CONFIG_PATH);
    if default_path.exists() {
        Ok(ProgressionConfig::from_file(default_path)?)
    } else {
        debug!("Config file not found, using defaults");
        let mut config = ProgressionConfig::default();
        config.apply_env_overrides();
        Ok(config)
    }
}

/// Run one command against the engine and render its result.
fn execute<S: StateStore, R: FusionRoll>(
    engine: &mut ProgressionEngine<S, R>,
    command: &Command,
    now: Timestamp,
    platform: PlatformStatus,
) -> Result<String, CliError> {
    match command {
        Command::Status { json: true } => Ok(serde_json::to_string_pretty(&engine.snapshot(now)?)?),
        Command::Status { json: false } => {
            let ctx = StatusContext {
                until_claim_ms: engine.time_until_claim(now),
                streak_status: engine.streak_status(now)?,
                platform,
            };
            Ok(render::status(&engine.snapshot(now)?, ctx))
        }
        Command::Claim => Ok(render::claim(&engine.claim_relic(now)?)),
        Command::Puzzle { taps } => {
            let mut puzzle = engine.new_puzzle();
            puzzle.tap_all(taps.iter().copied());
            Ok(render::bonus("puzzle", &engine.solve_puzzle(&puzzle, now)?))
        }
        Command::Social => Ok(render::bonus("social bonus", &engine.claim_social_bonus(now)?)),
        Command::Upgrade { ids } => Ok(render::fusion(&engine.upgrade_relics(ids, now)?)),
        Command::Countdown => Ok(render::countdown(engine.time_until_claim(now))),
        Command::Help => Ok(USAGE.to_owned()),
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use relic_core::{ProgressionError, ScriptedRoll};
    use relic_store::MemoryStore;

    use super::*;

    /// 2026-10-16T10:00:00Z.
    const NOW: Timestamp = 1_792_108_800_000 + 10 * 3_600_000;

    fn engine() -> ProgressionEngine<MemoryStore, ScriptedRoll> {
        ProgressionEngine::open(
            MemoryStore::new(),
            ScriptedRoll::always(0.0),
            EngineSettings::default(),
        )
        .unwrap()
    }

    fn run_cmd(
        engine: &mut ProgressionEngine<MemoryStore, ScriptedRoll>,
        command: &Command,
    ) -> Result<String, CliError> {
        execute(engine, command, NOW, PlatformStatus::default())
    }

    #[test]
    fn claim_then_countdown() {
        let mut engine = engine();
        assert_eq!(run_cmd(&mut engine, &Command::Countdown).unwrap(), "ready");
        assert_eq!(
            run_cmd(&mut engine, &Command::Claim).unwrap(),
            "Claimed! Streak: 1"
        );
        assert_eq!(
            run_cmd(&mut engine, &Command::Countdown).unwrap(),
            "12:00:00"
        );

        let err = run_cmd(&mut engine, &Command::Claim).unwrap_err();
        assert_eq!(err.to_string(), "Too early to claim.");
        assert!(err.is_rejection());
    }

    #[test]
    fn puzzle_command_replays_taps() {
        let mut engine = engine();
        let wrong = Command::Puzzle {
            taps: vec![1, 2, 4],
        };
        assert!(matches!(
            run_cmd(&mut engine, &wrong),
            Err(CliError::Progression {
                source: ProgressionError::PuzzleUnsolved
            })
        ));

        let right = Command::Puzzle {
            taps: vec![2, 1, 2, 3, 4],
        };
        assert_eq!(
            run_cmd(&mut engine, &right).unwrap(),
            "puzzle complete: +2 relics"
        );
        assert_eq!(
            run_cmd(&mut engine, &right).unwrap(),
            "puzzle already claimed"
        );
    }

    #[test]
    fn upgrade_command_fuses_commons() {
        let mut engine = engine();
        run_cmd(&mut engine, &Command::Social).unwrap();
        run_cmd(&mut engine, &Command::Claim).unwrap();
        let ids = engine.state().relics.iter().map(|r| r.id).collect();

        let text = run_cmd(&mut engine, &Command::Upgrade { ids }).unwrap();
        assert!(text.starts_with("Upgrade Successful! L1 "));
        assert_eq!(engine.state().relic_count(), 1);
    }

    #[test]
    fn status_json_is_the_camel_case_blob() {
        let mut engine = engine();
        run_cmd(&mut engine, &Command::Claim).unwrap();
        let json = run_cmd(&mut engine, &Command::Status { json: true }).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["streak"], 1);
        assert_eq!(value["lastClaimTime"], NOW);
    }

    #[test]
    fn status_text_shows_streak() {
        let mut engine = engine();
        run_cmd(&mut engine, &Command::Claim).unwrap();
        let text = run_cmd(&mut engine, &Command::Status { json: false }).unwrap();
        assert!(text.contains("streak: 1 (active)"));
        assert!(text.contains("platform: waiting"));
        assert!(text.contains("relics: 1"));
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let err = load_config(Some(Path::new("/nonexistent/relic-config.yaml"))).unwrap_err();
        assert!(matches!(err, CliError::Config { .. }));
        assert!(!err.is_rejection());
    }
}

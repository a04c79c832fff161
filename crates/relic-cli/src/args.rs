//! Command-line parsing.
//!
//! ```text
//! relic [--config PATH] <command>
//!
//!   status [--json]        show inventory, streak and timers
//!   claim                  claim the timed relic
//!   puzzle <tap>...        submit the daily puzzle taps in order
//!   social                 claim the one-time social bonus
//!   upgrade <id> <id>...   fuse two or more same-level relics
//!   countdown              time until the next claim
//! ```

use std::path::PathBuf;

use relic_types::RelicId;

use crate::error::CliError;

/// Usage text printed on `--help` and after a usage error.
pub const USAGE: &str = "\
usage: relic [--config PATH] <command>

commands:
  status [--json]        show inventory, streak and timers
  claim                  claim the timed relic
  puzzle <tap>...        submit the daily puzzle taps in order
  social                 claim the one-time social bonus
  upgrade <id> <id>...   fuse two or more same-level relics
  countdown              time until the next claim";

/// A parsed subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the current state.
    Status {
        /// Dump the raw state as JSON instead of a summary.
        json: bool,
    },
    /// Claim the timed relic.
    Claim,
    /// Submit puzzle taps.
    Puzzle {
        /// Node numbers in the order they were tapped.
        taps: Vec<u8>,
    },
    /// Claim the social bonus.
    Social,
    /// Fuse relics.
    Upgrade {
        /// Relics to burn.
        ids: Vec<RelicId>,
    },
    /// Show the claim countdown.
    Countdown,
    /// Print usage.
    Help,
}

/// Everything parsed from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Explicit `--config` path, if given.
    pub config: Option<PathBuf>,
    /// The subcommand to run.
    pub command: Command,
}

/// Parse arguments (without the program name).
pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Invocation, CliError> {
    let mut args = args.into_iter();
    let mut config = None;

    let name = loop {
        match args.next() {
            Some(flag) if flag == "--config" => {
                let path = args
                    .next()
                    .ok_or_else(|| CliError::usage("--config needs a path"))?;
                config = Some(PathBuf::from(path));
            }
            Some(flag) if flag == "-h" || flag == "--help" => {
                return Ok(Invocation {
                    config,
                    command: Command::Help,
                });
            }
            Some(name) => break name,
            None => return Err(CliError::usage("missing command")),
        }
    };

    let rest: Vec<String> = args.collect();
    let command = match name.as_str() {
        "status" => parse_status(&rest)?,
        "claim" => no_args(Command::Claim, &name, &rest)?,
        "social" => no_args(Command::Social, &name, &rest)?,
        "countdown" => no_args(Command::Countdown, &name, &rest)?,
        "help" => Command::Help,
        "puzzle" => Command::Puzzle {
            taps: parse_taps(&rest)?,
        },
        "upgrade" => Command::Upgrade {
            ids: parse_ids(&rest)?,
        },
        other => return Err(CliError::usage(format!("unknown command `{other}`"))),
    };

    Ok(Invocation { config, command })
}

fn parse_status(rest: &[String]) -> Result<Command, CliError> {
    match rest {
        [] => Ok(Command::Status { json: false }),
        [flag] if flag == "--json" => Ok(Command::Status { json: true }),
        _ => Err(CliError::usage("status takes only --json")),
    }
}

fn no_args(command: Command, name: &str, rest: &[String]) -> Result<Command, CliError> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(CliError::usage(format!("{name} takes no arguments")))
    }
}

fn parse_taps(rest: &[String]) -> Result<Vec<u8>, CliError> {
    if rest.is_empty() {
        return Err(CliError::usage("puzzle needs at least one tap"));
    }
    rest.iter()
        .map(|tap| {
            tap.parse::<u8>()
                .map_err(|e| CliError::usage(format!("bad tap `{tap}`: {e}")))
        })
        .collect()
}

/// Fewer than two ids is left for the engine to reject so the player
/// sees the same message as every other front end.
fn parse_ids(rest: &[String]) -> Result<Vec<RelicId>, CliError> {
    rest.iter()
        .map(|id| {
            id.parse::<RelicId>()
                .map_err(|e| CliError::usage(format!("bad relic id `{id}`: {e}")))
        })
        .collect()
}

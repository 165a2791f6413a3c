#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a headless Balcony Repair match.

mod config;
mod session;

use std::{path::PathBuf, time::Duration};

use anyhow::{bail, ensure, Context, Result};
use balcony_core::{MatchSummary, PlayerRole, ScoringMode, Tuning, WELCOME_BANNER};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use session::{Outcome, Session};

/// Balcony Repair: two players racing to restore a crumbling balcony.
#[derive(Parser, Debug)]
#[command(name = "balcony-repair", version, about, long_about = None)]
struct Args {
    /// TOML tuning file; missing keys keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for every random decision of the match
    #[arg(long)]
    seed: Option<u64>,

    /// How end-of-match scores are computed
    #[arg(long, value_enum)]
    scoring: Option<Scoring>,

    /// Give up after this many simulated seconds
    #[arg(long, default_value_t = 1_800)]
    max_seconds: u64,

    /// Simulated milliseconds per frame
    #[arg(long, default_value_t = 100)]
    frame_ms: u64,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Log routine transitions as well
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Scoring {
    WastePenalty,
    Contribution,
}

impl From<Scoring> for ScoringMode {
    fn from(value: Scoring) -> Self {
        match value {
            Scoring::WastePenalty => Self::WastePenalty,
            Scoring::Contribution => Self::Contribution,
        }
    }
}

impl Args {
    fn tuning(&self) -> Result<Tuning> {
        let mut tuning = match &self.config {
            Some(path) => config::load(path)?,
            None => Tuning::default(),
        };
        if let Some(seed) = self.seed {
            tuning.seed = seed;
        }
        if let Some(scoring) = self.scoring {
            tuning.scoring = scoring.into();
        }
        config::validate(&tuning).context("invalid tuning after applying flags")?;
        Ok(tuning)
    }
}

#[derive(Serialize)]
struct Report<'a> {
    summary: &'a MatchSummary,
    formatted_time: String,
    frames: u64,
}

/// Entry point for the Balcony Repair command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let tuning = args.tuning()?;
    ensure!(args.frame_ms > 0, "--frame-ms must be positive");
    let frame = Duration::from_millis(args.frame_ms);

    if !args.json {
        println!("{WELCOME_BANNER}");
    }
    info!(
        seed = tuning.seed,
        columns = tuning.columns,
        rows = tuning.rows,
        scoring = ?tuning.scoring,
        "starting match"
    );

    let mut session = Session::new(tuning, frame);
    match session.run(Duration::from_secs(args.max_seconds)) {
        Outcome::Completed(summary) => {
            if args.json {
                let report = Report {
                    formatted_time: summary.formatted_time(),
                    summary: &summary,
                    frames: session.frames(),
                };
                let json = serde_json::to_string_pretty(&report)
                    .context("failed to serialize match summary")?;
                println!("{json}");
            } else {
                print_summary(&summary);
            }
            Ok(())
        }
        Outcome::TimedOut {
            elapsed,
            done,
            total,
        } => bail!(
            "match did not finish within {}s ({done}/{total} tiles restored after {:.1}s)",
            args.max_seconds,
            elapsed.as_secs_f32()
        ),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_summary(summary: &MatchSummary) {
    println!("Balcony restored in {}", summary.formatted_time());
    for role in PlayerRole::ALL {
        let index = role.index();
        println!(
            "  {:<12} {:<9} score {:>3}  waste {:>3}",
            summary.player_names[index],
            format!("({role:?})").to_lowercase(),
            summary.scores[index],
            summary.waste_counts[index],
        );
    }
    println!("  Waste penalty: {} units", summary.waste_count);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = Args::parse_from([
            "balcony-repair",
            "--seed",
            "42",
            "--scoring",
            "contribution",
        ]);
        let tuning = args.tuning().expect("valid flags");
        assert_eq!(tuning.seed, 42);
        assert_eq!(tuning.scoring, ScoringMode::Contribution);
        assert_eq!(args.frame_ms, 100);
    }

    #[test]
    fn unknown_scoring_flag_is_rejected() {
        assert!(Args::try_parse_from(["balcony-repair", "--scoring", "speed"]).is_err());
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for waking up dormant tiles.
//!
//! The first tile wakes after a delay drawn from the configured range. Every
//! following tile wakes after a fixed interval drawn once from the same range,
//! until the match completes.

use std::time::Duration;

use balcony_core::{Command, DelayRange, Event, Tuning};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

const SEED_SALT: u64 = 0x7111_e5a0_7111_e5a0;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    delay: DelayRange,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided delay range and seed.
    #[must_use]
    pub const fn new(delay: DelayRange, rng_seed: u64) -> Self {
        Self { delay, rng_seed }
    }

    /// Derives the configuration from the match tuning.
    #[must_use]
    pub const fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(tuning.spawn_delay, tuning.seed ^ SEED_SALT)
    }
}

/// Pure system that emits [`Command::SpawnTile`] on a randomized cadence.
#[derive(Debug)]
pub struct TileSpawning {
    next_delay: Duration,
    interval: Duration,
    accumulator: Duration,
    finished: bool,
}

impl TileSpawning {
    /// Creates a new spawning system, drawing the first delay and the interval.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.rng_seed);
        let next_delay = draw_delay(&mut rng, config.delay);
        let interval = draw_delay(&mut rng, config.delay);
        debug!(
            first_ms = next_delay.as_millis() as u64,
            interval_ms = interval.as_millis() as u64,
            "tile spawn cadence drawn"
        );
        Self {
            next_delay,
            interval,
            accumulator: Duration::ZERO,
            finished: false,
        }
    }

    /// Delay before the next spawn, measured from the last one.
    #[must_use]
    pub const fn next_delay(&self) -> Duration {
        self.next_delay
    }

    /// Repeating interval used after the first spawn.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Reports whether the system stopped for good.
    #[must_use]
    pub const fn finished(&self) -> bool {
        self.finished
    }

    /// Consumes events to emit spawn commands.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        if self.finished {
            return;
        }

        let mut accumulated = Duration::ZERO;
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => accumulated = accumulated.saturating_add(*dt),
                Event::MatchCompleted { .. } => {
                    debug!("tile spawning stopped");
                    self.finished = true;
                    self.accumulator = Duration::ZERO;
                    return;
                }
                _ => {}
            }
        }

        if accumulated.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        for _ in 0..self.resolve_spawn_attempts() {
            out.push(Command::SpawnTile);
        }
    }

    fn resolve_spawn_attempts(&mut self) -> usize {
        let mut attempts = 0;
        while !self.next_delay.is_zero() && self.accumulator >= self.next_delay {
            self.accumulator -= self.next_delay;
            self.next_delay = self.interval;
            attempts += 1;
        }
        attempts
    }
}

fn draw_delay<R: Rng + ?Sized>(rng: &mut R, range: DelayRange) -> Duration {
    let (min, max) = range.bounds();
    Duration::from_millis(rng.gen_range(min..=max))
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that decides when and where the coffee pickup appears.
//!
//! The pickup starts hidden. Once the first delay elapses the system asks the
//! world to place it on a random playable cell. After a player drinks it the
//! pickup hides again for a respawn delay. The system retires when the match
//! completes.

use std::time::Duration;

use balcony_core::{CellCoord, Command, DelayRange, Event, Tuning};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

const SEED_SALT: u64 = 0xc0ff_ee00_c0ff_ee00;

/// Configuration parameters required to construct the coffee scheduler.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    first_delay: DelayRange,
    respawn_delay: DelayRange,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration from explicit delay ranges and seed.
    #[must_use]
    pub const fn new(first_delay: DelayRange, respawn_delay: DelayRange, rng_seed: u64) -> Self {
        Self {
            first_delay,
            respawn_delay,
            rng_seed,
        }
    }

    /// Derives the configuration from the match tuning.
    #[must_use]
    pub const fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(
            tuning.coffee_first_delay,
            tuning.coffee_respawn_delay,
            tuning.seed ^ SEED_SALT,
        )
    }
}

/// Visibility state of the coffee pickup as tracked by the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoffeePhase {
    /// Waiting for the delay to run out.
    Hidden {
        /// Time left before the pickup appears.
        remaining: Duration,
    },
    /// Placed on the grid and waiting for a player.
    Visible {
        /// Cell requested for the pickup.
        cell: CellCoord,
    },
    /// The match is over; no more coffee.
    Retired,
}

/// Coffee pickup scheduler.
#[derive(Debug)]
pub struct CoffeeScheduler {
    respawn_delay: DelayRange,
    phase: CoffeePhase,
    rng: ChaCha8Rng,
}

impl CoffeeScheduler {
    /// Creates a hidden scheduler with its first delay drawn.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.rng_seed);
        let remaining = draw_delay(&mut rng, config.first_delay);
        Self {
            respawn_delay: config.respawn_delay,
            phase: CoffeePhase::Hidden { remaining },
            rng,
        }
    }

    /// Current phase of the pickup.
    #[must_use]
    pub const fn phase(&self) -> CoffeePhase {
        self.phase
    }

    /// Consumes world events and emits [`Command::PlaceCoffee`] when due.
    ///
    /// `columns` and `playable_rows` describe the grid the pickup may land on.
    pub fn handle(
        &mut self,
        events: &[Event],
        columns: u32,
        playable_rows: u32,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::MatchCompleted { .. } => {
                    debug!("coffee scheduler retired");
                    self.phase = CoffeePhase::Retired;
                }
                Event::CoffeeCollected { role } => {
                    if self.phase != CoffeePhase::Retired {
                        let remaining = draw_delay(&mut self.rng, self.respawn_delay);
                        debug!(
                            ?role,
                            respawn_ms = remaining.as_millis() as u64,
                            "coffee hidden"
                        );
                        self.phase = CoffeePhase::Hidden { remaining };
                    }
                }
                Event::TimeAdvanced { dt } => self.advance(*dt, columns, playable_rows, out),
                _ => {}
            }
        }
    }

    fn advance(&mut self, dt: Duration, columns: u32, playable_rows: u32, out: &mut Vec<Command>) {
        let CoffeePhase::Hidden { remaining } = self.phase else {
            return;
        };
        let remaining = remaining.saturating_sub(dt);
        if !remaining.is_zero() || columns == 0 || playable_rows == 0 {
            self.phase = CoffeePhase::Hidden { remaining };
            return;
        }

        let cell = CellCoord::new(
            self.rng.gen_range(0..columns),
            self.rng.gen_range(0..playable_rows),
        );
        debug!(?cell, "coffee due");
        self.phase = CoffeePhase::Visible { cell };
        out.push(Command::PlaceCoffee { cell });
    }
}

fn draw_delay<R: Rng + ?Sized>(rng: &mut R, range: DelayRange) -> Duration {
    let (min, max) = range.bounds();
    Duration::from_millis(rng.gen_range(min..=max))
}

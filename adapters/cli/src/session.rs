//! Frame loop wiring the world to its systems for headless play.

use std::time::Duration;

use balcony_core::{Command, Event, MatchSummary, Tuning};
use balcony_system_coffee::{CoffeeScheduler, Config as CoffeeConfig};
use balcony_system_crew::{Config as CrewConfig, Crew};
use balcony_system_tile_spawning::{Config as SpawnConfig, TileSpawning};
use balcony_world::{self as world, query, World};
use tracing::{debug, trace};

/// Result of driving a match until it ends or runs out of time.
#[derive(Debug, PartialEq)]
pub(crate) enum Outcome {
    Completed(MatchSummary),
    TimedOut {
        elapsed: Duration,
        done: usize,
        total: usize,
    },
}

/// Owns the world and every system taking part in a headless match.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    spawning: TileSpawning,
    coffee: CoffeeScheduler,
    crew: Crew,
    frame: Duration,
    pending: Vec<Event>,
    frames: u64,
}

impl Session {
    /// Builds the world and starts the match clock.
    pub(crate) fn new(tuning: Tuning, frame: Duration) -> Self {
        let spawning = TileSpawning::new(SpawnConfig::from_tuning(&tuning));
        let coffee = CoffeeScheduler::new(CoffeeConfig::from_tuning(&tuning));
        let mut world = World::new(tuning);
        let crew = Crew::new(CrewConfig::default(), &world);

        let mut pending = Vec::new();
        world::apply(&mut world, Command::StartMatch, &mut pending);

        Self {
            world,
            spawning,
            coffee,
            crew,
            frame,
            pending,
            frames: 0,
        }
    }

    pub(crate) fn frames(&self) -> u64 {
        self.frames
    }

    /// Simulates one frame: system reactions, motion, tick, then intents.
    pub(crate) fn step(&mut self) -> Option<MatchSummary> {
        let mut commands = Vec::new();
        let grid = query::grid(&self.world);
        let (columns, rows) = (grid.columns(), grid.playable_rows());
        self.spawning.handle(&self.pending, &mut commands);
        self.coffee.handle(&self.pending, columns, rows, &mut commands);
        for event in self.pending.drain(..) {
            if let Some(cue) = event.audio_cue() {
                trace!(?cue, "audio cue");
            }
        }

        self.crew.steer(&self.world, self.frame, &mut commands);
        commands.push(Command::Tick { dt: self.frame });
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.pending);
        }

        self.crew.act(&self.world, &mut commands);
        for command in commands {
            world::apply(&mut self.world, command, &mut self.pending);
        }
        self.frames += 1;

        let completed = self.pending.iter().find_map(|event| match event {
            Event::MatchCompleted { summary } => Some(summary.clone()),
            _ => None,
        });
        if completed.is_some() {
            debug!(frames = self.frames, "match completed");
        }
        completed
    }

    /// Steps until the balcony is restored or `limit` of simulated time passes.
    pub(crate) fn run(&mut self, limit: Duration) -> Outcome {
        while query::now(&self.world) < limit {
            if let Some(summary) = self.step() {
                return Outcome::Completed(summary);
            }
        }
        let progress = query::progress(&self.world);
        Outcome::TimedOut {
            elapsed: query::clock(&self.world).elapsed(),
            done: progress.done,
            total: progress.total,
        }
    }
}

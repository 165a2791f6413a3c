#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Balcony Repair.
//!
//! The world owns the tile grid, both players, the coffee pickup and the match
//! clock. All mutation flows through [`apply`]; read access goes through the
//! [`query`] module.

mod actions;
mod clock;
mod depots;
mod grid;
mod player;

use std::time::Duration;

use balcony_core::{
    ActionError, ActionKind, ActionOutcome, CellCoord, CoffeeError, Command, DepotError, Event,
    MatchSummary, PlayerRole, ScoringMode, Tuning, HITS_TO_BREAK,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

pub use clock::MatchClock;
pub use depots::{request, DepotLayout, Pickup};
pub use grid::Grid;
pub use player::Vitality;

use player::Player;

/// Represents the authoritative Balcony Repair world state.
#[derive(Debug)]
pub struct World {
    tuning: Tuning,
    grid: Grid,
    depots: DepotLayout,
    players: [Player; 2],
    coffee: Option<CellCoord>,
    clock: MatchClock,
    now: Duration,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a world laid out according to the provided tuning.
    #[must_use]
    pub fn new(tuning: Tuning) -> Self {
        let grid = Grid::new(tuning.columns, tuning.rows, tuning.rot_fraction);
        let depots = DepotLayout::for_grid(tuning.columns, tuning.rows);
        let [carpenter, tiler] = tuning.player_names.clone();
        let players = [
            Player::new(PlayerRole::Carpenter, carpenter),
            Player::new(PlayerRole::Tiler, tiler),
        ];
        debug!(
            columns = grid.columns(),
            playable_rows = grid.playable_rows(),
            rot_fraction = grid.rot_fraction(),
            "world created"
        );
        Self {
            rng: ChaCha8Rng::seed_from_u64(tuning.seed),
            tuning,
            grid,
            depots,
            players,
            coffee: None,
            clock: MatchClock::default(),
            now: Duration::ZERO,
        }
    }

    fn player_mut(&mut self, role: PlayerRole) -> &mut Player {
        &mut self.players[role.index()]
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        out_events.push(Event::TimeAdvanced { dt });

        for player in &mut self.players {
            let buffed = player.buffed();
            player
                .vitality
                .update(dt, player.moving, buffed, &self.tuning);
        }

        self.now = self.now.saturating_add(dt);
        self.clock.advance(dt);

        for player in &mut self.players {
            if player.expire_buff(self.now) {
                debug!(role = ?player.role, "coffee wore off");
                out_events.push(Event::BuffExpired { role: player.role });
            }
        }
    }

    fn hammer(&mut self, role: PlayerRole, out_events: &mut Vec<Event>) {
        let Self {
            grid,
            players,
            tuning,
            rng,
            ..
        } = self;
        let resolution = tuning.beam_resolution;
        let result = actions::hammer(grid, &mut players[role.index()], tuning, || {
            actions::resolve_beam(resolution, rng)
        });
        self.settle(role, ActionKind::Hammer, result, out_events);
    }

    fn repair_or_place(&mut self, role: PlayerRole, out_events: &mut Vec<Event>) {
        let result = actions::repair_or_place(
            &mut self.grid,
            &mut self.players[role.index()],
            &self.tuning,
        );
        self.settle(role, ActionKind::RepairOrPlace, result, out_events);
    }

    fn settle(
        &mut self,
        role: PlayerRole,
        action: ActionKind,
        result: Result<(CellCoord, ActionOutcome), ActionError>,
        out_events: &mut Vec<Event>,
    ) {
        let (cell, outcome) = match result {
            Ok(resolved) => resolved,
            Err(reason) => {
                debug!(?role, ?action, %reason, "action rejected");
                out_events.push(Event::ActionRejected {
                    role,
                    action,
                    reason,
                });
                return;
            }
        };

        match outcome {
            ActionOutcome::Struck { hits } => {
                out_events.push(Event::TileStruck { role, cell, hits });
            }
            ActionOutcome::Broken { beam } => {
                info!(?role, ?cell, ?beam, "tile broken");
                out_events.push(Event::TileStruck {
                    role,
                    cell,
                    hits: HITS_TO_BREAK,
                });
                out_events.push(Event::TileBroken { role, cell, beam });
            }
            ActionOutcome::BeamRepaired => {
                info!(?role, ?cell, "beam repaired");
                out_events.push(Event::BeamRepaired { role, cell });
            }
            ActionOutcome::TilePlaced => {
                info!(?role, ?cell, "tile placed");
                out_events.push(Event::TilePlaced { role, cell });
            }
            ActionOutcome::NotTargetable => {
                debug!(?role, ?action, ?cell, "nothing to work on");
                out_events.push(Event::SwingMissed { role, action, cell });
            }
        }

        let points = outcome.contribution(&self.tuning);
        if points > 0 {
            self.award(role, points, out_events);
        }

        if !matches!(
            outcome,
            ActionOutcome::Struck { .. } | ActionOutcome::NotTargetable
        ) {
            self.evaluate_completion(out_events);
        }
    }

    fn award(&mut self, role: PlayerRole, points: u32, out_events: &mut Vec<Event>) {
        let player = &mut self.players[role.index()];
        player.contribution = player.contribution.saturating_add(points);
        if self.tuning.scoring == ScoringMode::Contribution {
            player
                .vitality
                .add(points as f32 * self.tuning.vitality_per_point);
        }
        out_events.push(Event::ContributionAwarded { role, points });
    }

    fn use_depot(&mut self, role: PlayerRole, out_events: &mut Vec<Event>) {
        let player = &mut self.players[role.index()];
        let Some(depot) = player.cell.and_then(|cell| self.depots.depot_at(cell)) else {
            debug!(?role, cell = ?player.cell, "no depot here");
            out_events.push(Event::DepotRejected {
                role,
                depot: None,
                reason: DepotError::NotAtDepot,
            });
            return;
        };

        match depots::request(depot, role, &mut player.inventory, &self.tuning) {
            Ok(Pickup::Restocked { material, units }) => {
                info!(?role, ?material, units, "material picked up");
                out_events.push(Event::MaterialPickedUp {
                    role,
                    material,
                    units,
                });
            }
            Ok(Pickup::Disposed { units: 0 }) => {
                debug!(?role, "nothing to dispose");
            }
            Ok(Pickup::Disposed { units }) => {
                player
                    .vitality
                    .add(units as f32 * self.tuning.disposal_refund);
                // The ledger closes with the match.
                if self.clock.final_time().is_none() {
                    player.waste = player.waste.saturating_add(units);
                    self.clock.record_waste(units);
                }
                info!(
                    ?role,
                    units,
                    total_waste = self.clock.waste_units(),
                    "material disposed"
                );
                out_events.push(Event::InventoryDisposed { role, units });
            }
            Err(reason) => {
                debug!(?role, ?depot, %reason, "depot request rejected");
                out_events.push(Event::DepotRejected {
                    role,
                    depot: Some(depot),
                    reason,
                });
            }
        }
    }

    fn place_coffee(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        if self.coffee.is_some() || !self.grid.contains(cell) {
            debug!(?cell, "coffee placement ignored");
            return;
        }
        self.coffee = Some(cell);
        info!(?cell, "coffee appeared");
        out_events.push(Event::CoffeeAppeared { cell });
    }

    fn collect_coffee(&mut self, role: PlayerRole, out_events: &mut Vec<Event>) {
        let reason = match self.coffee {
            None => Some(CoffeeError::Unavailable),
            Some(cell) if self.players[role.index()].cell != Some(cell) => {
                Some(CoffeeError::NotAtCoffee)
            }
            Some(_) => None,
        };
        if let Some(reason) = reason {
            debug!(?role, %reason, "coffee request rejected");
            out_events.push(Event::CoffeeRejected { role, reason });
            return;
        }

        self.coffee = None;
        let now = self.now;
        let player = &mut self.players[role.index()];
        player.drink_coffee(now, &self.tuning);
        info!(?role, vitality = player.vitality.get(), "coffee collected");
        out_events.push(Event::CoffeeCollected { role });
    }

    fn evaluate_completion(&mut self, out_events: &mut Vec<Event>) {
        if !self.grid.is_complete() {
            return;
        }
        let Some(completion_time) = self.clock.finish(self.tuning.waste_penalty()) else {
            return;
        };

        for player in &mut self.players {
            player.vitality.add(self.tuning.victory_boost);
        }

        let summary = self.summary(completion_time);
        info!(
            time = %summary.formatted_time(),
            waste = summary.waste_count,
            "balcony restored"
        );
        out_events.push(Event::MatchCompleted { summary });
    }

    fn summary(&self, completion_time: Duration) -> MatchSummary {
        let [carpenter, tiler] = &self.players;
        let scores = match self.tuning.scoring {
            ScoringMode::WastePenalty => [carpenter.waste, tiler.waste],
            ScoringMode::Contribution => [carpenter.contribution, tiler.contribution],
        };
        MatchSummary {
            scores,
            waste_counts: [carpenter.waste, tiler.waste],
            player_names: [carpenter.name.clone(), tiler.name.clone()],
            completion_time,
            waste_count: self.clock.waste_units(),
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(Tuning::default())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartMatch => {
            if world.clock.running() || world.clock.final_time().is_some() {
                debug!("match already started");
                return;
            }
            world.clock.start();
            info!(tiles = world.grid.playable_count(), "match started");
            out_events.push(Event::MatchStarted);
        }
        Command::ReportMotion { role, moving, cell } => {
            let player = world.player_mut(role);
            player.moving = moving;
            player.cell = Some(cell);
        }
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::SpawnTile => {
            if let Some(cell) = world.grid.spawn_one(&mut world.rng) {
                debug!(?cell, "tile started decaying");
                out_events.push(Event::TileSpawned { cell });
            }
        }
        Command::Hammer { role } => world.hammer(role, out_events),
        Command::RepairOrPlace { role } => world.repair_or_place(role, out_events),
        Command::UseDepot { role } => world.use_depot(role, out_events),
        Command::PlaceCoffee { cell } => world.place_coffee(cell, out_events),
        Command::CollectCoffee { role } => world.collect_coffee(role, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{DepotLayout, Grid, MatchClock, Vitality, World};
    use balcony_core::{CellCoord, Inventory, MatchSummary, PlayerRole, TileState, Tuning};

    /// Provides read-only access to the tuning the world was built with.
    #[must_use]
    pub fn tuning(world: &World) -> &Tuning {
        &world.tuning
    }

    /// Provides read-only access to the playable tile grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Lifecycle state of the tile at the provided cell.
    #[must_use]
    pub fn tile(world: &World, cell: CellCoord) -> Option<TileState> {
        world.grid.tile(cell)
    }

    /// Progress counters for the "done / total" display.
    #[must_use]
    pub fn progress(world: &World) -> Progress {
        Progress {
            done: world.grid.completed_count(),
            total: world.grid.playable_count(),
        }
    }

    /// Reports whether every playable tile has been restored.
    #[must_use]
    pub fn is_complete(world: &World) -> bool {
        world.grid.is_complete()
    }

    /// Cells occupied by the depots.
    #[must_use]
    pub fn depots(world: &World) -> DepotLayout {
        world.depots
    }

    /// Cell of the visible coffee pickup, if any.
    #[must_use]
    pub fn coffee(world: &World) -> Option<CellCoord> {
        world.coffee
    }

    /// Snapshot of the match clock.
    #[must_use]
    pub fn clock(world: &World) -> MatchClock {
        world.clock
    }

    /// Total simulated time, including time after the clock stopped.
    #[must_use]
    pub fn now(world: &World) -> Duration {
        world.now
    }

    /// End-of-match payload, available once the balcony is finished.
    #[must_use]
    pub fn summary(world: &World) -> Option<MatchSummary> {
        world
            .clock
            .final_time()
            .map(|completion_time| world.summary(completion_time))
    }

    /// Speed multiplier the movement collaborator must apply to the player.
    #[must_use]
    pub fn speed_multiplier(world: &World, role: PlayerRole) -> f32 {
        world.players[role.index()]
            .vitality
            .speed_multiplier(&world.tuning)
    }

    /// Captures a read-only view of a single player.
    #[must_use]
    pub fn player(world: &World, role: PlayerRole) -> PlayerSnapshot {
        let player = &world.players[role.index()];
        PlayerSnapshot {
            role,
            name: player.name.clone(),
            cell: player.cell,
            moving: player.moving,
            inventory: player.inventory,
            vitality: player.vitality,
            buff_remaining: player
                .buff_expiry
                .map(|expiry| expiry.saturating_sub(world.now)),
            contribution: player.contribution,
            waste: player.waste,
        }
    }

    /// Progress counters of the playable grid.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Progress {
        /// Tiles broken or restored.
        pub done: usize,
        /// Playable tiles.
        pub total: usize,
    }

    /// Immutable representation of a single player used for queries.
    #[derive(Clone, Debug, PartialEq)]
    pub struct PlayerSnapshot {
        /// Role of the player.
        pub role: PlayerRole,
        /// Display name of the player.
        pub name: String,
        /// Last reported cell, if any.
        pub cell: Option<CellCoord>,
        /// Whether the player moved during the last reported frame.
        pub moving: bool,
        /// Material carried by the player.
        pub inventory: Inventory,
        /// Current vitality.
        pub vitality: Vitality,
        /// Time left on the coffee buff, if active.
        pub buff_remaining: Option<Duration>,
        /// Contribution points earned.
        pub contribution: u32,
        /// Units discarded.
        pub waste: u32,
    }

    impl PlayerSnapshot {
        /// Reports whether the coffee buff is active.
        #[must_use]
        pub const fn buff_active(&self) -> bool {
            self.buff_remaining.is_some()
        }
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Scripted two-player crew that drives headless matches.
//!
//! Each frame the crew is asked twice. [`Crew::steer`] runs before the world
//! ticks and reports one motion per player: a single orthogonal step toward
//! the current goal, or standing still. [`Crew::act`] runs after the tick and
//! emits at most one intent per player standing on its goal.
//!
//! The carpenter breaks tiles and fixes rotten beams, the tiler lays tiles on
//! intact beams and helps with the hammer whenever its hands are empty. Both
//! rest when they get too tired to swing and detour to a visible coffee when
//! running low.

use std::time::Duration;

use balcony_core::{BeamCondition, CellCoord, Command, DepotKind, PlayerRole, TileState};
use balcony_world::{query, Grid, World};
use tracing::debug;

/// Configuration parameters required to construct the crew.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    cells_per_second: f32,
    action_interval: Duration,
    resume_vitality: f32,
    coffee_threshold: f32,
}

impl Config {
    /// Creates a configuration with explicit walking speed and swing pace.
    #[must_use]
    pub const fn new(cells_per_second: f32, action_interval: Duration) -> Self {
        Self {
            cells_per_second,
            action_interval,
            resume_vitality: 40.0,
            coffee_threshold: 50.0,
        }
    }

    /// Vitality a resting player waits for before getting back to work.
    #[must_use]
    pub const fn with_resume_vitality(mut self, vitality: f32) -> Self {
        self.resume_vitality = vitality;
        self
    }

    /// Vitality under which a player heads for visible coffee.
    #[must_use]
    pub const fn with_coffee_threshold(mut self, vitality: f32) -> Self {
        self.coffee_threshold = vitality;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(5.0, Duration::from_millis(250))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Intent {
    Hammer,
    RepairOrPlace,
    UseDepot,
    CollectCoffee,
}

impl Intent {
    const fn command(self, role: PlayerRole) -> Command {
        match self {
            Self::Hammer => Command::Hammer { role },
            Self::RepairOrPlace => Command::RepairOrPlace { role },
            Self::UseDepot => Command::UseDepot { role },
            Self::CollectCoffee => Command::CollectCoffee { role },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Plan {
    Idle,
    Go { cell: CellCoord, intent: Intent },
}

#[derive(Clone, Copy, Debug)]
struct Member {
    role: PlayerRole,
    cell: CellCoord,
    stride: f32,
    cooldown: Duration,
    resting: bool,
}

impl Member {
    fn new(role: PlayerRole, cell: CellCoord) -> Self {
        Self {
            role,
            cell,
            stride: 0.0,
            cooldown: Duration::ZERO,
            resting: false,
        }
    }

    fn update_rest(&mut self, world: &World, config: &Config) {
        let vitality = query::player(world, self.role).vitality.get();
        let tuning = query::tuning(world);
        let floor = tuning.action_gate + tuning.hammer_cost.max(tuning.repair_cost);
        if !self.resting && vitality < floor {
            debug!(role = ?self.role, vitality, "crew member resting");
            self.resting = true;
        } else if self.resting && vitality >= config.resume_vitality {
            debug!(role = ?self.role, vitality, "crew member back to work");
            self.resting = false;
        }
    }

    fn plan(&self, world: &World, config: &Config) -> Plan {
        let player = query::player(world, self.role);
        if let Some(coffee) = query::coffee(world) {
            if !player.buff_active() && player.vitality.get() < config.coffee_threshold {
                return Plan::Go {
                    cell: coffee,
                    intent: Intent::CollectCoffee,
                };
            }
        }
        if self.resting {
            return Plan::Idle;
        }

        let (beam, depot) = match self.role {
            PlayerRole::Carpenter => (BeamCondition::Rotten, DepotKind::Wood),
            PlayerRole::Tiler => (BeamCondition::Intact, DepotKind::Tile),
        };
        let grid = query::grid(world);
        let depots = query::depots(world);
        let workable = nearest(grid, self.cell, |state| state == TileState::Broken { beam });
        let breakable = nearest(grid, self.cell, |state| {
            matches!(state, TileState::Active { .. })
        });

        if !player.inventory.is_empty() {
            return match (workable, breakable) {
                (Some(cell), _) => Plan::Go {
                    cell,
                    intent: Intent::RepairOrPlace,
                },
                // Leftover wood blocks the hammer; tiles are kept for later.
                (None, Some(_)) if self.role == PlayerRole::Carpenter => Plan::Go {
                    cell: depots.cell(DepotKind::Disposal),
                    intent: Intent::UseDepot,
                },
                (None, _) => Plan::Idle,
            };
        }

        match (workable, breakable) {
            (Some(_), _) => Plan::Go {
                cell: depots.cell(depot),
                intent: Intent::UseDepot,
            },
            (None, Some(cell)) => Plan::Go {
                cell,
                intent: Intent::Hammer,
            },
            (None, None) => Plan::Idle,
        }
    }
}

/// Scripted crew controlling both players.
#[derive(Debug)]
pub struct Crew {
    config: Config,
    members: [Member; 2],
}

impl Crew {
    /// Creates a crew standing on its starting cells inside the world grid.
    #[must_use]
    pub fn new(config: Config, world: &World) -> Self {
        let grid = query::grid(world);
        let clamp = |column: u32, row: u32| {
            CellCoord::new(
                column.min(grid.columns().saturating_sub(1)),
                row.min(grid.playable_rows().saturating_sub(1)),
            )
        };
        Self {
            config,
            members: [
                Member::new(PlayerRole::Carpenter, clamp(1, 1)),
                Member::new(PlayerRole::Tiler, clamp(10, 1)),
            ],
        }
    }

    /// Cell the crew member with the provided role stands on.
    #[must_use]
    pub fn cell(&self, role: PlayerRole) -> CellCoord {
        self.members[role.index()].cell
    }

    /// Reports whether the crew member is waiting for vitality to recover.
    #[must_use]
    pub fn resting(&self, role: PlayerRole) -> bool {
        self.members[role.index()].resting
    }

    /// Emits one motion report per player for the upcoming tick.
    pub fn steer(&mut self, world: &World, dt: Duration, out: &mut Vec<Command>) {
        for member in &mut self.members {
            member.cooldown = member.cooldown.saturating_sub(dt);
            member.update_rest(world, &self.config);

            let target = match member.plan(world, &self.config) {
                Plan::Go { cell, .. } if cell != member.cell => Some(cell),
                _ => None,
            };

            let moving = if let Some(target) = target {
                let speed = query::speed_multiplier(world, member.role);
                member.stride = (member.stride
                    + dt.as_secs_f32() * self.config.cells_per_second * speed)
                    .min(1.0);
                if member.stride >= 1.0 {
                    member.stride -= 1.0;
                    member.cell = step_toward(member.cell, target);
                }
                true
            } else {
                member.stride = 0.0;
                false
            };

            out.push(Command::ReportMotion {
                role: member.role,
                moving,
                cell: member.cell,
            });
        }
    }

    /// Emits the intents of players standing on their goal.
    pub fn act(&mut self, world: &World, out: &mut Vec<Command>) {
        for member in &mut self.members {
            if !member.cooldown.is_zero() {
                continue;
            }
            if let Plan::Go { cell, intent } = member.plan(world, &self.config) {
                if cell == member.cell {
                    out.push(intent.command(member.role));
                    member.cooldown = self.config.action_interval;
                }
            }
        }
    }
}

fn nearest(
    grid: &Grid,
    from: CellCoord,
    wanted: impl Fn(TileState) -> bool,
) -> Option<CellCoord> {
    grid.iter()
        .filter(|(_, state)| wanted(*state))
        .map(|(cell, _)| cell)
        .min_by_key(|cell| cell.manhattan_distance(from))
}

fn step_toward(from: CellCoord, to: CellCoord) -> CellCoord {
    let (column, row) = (from.column(), from.row());
    if column < to.column() {
        CellCoord::new(column + 1, row)
    } else if column > to.column() {
        CellCoord::new(column - 1, row)
    } else if row < to.row() {
        CellCoord::new(column, row + 1)
    } else if row > to.row() {
        CellCoord::new(column, row - 1)
    } else {
        from
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use balcony_core::{BeamResolution, Event, Tuning};
    use balcony_world as world;

    fn small_world(resolution: BeamResolution) -> World {
        World::new(Tuning {
            columns: 3,
            rows: 2,
            beam_resolution: resolution,
            ..Tuning::default()
        })
    }

    fn apply(world: &mut World, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(world, command, &mut events);
        events
    }

    fn break_one(world: &mut World) -> CellCoord {
        let Some(Event::TileSpawned { cell }) = apply(world, Command::SpawnTile).pop() else {
            panic!("expected a spawned tile");
        };
        let _ = apply(
            world,
            Command::ReportMotion {
                role: PlayerRole::Carpenter,
                moving: false,
                cell,
            },
        );
        for _ in 0..4 {
            let _ = apply(
                world,
                Command::Hammer {
                    role: PlayerRole::Carpenter,
                },
            );
        }
        cell
    }

    #[test]
    fn steps_move_columns_before_rows() {
        let from = CellCoord::new(1, 1);
        assert_eq!(step_toward(from, CellCoord::new(3, 0)), CellCoord::new(2, 1));
        assert_eq!(step_toward(from, CellCoord::new(1, 0)), CellCoord::new(1, 0));
        assert_eq!(step_toward(from, from), from);
    }

    #[test]
    fn starting_cells_are_clamped_to_the_grid() {
        let world = small_world(BeamResolution::CoinFlip);
        let crew = Crew::new(Config::default(), &world);
        assert_eq!(crew.cell(PlayerRole::Carpenter), CellCoord::new(1, 0));
        assert_eq!(crew.cell(PlayerRole::Tiler), CellCoord::new(2, 0));
    }

    #[test]
    fn carpenter_fetches_wood_for_rotten_beams() {
        let mut world = small_world(BeamResolution::AlwaysRotten);
        let _ = break_one(&mut world);
        let member = Member::new(PlayerRole::Carpenter, CellCoord::new(0, 0));
        assert_eq!(
            member.plan(&world, &Config::default()),
            Plan::Go {
                cell: query::depots(&world).cell(DepotKind::Wood),
                intent: Intent::UseDepot,
            }
        );

        let tiler = Member::new(PlayerRole::Tiler, CellCoord::new(0, 0));
        assert_eq!(tiler.plan(&world, &Config::default()), Plan::Idle);
    }

    #[test]
    fn tiler_heads_for_intact_beams_once_stocked() {
        let mut world = small_world(BeamResolution::AlwaysIntact);
        let cell = break_one(&mut world);
        let depot = query::depots(&world).cell(DepotKind::Tile);
        let _ = apply(
            &mut world,
            Command::ReportMotion {
                role: PlayerRole::Tiler,
                moving: false,
                cell: depot,
            },
        );
        let _ = apply(
            &mut world,
            Command::UseDepot {
                role: PlayerRole::Tiler,
            },
        );

        let member = Member::new(PlayerRole::Tiler, depot);
        assert_eq!(
            member.plan(&world, &Config::default()),
            Plan::Go {
                cell,
                intent: Intent::RepairOrPlace,
            }
        );
    }

    #[test]
    fn tired_member_rests_until_the_resume_vitality() {
        let mut world = small_world(BeamResolution::CoinFlip);
        let mut crew = Crew::new(Config::default().with_resume_vitality(20.0), &world);
        let _ = apply(
            &mut world,
            Command::ReportMotion {
                role: PlayerRole::Carpenter,
                moving: true,
                cell: CellCoord::new(0, 0),
            },
        );
        let _ = apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(45),
            },
        );

        let mut commands = Vec::new();
        crew.steer(&world, Duration::from_millis(100), &mut commands);
        assert!(crew.resting(PlayerRole::Carpenter));
        assert!(!crew.resting(PlayerRole::Tiler));
        assert!(commands.contains(&Command::ReportMotion {
            role: PlayerRole::Carpenter,
            moving: false,
            cell: crew.cell(PlayerRole::Carpenter),
        }));
        for command in commands.drain(..) {
            let _ = apply(&mut world, command);
        }

        let _ = apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(5),
            },
        );
        crew.steer(&world, Duration::from_millis(100), &mut commands);
        assert!(crew.resting(PlayerRole::Carpenter), "15 is below 20");

        let _ = apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(5),
            },
        );
        crew.steer(&world, Duration::from_millis(100), &mut commands);
        assert!(!crew.resting(PlayerRole::Carpenter));
    }

    #[test]
    fn coffee_threshold_decides_the_detour() {
        let mut world = small_world(BeamResolution::CoinFlip);
        let coffee = CellCoord::new(0, 0);
        let _ = apply(&mut world, Command::PlaceCoffee { cell: coffee });
        let member = Member::new(PlayerRole::Carpenter, CellCoord::new(2, 0));

        assert_eq!(member.plan(&world, &Config::default()), Plan::Idle);
        assert_eq!(
            member.plan(&world, &Config::default().with_coffee_threshold(100.5)),
            Plan::Go {
                cell: coffee,
                intent: Intent::CollectCoffee,
            }
        );
    }

    #[test]
    fn intents_respect_the_action_interval() {
        let mut world = small_world(BeamResolution::AlwaysIntact);
        let Some(Event::TileSpawned { cell }) = apply(&mut world, Command::SpawnTile).pop() else {
            panic!("expected a spawned tile");
        };
        let mut crew = Crew::new(Config::default(), &world);
        crew.members[PlayerRole::Carpenter.index()].cell = cell;

        let mut commands = Vec::new();
        crew.steer(&world, Duration::from_millis(100), &mut commands);
        for command in commands.drain(..) {
            let _ = apply(&mut world, command);
        }
        crew.act(&world, &mut commands);
        assert!(commands.contains(&Command::Hammer {
            role: PlayerRole::Carpenter
        }));

        commands.clear();
        crew.act(&world, &mut commands);
        assert!(!commands.contains(&Command::Hammer {
            role: PlayerRole::Carpenter
        }));
    }
}

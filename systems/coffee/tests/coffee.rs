use std::time::Duration;

use balcony_core::{
    CellCoord, Command, DelayRange, Event, MatchSummary, PlayerRole, Tuning,
};
use balcony_system_coffee::{CoffeePhase, CoffeeScheduler, Config};
use balcony_world::{self as world, query, World};

fn advance(ms: u64) -> Event {
    Event::TimeAdvanced {
        dt: Duration::from_millis(ms),
    }
}

fn fixed(first: u64, respawn: u64) -> Config {
    Config::new(
        DelayRange::new(first, first),
        DelayRange::new(respawn, respawn),
        0x5eed,
    )
}

#[test]
fn pickup_appears_after_first_delay_on_a_playable_cell() {
    let mut scheduler = CoffeeScheduler::new(fixed(5_000, 20_000));
    let mut commands = Vec::new();

    scheduler.handle(&[advance(4_999)], 12, 7, &mut commands);
    assert!(commands.is_empty());

    scheduler.handle(&[advance(1)], 12, 7, &mut commands);
    let [Command::PlaceCoffee { cell }] = commands.as_slice() else {
        panic!("expected a single placement, got {commands:?}");
    };
    assert!(cell.column() < 12 && cell.row() < 7);
    assert_eq!(scheduler.phase(), CoffeePhase::Visible { cell: *cell });

    commands.clear();
    scheduler.handle(&[advance(60_000)], 12, 7, &mut commands);
    assert!(commands.is_empty(), "visible pickup is not placed twice");
}

#[test]
fn collection_schedules_a_respawn() {
    let mut scheduler = CoffeeScheduler::new(fixed(1_000, 20_000));
    let mut commands = Vec::new();
    scheduler.handle(&[advance(1_000)], 4, 3, &mut commands);
    assert_eq!(commands.len(), 1);

    commands.clear();
    scheduler.handle(
        &[Event::CoffeeCollected {
            role: PlayerRole::Tiler,
        }],
        4,
        3,
        &mut commands,
    );
    assert_eq!(
        scheduler.phase(),
        CoffeePhase::Hidden {
            remaining: Duration::from_secs(20)
        }
    );

    scheduler.handle(&[advance(19_000)], 4, 3, &mut commands);
    assert!(commands.is_empty());
    scheduler.handle(&[advance(1_000)], 4, 3, &mut commands);
    assert_eq!(commands.len(), 1);
}

#[test]
fn completed_match_retires_the_scheduler() {
    let mut scheduler = CoffeeScheduler::new(fixed(1_000, 1_000));
    let mut commands = Vec::new();
    scheduler.handle(
        &[
            Event::MatchCompleted {
                summary: MatchSummary::default(),
            },
            advance(10_000),
        ],
        4,
        3,
        &mut commands,
    );
    assert!(commands.is_empty());
    assert_eq!(scheduler.phase(), CoffeePhase::Retired);
}

#[test]
fn world_accepts_scheduled_coffee_and_players_can_drink_it() {
    let tuning = Tuning {
        columns: 4,
        rows: 3,
        ..Tuning::default()
    };
    let mut world = World::new(tuning.clone());
    let mut scheduler = CoffeeScheduler::new(Config::from_tuning(&tuning));
    let grid = query::grid(&world);
    let (columns, rows) = (grid.columns(), grid.playable_rows());

    let mut placed = None;
    for _ in 0..40 {
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(500),
            },
            &mut events,
        );
        let mut commands = Vec::new();
        scheduler.handle(&events, columns, rows, &mut commands);
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
        if let Some(cell) = query::coffee(&world) {
            placed = Some(cell);
            break;
        }
    }

    let cell: CellCoord = placed.expect("coffee appears within twenty seconds");
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ReportMotion {
            role: PlayerRole::Carpenter,
            moving: false,
            cell,
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::CollectCoffee {
            role: PlayerRole::Carpenter,
        },
        &mut events,
    );
    assert!(events.contains(&Event::CoffeeCollected {
        role: PlayerRole::Carpenter
    }));

    let mut commands = Vec::new();
    scheduler.handle(&events, columns, rows, &mut commands);
    assert!(matches!(scheduler.phase(), CoffeePhase::Hidden { .. }));
}

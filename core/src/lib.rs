#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Balcony Repair engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems and presentation layers to react to deterministically.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Balcony Repair.";

/// Upper bound of a player's vitality.
pub const MAX_VITALITY: f32 = 100.0;

/// Hits required to break an active tile.
pub const HITS_TO_BREAK: u8 = 4;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Resets the match clock and starts counting simulated time.
    StartMatch,
    /// Reports the movement state of a player for the upcoming tick.
    ReportMotion {
        /// Player whose state is reported.
        role: PlayerRole,
        /// Whether the player moved during the frame.
        moving: bool,
        /// Grid cell the player currently stands on.
        cell: CellCoord,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that one empty tile starts decaying.
    SpawnTile,
    /// Requests a hammer swing at the player's current cell.
    Hammer {
        /// Player swinging the hammer.
        role: PlayerRole,
    },
    /// Requests a beam repair or tile placement at the player's current cell.
    RepairOrPlace {
        /// Player using the carried material.
        role: PlayerRole,
    },
    /// Requests interaction with the depot under the player.
    UseDepot {
        /// Player visiting the depot.
        role: PlayerRole,
    },
    /// Makes the coffee pickup visible at the provided cell.
    PlaceCoffee {
        /// Cell the pickup appears on.
        cell: CellCoord,
    },
    /// Requests that the player drinks the visible coffee.
    CollectCoffee {
        /// Player reaching for the coffee.
        role: PlayerRole,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the match clock started.
    MatchStarted,
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that an empty tile became active.
    TileSpawned {
        /// Cell of the activated tile.
        cell: CellCoord,
    },
    /// Reports a hammer strike landing on an active tile.
    ///
    /// The breaking strike is reported too, followed by [`Event::TileBroken`].
    TileStruck {
        /// Player that swung the hammer.
        role: PlayerRole,
        /// Cell of the struck tile.
        cell: CellCoord,
        /// Hits accumulated by the tile so far, including this one.
        hits: u8,
    },
    /// Reports that a tile broke and exposed its beam.
    TileBroken {
        /// Player that delivered the final strike.
        role: PlayerRole,
        /// Cell of the broken tile.
        cell: CellCoord,
        /// Condition of the exposed beam.
        beam: BeamCondition,
    },
    /// Reports that a rotten beam was replaced with fresh wood.
    BeamRepaired {
        /// Player that repaired the beam.
        role: PlayerRole,
        /// Cell of the repaired beam.
        cell: CellCoord,
    },
    /// Reports that a new tile was laid on an intact beam.
    TilePlaced {
        /// Player that laid the tile.
        role: PlayerRole,
        /// Cell of the completed tile.
        cell: CellCoord,
    },
    /// Reports an accepted action that found nothing to act upon.
    SwingMissed {
        /// Player that attempted the action.
        role: PlayerRole,
        /// Action that was attempted.
        action: ActionKind,
        /// Cell the action targeted.
        cell: CellCoord,
    },
    /// Reports that an action was refused before any vitality was spent.
    ActionRejected {
        /// Player that attempted the action.
        role: PlayerRole,
        /// Action that was attempted.
        action: ActionKind,
        /// Reason the action was refused.
        reason: ActionError,
    },
    /// Reports contribution points credited to a player.
    ContributionAwarded {
        /// Player receiving the points.
        role: PlayerRole,
        /// Points credited by the action.
        points: u32,
    },
    /// Confirms that a player restocked material at a depot.
    MaterialPickedUp {
        /// Player that restocked.
        role: PlayerRole,
        /// Material carried after the pickup.
        material: Material,
        /// Units carried after the pickup.
        units: u32,
    },
    /// Confirms that a player threw carried material away.
    InventoryDisposed {
        /// Player that disposed of material.
        role: PlayerRole,
        /// Units discarded, each counted as waste.
        units: u32,
    },
    /// Reports that a depot request was refused.
    DepotRejected {
        /// Player that issued the request.
        role: PlayerRole,
        /// Depot under the player, if any.
        depot: Option<DepotKind>,
        /// Reason the request was refused.
        reason: DepotError,
    },
    /// Announces that the coffee pickup became visible.
    CoffeeAppeared {
        /// Cell the pickup occupies.
        cell: CellCoord,
    },
    /// Confirms that a player drank the coffee and became buffed.
    CoffeeCollected {
        /// Player that drank the coffee.
        role: PlayerRole,
    },
    /// Reports that a coffee request was refused.
    CoffeeRejected {
        /// Player that reached for the coffee.
        role: PlayerRole,
        /// Reason the request was refused.
        reason: CoffeeError,
    },
    /// Announces that a player's coffee buff wore off.
    BuffExpired {
        /// Player whose buff ended.
        role: PlayerRole,
    },
    /// Announces that every playable tile was restored.
    MatchCompleted {
        /// Payload handed to the end-of-match presentation.
        summary: MatchSummary,
    },
}

impl Event {
    /// Sound cue presentation layers should play for the event, if any.
    #[must_use]
    pub const fn audio_cue(&self) -> Option<AudioCue> {
        match self {
            Self::TileStruck { .. } => Some(AudioCue::HammerStrike),
            Self::TileBroken { .. } => Some(AudioCue::TileBreak),
            Self::BeamRepaired { .. } => Some(AudioCue::BeamRepair),
            Self::TilePlaced { .. } => Some(AudioCue::TilePlaced),
            Self::MaterialPickedUp {
                material: Material::Wood,
                ..
            } => Some(AudioCue::PickupWood),
            Self::MaterialPickedUp {
                material: Material::Tiles,
                ..
            } => Some(AudioCue::PickupTile),
            Self::InventoryDisposed { .. } => Some(AudioCue::Disposal),
            Self::CoffeeCollected { .. } => Some(AudioCue::Drink),
            Self::MatchCompleted { .. } => Some(AudioCue::Victory),
            _ => None,
        }
    }
}

/// Discrete sound effects the audio collaborator may play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioCue {
    /// Hammer hitting a decaying tile.
    HammerStrike,
    /// Tile shattering on the final strike.
    TileBreak,
    /// Nail driven into a fresh beam.
    BeamRepair,
    /// New tile set into place.
    TilePlaced,
    /// Wood picked up at the wood depot.
    PickupWood,
    /// Tiles picked up at the tile depot.
    PickupTile,
    /// Material thrown into the disposal site.
    Disposal,
    /// Coffee being drunk.
    Drink,
    /// Fanfare for a finished balcony.
    Victory,
}

/// The two fixed roles of the cooperative crew.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerRole {
    /// Carries wood and repairs rotten beams.
    Carpenter,
    /// Carries tiles and lays them on intact beams.
    Tiler,
}

impl PlayerRole {
    /// Both roles in their canonical order.
    pub const ALL: [PlayerRole; 2] = [PlayerRole::Carpenter, PlayerRole::Tiler];

    /// Position of the role inside per-player arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Carpenter => 0,
            Self::Tiler => 1,
        }
    }

    /// Material the role is allowed to carry.
    #[must_use]
    pub const fn material(self) -> Material {
        match self {
            Self::Carpenter => Material::Wood,
            Self::Tiler => Material::Tiles,
        }
    }
}

/// Consumable material fetched from the depots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    /// Planks used to replace rotten beams.
    Wood,
    /// Fresh tiles laid on intact beams.
    Tiles,
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

/// Condition of the beam exposed beneath a broken tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeamCondition {
    /// The beam must be replaced with wood before a tile can be laid.
    Rotten,
    /// The beam can carry a new tile.
    Intact,
}

/// Lifecycle of a single playable tile.
///
/// Each variant carries exactly the data that is meaningful in that stage, so
/// a hit count only exists while the tile is decaying and a beam condition only
/// exists once the tile has been broken.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileState {
    /// Untouched tile that has not started decaying.
    #[default]
    Empty,
    /// Decaying tile waiting to be hammered out.
    Active {
        /// Hits received so far, always below [`HITS_TO_BREAK`].
        hits: u8,
    },
    /// Tile hammered out, exposing its beam.
    Broken {
        /// Condition of the exposed beam.
        beam: BeamCondition,
    },
    /// Tile restored with a new tile on an intact beam.
    Complete,
}

impl TileState {
    /// Hit count reported to presentation layers.
    ///
    /// Broken and complete tiles keep reporting the breaking hit count.
    #[must_use]
    pub const fn hit_count(&self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Active { hits } => *hits,
            Self::Broken { .. } | Self::Complete => HITS_TO_BREAK,
        }
    }

    /// Beam condition, present once the tile has been broken.
    #[must_use]
    pub const fn beam(&self) -> Option<BeamCondition> {
        match self {
            Self::Empty | Self::Active { .. } => None,
            Self::Broken { beam } => Some(*beam),
            Self::Complete => Some(BeamCondition::Intact),
        }
    }

    /// Reports whether the tile counts toward the progress display.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        matches!(self, Self::Broken { .. } | Self::Complete)
    }
}

/// Role-bound material carried by a player.
///
/// The material is fixed at construction from the owning role, so a carpenter
/// can never hold tiles and a tiler can never hold wood.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Inventory {
    material: Material,
    units: u32,
}

impl Inventory {
    /// Creates an empty inventory for the provided role.
    #[must_use]
    pub const fn for_role(role: PlayerRole) -> Self {
        Self {
            material: role.material(),
            units: 0,
        }
    }

    /// Material this inventory is able to hold.
    #[must_use]
    pub const fn material(&self) -> Material {
        self.material
    }

    /// Units currently carried.
    #[must_use]
    pub const fn units(&self) -> u32 {
        self.units
    }

    /// Wood units carried.
    #[must_use]
    pub const fn wood(&self) -> u32 {
        match self.material {
            Material::Wood => self.units,
            Material::Tiles => 0,
        }
    }

    /// Tile units carried.
    #[must_use]
    pub const fn tiles(&self) -> u32 {
        match self.material {
            Material::Tiles => self.units,
            Material::Wood => 0,
        }
    }

    /// Reports whether nothing is carried.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.units == 0
    }

    /// Sets the carried amount to the provided batch size.
    pub fn restock(&mut self, units: u32) {
        self.units = units;
    }

    /// Consumes one unit of the provided material, if carried.
    pub fn consume(&mut self, material: Material) -> bool {
        if self.material != material || self.units == 0 {
            return false;
        }
        self.units -= 1;
        true
    }

    /// Empties the inventory and returns the number of discarded units.
    pub fn clear(&mut self) -> u32 {
        std::mem::take(&mut self.units)
    }
}

/// The three fixed service points placed on the reserved row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepotKind {
    /// Hands out wood to the carpenter.
    Wood,
    /// Hands out tiles to the tiler.
    Tile,
    /// Accepts any carried material as waste.
    Disposal,
}

/// Player actions resolved against the tile under the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Empty-handed hammer swing.
    Hammer,
    /// Use of the carried wood or tile.
    RepairOrPlace,
}

impl ActionKind {
    /// Vitality charged once the action passes its gates.
    #[must_use]
    pub const fn cost(self, tuning: &Tuning) -> f32 {
        match self {
            Self::Hammer => tuning.hammer_cost,
            Self::RepairOrPlace => tuning.repair_cost,
        }
    }
}

/// Result of an accepted action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionOutcome {
    /// The hammer landed on an active tile that is still intact.
    Struck {
        /// Hits accumulated by the tile.
        hits: u8,
    },
    /// The hammer broke the tile.
    Broken {
        /// Condition of the exposed beam.
        beam: BeamCondition,
    },
    /// A rotten beam was replaced.
    BeamRepaired,
    /// A new tile was laid.
    TilePlaced,
    /// The tile was in the wrong stage; vitality was still spent.
    NotTargetable,
}

impl ActionOutcome {
    /// Contribution points the outcome awards.
    #[must_use]
    pub const fn contribution(&self, tuning: &Tuning) -> u32 {
        match self {
            Self::Broken { .. } => tuning.break_points,
            Self::BeamRepaired => tuning.repair_points,
            Self::TilePlaced => tuning.place_points,
            Self::Struck { .. } | Self::NotTargetable => 0,
        }
    }
}

/// Reasons an action is refused before any vitality is spent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum ActionError {
    /// Vitality is below the action gate.
    #[error("too exhausted to act")]
    Exhausted,
    /// Hammering requires empty hands.
    #[error("hands must be empty to swing the hammer")]
    HandsFull,
    /// Repairing or placing requires carried material.
    #[error("no material to repair or place")]
    NothingToUse,
    /// The player stands outside the playable grid.
    #[error("outside the playable grid")]
    OutOfBounds,
}

/// Reasons a depot request is refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum DepotError {
    /// The depot does not serve the player's role.
    #[error("depot does not serve this role")]
    WrongRole,
    /// The player already carries a full batch.
    #[error("already carrying a full batch")]
    AlreadyFull,
    /// No depot occupies the player's cell.
    #[error("no depot at this position")]
    NotAtDepot,
}

/// Reasons a coffee request is refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum CoffeeError {
    /// No coffee is currently visible.
    #[error("no coffee available")]
    Unavailable,
    /// The player is not standing on the coffee.
    #[error("coffee is elsewhere")]
    NotAtCoffee,
}

/// Three-band energy level used to colour vitality bars.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VitalityLevel {
    /// Above sixty percent.
    High,
    /// Above thirty percent.
    Medium,
    /// Thirty percent or below.
    Low,
}

impl VitalityLevel {
    /// Classifies a vitality value.
    #[must_use]
    pub fn classify(vitality: f32) -> Self {
        if vitality > 60.0 {
            Self::High
        } else if vitality > 30.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// How the end-of-match scores are derived.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// Scores are the waste units each player discarded.
    #[default]
    WastePenalty,
    /// Scores are contribution points, each also converted into vitality.
    Contribution,
}

/// How a beam condition is decided when a tile breaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeamResolution {
    /// Fair coin flip from the seeded match RNG.
    #[default]
    CoinFlip,
    /// Every beam turns out rotten.
    AlwaysRotten,
    /// Every beam turns out intact.
    AlwaysIntact,
}

/// Inclusive range of milliseconds used for randomized delays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DelayRange {
    /// Shortest delay in milliseconds.
    pub min_ms: u64,
    /// Longest delay in milliseconds.
    pub max_ms: u64,
}

impl DelayRange {
    /// Creates a new delay range.
    #[must_use]
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// Bounds ordered so that the lower bound never exceeds the upper bound.
    #[must_use]
    pub const fn bounds(&self) -> (u64, u64) {
        if self.min_ms <= self.max_ms {
            (self.min_ms, self.max_ms)
        } else {
            (self.max_ms, self.min_ms)
        }
    }
}

/// Every tunable constant of a match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Seed feeding every random decision of the match.
    pub seed: u64,
    /// Grid columns.
    pub columns: u32,
    /// Grid rows including the reserved depot row.
    pub rows: u32,
    /// Historical share of rotten beams; beams are decided at break time.
    pub rot_fraction: f32,
    /// Display names of the carpenter and the tiler.
    pub player_names: [String; 2],
    /// Vitality spent per hammer swing.
    pub hammer_cost: f32,
    /// Vitality spent per repair or placement attempt.
    pub repair_cost: f32,
    /// Actions are refused below this vitality.
    pub action_gate: f32,
    /// Movement slows below this vitality.
    pub slow_threshold: f32,
    /// Speed multiplier applied below the slow threshold.
    pub slow_factor: f32,
    /// Vitality lost per second of movement.
    pub decay_per_second: f32,
    /// Vitality regained per second of standing still.
    pub recovery_per_second: f32,
    /// Wood units handed out per visit.
    pub wood_batch: u32,
    /// Tile units handed out per visit.
    pub tile_batch: u32,
    /// Vitality refunded per discarded unit.
    pub disposal_refund: f32,
    /// Vitality granted by coffee.
    pub coffee_boost: f32,
    /// How long the coffee buff lasts, in milliseconds.
    pub coffee_duration_ms: u64,
    /// Delay before the first coffee appears.
    pub coffee_first_delay: DelayRange,
    /// Delay before coffee reappears after being drunk.
    pub coffee_respawn_delay: DelayRange,
    /// Delay range between decaying tile spawns.
    pub spawn_delay: DelayRange,
    /// Time added to the final result per waste unit, in milliseconds.
    pub waste_penalty_ms: u64,
    /// Points for breaking a tile.
    pub break_points: u32,
    /// Points for repairing a beam.
    pub repair_points: u32,
    /// Points for laying a tile.
    pub place_points: u32,
    /// Vitality per contribution point in contribution scoring.
    pub vitality_per_point: f32,
    /// Vitality granted to every player on victory.
    pub victory_boost: f32,
    /// How scores are reported.
    pub scoring: ScoringMode,
    /// How beam conditions are decided.
    pub beam_resolution: BeamResolution,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            seed: 0x6261_6c6b_6f6e_2d31,
            columns: 12,
            rows: 8,
            rot_fraction: 0.3,
            player_names: ["Player 1".to_owned(), "Player 2".to_owned()],
            hammer_cost: 2.0,
            repair_cost: 3.0,
            action_gate: 10.0,
            slow_threshold: 30.0,
            slow_factor: 0.7,
            decay_per_second: 2.0,
            recovery_per_second: 1.0,
            wood_batch: 3,
            tile_batch: 4,
            disposal_refund: 2.0,
            coffee_boost: 50.0,
            coffee_duration_ms: 20_000,
            coffee_first_delay: DelayRange::new(5_000, 15_000),
            coffee_respawn_delay: DelayRange::new(20_000, 40_000),
            spawn_delay: DelayRange::new(2_000, 7_000),
            waste_penalty_ms: 1_000,
            break_points: 2,
            repair_points: 6,
            place_points: 3,
            vitality_per_point: 5.0,
            victory_boost: MAX_VITALITY,
            scoring: ScoringMode::WastePenalty,
            beam_resolution: BeamResolution::CoinFlip,
        }
    }
}

impl Tuning {
    /// Rows eligible for the win condition.
    #[must_use]
    pub const fn playable_rows(&self) -> u32 {
        self.rows.saturating_sub(1)
    }

    /// Coffee buff duration.
    #[must_use]
    pub const fn coffee_duration(&self) -> Duration {
        Duration::from_millis(self.coffee_duration_ms)
    }

    /// Time penalty per waste unit.
    #[must_use]
    pub const fn waste_penalty(&self) -> Duration {
        Duration::from_millis(self.waste_penalty_ms)
    }

    /// Batch size handed out for the provided material.
    #[must_use]
    pub const fn batch(&self, material: Material) -> u32 {
        match material {
            Material::Wood => self.wood_batch,
            Material::Tiles => self.tile_batch,
        }
    }
}

/// Payload handed to the end-of-match presentation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchSummary {
    /// Per-player scores according to the scoring mode.
    pub scores: [u32; 2],
    /// Per-player discarded units.
    pub waste_counts: [u32; 2],
    /// Per-player display names.
    pub player_names: [String; 2],
    /// Elapsed time plus the waste penalty.
    #[serde(with = "duration_millis")]
    pub completion_time: Duration,
    /// Total discarded units.
    pub waste_count: u32,
}

impl MatchSummary {
    /// Completion time rendered as `MM:SS.cc`.
    #[must_use]
    pub fn formatted_time(&self) -> String {
        format_completion_time(self.completion_time)
    }
}

/// Renders a duration as `MM:SS.cc` with centisecond precision.
#[must_use]
pub fn format_completion_time(time: Duration) -> String {
    let millis = time.as_millis();
    let minutes = millis / 60_000;
    let seconds = (millis % 60_000) / 1_000;
    let centis = (millis % 1_000) / 10;
    format!("{minutes:02}:{seconds:02}.{centis:02}")
}

mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

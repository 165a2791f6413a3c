//! Playable tile matrix and its lifecycle transitions.

use balcony_core::{BeamCondition, CellCoord, TileState, HITS_TO_BREAK};
use rand::{seq::SliceRandom, Rng};

/// Result of a hammer strike against a single tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Strike {
    /// The tile absorbed the hit and keeps decaying.
    Cracked(u8),
    /// The tile broke on this hit.
    Shattered(BeamCondition),
    /// The tile was not decaying.
    Ignored,
}

/// Dense matrix of playable tiles. The reserved depot row is not stored.
#[derive(Clone, Debug)]
pub struct Grid {
    columns: u32,
    rows: u32,
    rot_fraction: f32,
    tiles: Vec<TileState>,
}

impl Grid {
    /// Creates a grid of empty tiles.
    ///
    /// `rows` counts every row including the reserved depot row, which is
    /// excluded from the playable area. `rot_fraction` is retained for display
    /// only; beam conditions are decided when a tile breaks.
    #[must_use]
    pub fn new(columns: u32, rows: u32, rot_fraction: f32) -> Self {
        let playable_rows = rows.saturating_sub(1);
        let capacity_u64 = u64::from(columns) * u64::from(playable_rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows: playable_rows,
            rot_fraction,
            tiles: vec![TileState::Empty; capacity],
        }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows that count toward completion.
    #[must_use]
    pub const fn playable_rows(&self) -> u32 {
        self.rows
    }

    /// Configured share of rotten beams.
    #[must_use]
    pub const fn rot_fraction(&self) -> f32 {
        self.rot_fraction
    }

    /// Reports whether the cell lies inside the playable area.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Lifecycle state of the tile at the provided cell.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<TileState> {
        self.index(cell).and_then(|index| self.tiles.get(index).copied())
    }

    /// Iterates every playable cell together with its state in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, TileState)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(|(index, state)| (self.cell_at(index), *state))
    }

    /// Number of playable cells.
    #[must_use]
    pub fn playable_count(&self) -> usize {
        self.tiles.len()
    }

    /// Number of tiles broken or restored, used for the progress display.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.tiles.iter().filter(|state| state.is_done()).count()
    }

    /// Reports whether every playable tile has been restored.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.tiles.is_empty()
            && self
                .tiles
                .iter()
                .all(|state| matches!(state, TileState::Complete))
    }

    /// Activates one uniformly chosen empty tile.
    ///
    /// Returns `None` when no empty tile is left.
    pub fn spawn_one<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<CellCoord> {
        let empty: Vec<usize> = self
            .tiles
            .iter()
            .enumerate()
            .filter(|(_, state)| matches!(state, TileState::Empty))
            .map(|(index, _)| index)
            .collect();
        let index = *empty.choose(rng)?;
        self.tiles[index] = TileState::Active { hits: 0 };
        Some(self.cell_at(index))
    }

    pub(crate) fn strike(
        &mut self,
        cell: CellCoord,
        resolve_beam: impl FnOnce() -> BeamCondition,
    ) -> Strike {
        let Some(slot) = self.slot_mut(cell) else {
            return Strike::Ignored;
        };
        let TileState::Active { hits } = *slot else {
            return Strike::Ignored;
        };

        let hits = hits.saturating_add(1);
        if hits < HITS_TO_BREAK {
            *slot = TileState::Active { hits };
            return Strike::Cracked(hits);
        }

        let beam = resolve_beam();
        *slot = TileState::Broken { beam };
        Strike::Shattered(beam)
    }

    pub(crate) fn repair_beam(&mut self, cell: CellCoord) -> bool {
        self.advance(
            cell,
            TileState::Broken {
                beam: BeamCondition::Rotten,
            },
            TileState::Broken {
                beam: BeamCondition::Intact,
            },
        )
    }

    pub(crate) fn lay_tile(&mut self, cell: CellCoord) -> bool {
        self.advance(
            cell,
            TileState::Broken {
                beam: BeamCondition::Intact,
            },
            TileState::Complete,
        )
    }

    fn advance(&mut self, cell: CellCoord, from: TileState, to: TileState) -> bool {
        let Some(slot) = self.slot_mut(cell) else {
            return false;
        };
        if *slot != from {
            return false;
        }
        *slot = to;
        true
    }

    fn slot_mut(&mut self, cell: CellCoord) -> Option<&mut TileState> {
        let index = self.index(cell)?;
        self.tiles.get_mut(index)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }

    fn cell_at(&self, index: usize) -> CellCoord {
        let width = usize::try_from(self.columns).unwrap_or(usize::MAX).max(1);
        let column = u32::try_from(index % width).unwrap_or(u32::MAX);
        let row = u32::try_from(index / width).unwrap_or(u32::MAX);
        CellCoord::new(column, row)
    }
}

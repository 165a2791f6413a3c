//! Depot placement on the reserved row and the pickup gates.

use balcony_core::{CellCoord, DepotError, DepotKind, Inventory, Material, PlayerRole, Tuning};

/// Successful depot interaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pickup {
    /// The inventory was topped up to a full batch.
    Restocked {
        /// Material now carried.
        material: Material,
        /// Units now carried.
        units: u32,
    },
    /// The inventory was emptied into the disposal site.
    Disposed {
        /// Units discarded. Zero when nothing was carried.
        units: u32,
    },
}

/// Cells of the three depots on the reserved row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DepotLayout {
    wood: CellCoord,
    tile: CellCoord,
    disposal: CellCoord,
}

impl DepotLayout {
    /// Places wood bottom-left, tiles bottom-right and disposal in the middle.
    #[must_use]
    pub fn for_grid(columns: u32, rows: u32) -> Self {
        let row = rows.saturating_sub(1);
        let last_column = columns.saturating_sub(1);
        Self {
            wood: CellCoord::new(0, row),
            tile: CellCoord::new(last_column, row),
            disposal: CellCoord::new(columns / 2, row),
        }
    }

    /// Cell occupied by the provided depot.
    #[must_use]
    pub const fn cell(&self, depot: DepotKind) -> CellCoord {
        match depot {
            DepotKind::Wood => self.wood,
            DepotKind::Tile => self.tile,
            DepotKind::Disposal => self.disposal,
        }
    }

    /// Depot occupying the provided cell, if any.
    ///
    /// Disposal wins when a narrow grid stacks several depots on one cell.
    #[must_use]
    pub fn depot_at(&self, cell: CellCoord) -> Option<DepotKind> {
        [DepotKind::Disposal, DepotKind::Wood, DepotKind::Tile]
            .into_iter()
            .find(|depot| self.cell(*depot) == cell)
    }
}

/// Evaluates a depot request for the provided role and inventory.
///
/// Restocking sets the carried amount to the full batch rather than adding to
/// it, and is refused once the batch is already carried.
pub fn request(
    depot: DepotKind,
    role: PlayerRole,
    inventory: &mut Inventory,
    tuning: &Tuning,
) -> Result<Pickup, DepotError> {
    let material = match depot {
        DepotKind::Disposal => {
            return Ok(Pickup::Disposed {
                units: inventory.clear(),
            });
        }
        DepotKind::Wood => Material::Wood,
        DepotKind::Tile => Material::Tiles,
    };

    if role.material() != material {
        return Err(DepotError::WrongRole);
    }

    let batch = tuning.batch(material);
    if inventory.units() >= batch {
        return Err(DepotError::AlreadyFull);
    }

    inventory.restock(batch);
    Ok(Pickup::Restocked {
        material,
        units: batch,
    })
}

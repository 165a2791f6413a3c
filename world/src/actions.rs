//! Action resolver for hammer swings and material use.
//!
//! Every intent passes three gates in order: the vitality gate, the
//! carried-material precondition and the bounds check. A failed gate leaves
//! the world untouched. Once the gates pass, the action cost is charged even
//! when the tile under the player turns out to be in the wrong stage.

use balcony_core::{
    ActionError, ActionKind, ActionOutcome, BeamCondition, BeamResolution, CellCoord, Material,
    Tuning,
};
use rand::Rng;

use crate::grid::{Grid, Strike};
use crate::player::Player;

pub(crate) fn hammer(
    grid: &mut Grid,
    player: &mut Player,
    tuning: &Tuning,
    resolve_beam: impl FnOnce() -> BeamCondition,
) -> Result<(CellCoord, ActionOutcome), ActionError> {
    let cell = gate(grid, player, ActionKind::Hammer, tuning)?;
    player.vitality.spend(ActionKind::Hammer.cost(tuning));

    let outcome = match grid.strike(cell, resolve_beam) {
        Strike::Cracked(hits) => ActionOutcome::Struck { hits },
        Strike::Shattered(beam) => ActionOutcome::Broken { beam },
        Strike::Ignored => ActionOutcome::NotTargetable,
    };
    Ok((cell, outcome))
}

pub(crate) fn repair_or_place(
    grid: &mut Grid,
    player: &mut Player,
    tuning: &Tuning,
) -> Result<(CellCoord, ActionOutcome), ActionError> {
    let cell = gate(grid, player, ActionKind::RepairOrPlace, tuning)?;
    player.vitality.spend(ActionKind::RepairOrPlace.cost(tuning));

    let inventory = &mut player.inventory;
    let outcome = if inventory.wood() > 0 && grid.repair_beam(cell) {
        let _ = inventory.consume(Material::Wood);
        ActionOutcome::BeamRepaired
    } else if inventory.tiles() > 0 && grid.lay_tile(cell) {
        let _ = inventory.consume(Material::Tiles);
        ActionOutcome::TilePlaced
    } else {
        ActionOutcome::NotTargetable
    };
    Ok((cell, outcome))
}

pub(crate) fn resolve_beam<R: Rng + ?Sized>(
    resolution: BeamResolution,
    rng: &mut R,
) -> BeamCondition {
    match resolution {
        BeamResolution::CoinFlip => {
            if rng.gen_bool(0.5) {
                BeamCondition::Rotten
            } else {
                BeamCondition::Intact
            }
        }
        BeamResolution::AlwaysRotten => BeamCondition::Rotten,
        BeamResolution::AlwaysIntact => BeamCondition::Intact,
    }
}

fn gate(
    grid: &Grid,
    player: &Player,
    action: ActionKind,
    tuning: &Tuning,
) -> Result<CellCoord, ActionError> {
    if !player.vitality.can_act(tuning) {
        return Err(ActionError::Exhausted);
    }

    let empty_handed = player.inventory.is_empty();
    match action {
        ActionKind::Hammer if !empty_handed => return Err(ActionError::HandsFull),
        ActionKind::RepairOrPlace if empty_handed => return Err(ActionError::NothingToUse),
        _ => {}
    }

    match player.cell {
        Some(cell) if grid.contains(cell) => Ok(cell),
        _ => Err(ActionError::OutOfBounds),
    }
}

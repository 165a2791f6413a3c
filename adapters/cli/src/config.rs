//! Tuning file loading and validation.

use std::{fs, path::Path};

use anyhow::{bail, ensure, Context, Result};
use balcony_core::Tuning;

/// Largest playable area a tuning file may ask for.
pub(crate) const MAX_PLAYABLE_CELLS: u64 = 10_000;

/// Reads and validates a TOML tuning file.
pub(crate) fn load(path: &Path) -> Result<Tuning> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read tuning file {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid tuning file {}", path.display()))
}

/// Parses TOML tuning contents; missing keys keep their defaults.
pub(crate) fn parse(contents: &str) -> Result<Tuning> {
    let tuning: Tuning = toml::from_str(contents).context("failed to parse tuning toml contents")?;
    validate(&tuning)?;
    Ok(tuning)
}

pub(crate) fn validate(tuning: &Tuning) -> Result<()> {
    ensure!(tuning.columns > 0, "grid needs at least one column");
    ensure!(
        tuning.playable_rows() > 0,
        "grid needs one playable row above the depot row, got {} rows",
        tuning.rows
    );
    let cells = u64::from(tuning.columns) * u64::from(tuning.playable_rows());
    ensure!(
        cells <= MAX_PLAYABLE_CELLS,
        "grid of {}x{} has {cells} playable cells, at most {MAX_PLAYABLE_CELLS} are supported",
        tuning.columns,
        tuning.rows
    );
    ensure!(
        (0.0..=1.0).contains(&tuning.rot_fraction),
        "rot_fraction must lie in [0, 1], got {}",
        tuning.rot_fraction
    );
    ensure!(
        tuning.slow_factor > 0.0 && tuning.slow_factor <= 1.0,
        "slow_factor must lie in (0, 1], got {}",
        tuning.slow_factor
    );
    ensure!(
        tuning.wood_batch > 0 && tuning.tile_batch > 0,
        "depot batches must be positive"
    );

    let rates = [
        ("hammer_cost", tuning.hammer_cost),
        ("repair_cost", tuning.repair_cost),
        ("action_gate", tuning.action_gate),
        ("decay_per_second", tuning.decay_per_second),
        ("recovery_per_second", tuning.recovery_per_second),
        ("disposal_refund", tuning.disposal_refund),
        ("coffee_boost", tuning.coffee_boost),
        ("vitality_per_point", tuning.vitality_per_point),
        ("victory_boost", tuning.victory_boost),
    ];
    for (name, value) in rates {
        if !value.is_finite() || value < 0.0 {
            bail!("{name} must be a non-negative number, got {value}");
        }
    }

    if tuning.player_names.iter().any(|name| name.trim().is_empty()) {
        bail!("player names must not be blank");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use balcony_core::{DelayRange, ScoringMode};

    #[test]
    fn empty_file_yields_defaults() {
        assert_eq!(parse("").expect("defaults parse"), Tuning::default());
    }

    #[test]
    fn partial_file_overrides_selected_keys() {
        let tuning = parse(
            r#"
            seed = 7
            columns = 6
            rows = 4
            scoring = "contribution"
            player_names = ["Ada", "Linus"]
            spawn_delay = { min_ms = 500, max_ms = 900 }
            "#,
        )
        .expect("valid tuning");

        assert_eq!(tuning.seed, 7);
        assert_eq!((tuning.columns, tuning.rows), (6, 4));
        assert_eq!(tuning.scoring, ScoringMode::Contribution);
        assert_eq!(tuning.player_names, ["Ada".to_owned(), "Linus".to_owned()]);
        assert_eq!(tuning.spawn_delay, DelayRange::new(500, 900));
        assert_eq!(tuning.hammer_cost, Tuning::default().hammer_cost);
    }

    #[test]
    fn rejects_grid_without_playable_rows() {
        let error = parse("rows = 1").expect_err("single row is invalid");
        assert!(error.to_string().contains("playable row"), "{error}");
    }

    #[test]
    fn rejects_oversized_grids() {
        let error = parse("columns = 4000000000").expect_err("huge grid is invalid");
        assert!(error.to_string().contains("playable cells"), "{error}");

        let largest = parse("columns = 100\nrows = 101").expect("100x100 playable cells fit");
        assert_eq!(largest.playable_rows(), 100);
        assert!(parse("columns = 100\nrows = 102").is_err());
    }

    #[test]
    fn rejects_negative_costs() {
        let error = parse("hammer_cost = -2.0").expect_err("negative cost is invalid");
        assert!(error.to_string().contains("hammer_cost"), "{error}");
    }

    #[test]
    fn rejects_unknown_scoring_mode() {
        assert!(parse(r#"scoring = "fastest""#).is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let error = load(Path::new("does/not/exist.toml")).expect_err("missing file");
        assert!(format!("{error:#}").contains("does/not/exist.toml"));
    }
}

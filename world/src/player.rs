//! Per-player state and the vitality engine.

use std::time::Duration;

use balcony_core::{CellCoord, Inventory, PlayerRole, Tuning, VitalityLevel, MAX_VITALITY};

/// Continuous energy value clamped to `[0, 100]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vitality(f32);

impl Vitality {
    /// Vitality at its upper bound.
    #[must_use]
    pub const fn full() -> Self {
        Self(MAX_VITALITY)
    }

    /// Creates a vitality value, clamping it into range.
    #[must_use]
    pub fn new(value: f32) -> Self {
        Self(clamp(value))
    }

    /// Current vitality.
    #[must_use]
    pub const fn get(self) -> f32 {
        self.0
    }

    /// Vitality as a fraction of the maximum, for energy bars.
    #[must_use]
    pub fn fraction(self) -> f32 {
        self.0 / MAX_VITALITY
    }

    /// Colour band of the current vitality.
    #[must_use]
    pub fn level(self) -> VitalityLevel {
        VitalityLevel::classify(self.0)
    }

    /// Reports whether actions are allowed at the current vitality.
    #[must_use]
    pub fn can_act(self, tuning: &Tuning) -> bool {
        self.0 >= tuning.action_gate
    }

    /// Speed multiplier the movement collaborator must apply.
    #[must_use]
    pub fn speed_multiplier(self, tuning: &Tuning) -> f32 {
        if self.0 < tuning.slow_threshold {
            tuning.slow_factor
        } else {
            1.0
        }
    }

    /// Applies movement decay or idle recovery for one tick.
    ///
    /// A buffed player never loses vitality to movement.
    pub fn update(&mut self, dt: Duration, moving: bool, buffed: bool, tuning: &Tuning) {
        let seconds = dt.as_secs_f32();
        if !moving {
            self.0 += tuning.recovery_per_second * seconds;
        } else if !buffed {
            self.0 -= tuning.decay_per_second * seconds;
        }
        self.0 = clamp(self.0);
    }

    /// Adds vitality, clamping at both bounds.
    pub fn add(&mut self, amount: f32) {
        self.0 = clamp(self.0 + amount);
    }

    /// Spends vitality, never dropping below zero.
    pub fn spend(&mut self, amount: f32) {
        self.0 = clamp(self.0 - amount);
    }
}

fn clamp(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, MAX_VITALITY)
}

#[derive(Clone, Debug)]
pub(crate) struct Player {
    pub(crate) role: PlayerRole,
    pub(crate) name: String,
    pub(crate) cell: Option<CellCoord>,
    pub(crate) moving: bool,
    pub(crate) inventory: Inventory,
    pub(crate) vitality: Vitality,
    pub(crate) buff_expiry: Option<Duration>,
    pub(crate) contribution: u32,
    pub(crate) waste: u32,
}

impl Player {
    pub(crate) fn new(role: PlayerRole, name: String) -> Self {
        Self {
            role,
            name,
            cell: None,
            moving: false,
            inventory: Inventory::for_role(role),
            vitality: Vitality::full(),
            buff_expiry: None,
            contribution: 0,
            waste: 0,
        }
    }

    pub(crate) const fn buffed(&self) -> bool {
        self.buff_expiry.is_some()
    }

    /// Grants the coffee buff, replacing any running expiry.
    pub(crate) fn drink_coffee(&mut self, now: Duration, tuning: &Tuning) {
        self.vitality.add(tuning.coffee_boost);
        self.buff_expiry = Some(now.saturating_add(tuning.coffee_duration()));
    }

    /// Clears the buff once its expiry is reached. Returns whether it ended.
    pub(crate) fn expire_buff(&mut self, now: Duration) -> bool {
        match self.buff_expiry {
            Some(expiry) if now >= expiry => {
                self.buff_expiry = None;
                true
            }
            _ => false,
        }
    }
}

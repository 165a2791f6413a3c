//! Match clock and waste penalty ledger.

use std::time::Duration;

/// Elapsed-time tracker that stops exactly once, when the balcony is finished.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MatchClock {
    elapsed: Duration,
    running: bool,
    waste_units: u32,
    final_time: Option<Duration>,
}

impl MatchClock {
    /// Resets elapsed time and starts counting.
    pub fn start(&mut self) {
        *self = Self {
            running: true,
            ..Self::default()
        };
    }

    /// Adds simulated time while the clock runs.
    pub fn advance(&mut self, dt: Duration) {
        if self.running {
            self.elapsed = self.elapsed.saturating_add(dt);
        }
    }

    /// Records discarded units for the final penalty.
    pub fn record_waste(&mut self, units: u32) {
        self.waste_units = self.waste_units.saturating_add(units);
    }

    /// Stops the clock and fixes the penalized final time.
    ///
    /// Returns `None` if the clock was already finished.
    pub fn finish(&mut self, penalty_per_unit: Duration) -> Option<Duration> {
        if self.final_time.is_some() {
            return None;
        }
        self.running = false;
        let penalty = penalty_per_unit.saturating_mul(self.waste_units);
        let final_time = self.elapsed.saturating_add(penalty);
        self.final_time = Some(final_time);
        Some(final_time)
    }

    /// Time counted since the match started.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Reports whether the clock is counting.
    #[must_use]
    pub const fn running(&self) -> bool {
        self.running
    }

    /// Units discarded so far.
    #[must_use]
    pub const fn waste_units(&self) -> u32 {
        self.waste_units
    }

    /// Penalized completion time, once the match is over.
    #[must_use]
    pub const fn final_time(&self) -> Option<Duration> {
        self.final_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_counts_only_while_running() {
        let mut clock = MatchClock::default();
        clock.advance(Duration::from_secs(3));
        assert_eq!(clock.elapsed(), Duration::ZERO);

        clock.start();
        clock.advance(Duration::from_millis(1_500));
        assert!(clock.running());
        assert_eq!(clock.elapsed(), Duration::from_millis(1_500));
    }

    #[test]
    fn final_time_adds_one_second_per_waste_unit_and_triggers_once() {
        let mut clock = MatchClock::default();
        clock.start();
        clock.advance(Duration::from_secs(90));
        clock.record_waste(3);
        clock.record_waste(2);

        let penalty = Duration::from_secs(1);
        assert_eq!(clock.finish(penalty), Some(Duration::from_secs(95)));
        assert!(!clock.running());
        assert_eq!(clock.finish(penalty), None);

        clock.advance(Duration::from_secs(10));
        assert_eq!(clock.elapsed(), Duration::from_secs(90));
        assert_eq!(clock.final_time(), Some(Duration::from_secs(95)));
    }
}

//! Tunables for scenarios and tasks.
//!
//! Hours are hours of day (0–23) on the `SimClock` calendar; windows are
//! half-open `[start, end)` and may wrap past midnight.  Durations given in
//! hours are converted to ticks through the clock.

use tc_core::SimClock;

use crate::{BehaviorError, BehaviorResult};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BehaviorConfig {
    // ── Daily windows ─────────────────────────────────────────────────────
    pub work_start_hour:     u32,
    pub work_end_hour:       u32,
    pub school_start_hour:   u32,
    pub school_end_hour:     u32,
    pub shopping_start_hour: u32,
    pub shopping_end_hour:   u32,

    // ── Durations ─────────────────────────────────────────────────────────
    /// Length of one work shift.
    pub shift_hours:  u64,
    /// Length of one school day.
    pub lesson_hours: u64,

    /// Wait after a failed job / school search before trying again.
    pub search_cooldown_hours: u64,

    /// Idle time imposed after a failed plan.
    pub failure_backoff_ticks: u64,

    // ── Shopping ──────────────────────────────────────────────────────────
    /// Chance per idle tick, inside shopping hours, of starting a trip.
    pub shopping_chance: f64,
    /// Ticks a citizen waits in a shop queue before giving up.
    pub shopping_patience_ticks: u32,

    // ── Demography ────────────────────────────────────────────────────────
    /// Ticks per simulated year of age.
    pub ticks_per_year: u64,
    /// Age from which the yearly death chance starts to grow.
    pub mortality_start_age: u32,
    /// Added to the yearly death chance for every year past the start age.
    pub mortality_per_year: f64,
    /// Age at which death is certain.
    pub max_age: u32,
    pub birth_min_age: u32,
    pub birth_max_age: u32,
    /// Yearly chance of wanting a child, if the home has room.
    pub birth_chance: f64,

    // ── Upkeep ────────────────────────────────────────────────────────────
    /// Chance per building per tick that one of its utilities breaks.
    pub utility_failure_chance: f64,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            work_start_hour:         8,
            work_end_hour:           17,
            school_start_hour:       8,
            school_end_hour:         15,
            shopping_start_hour:     9,
            shopping_end_hour:       20,
            shift_hours:             8,
            lesson_hours:            6,
            search_cooldown_hours:   6,
            failure_backoff_ticks:   12,
            shopping_chance:         0.05,
            shopping_patience_ticks: 36,
            ticks_per_year:          12 * 24 * 2,
            mortality_start_age:     65,
            mortality_per_year:      0.02,
            max_age:                 100,
            birth_min_age:           20,
            birth_max_age:           45,
            birth_chance:            0.15,
            utility_failure_chance:  0.0005,
        }
    }
}

impl BehaviorConfig {
    /// Reject hours outside the day, probabilities outside `[0, 1]`, and a
    /// zero-length year.
    pub fn validate(&self) -> BehaviorResult<()> {
        let hours = [
            ("work_start_hour", self.work_start_hour),
            ("work_end_hour", self.work_end_hour),
            ("school_start_hour", self.school_start_hour),
            ("school_end_hour", self.school_end_hour),
            ("shopping_start_hour", self.shopping_start_hour),
            ("shopping_end_hour", self.shopping_end_hour),
        ];
        for (name, h) in hours {
            if h >= 24 {
                return Err(BehaviorError::Config(format!("{name} = {h} is not an hour of day")));
            }
        }
        let probabilities = [
            ("shopping_chance", self.shopping_chance),
            ("mortality_per_year", self.mortality_per_year),
            ("birth_chance", self.birth_chance),
            ("utility_failure_chance", self.utility_failure_chance),
        ];
        for (name, p) in probabilities {
            if !(0.0..=1.0).contains(&p) {
                return Err(BehaviorError::Config(format!("{name} = {p} is not a probability")));
            }
        }
        if self.ticks_per_year == 0 {
            return Err(BehaviorError::Config("ticks_per_year must be positive".into()));
        }
        if self.birth_min_age > self.birth_max_age {
            return Err(BehaviorError::Config("birth_min_age exceeds birth_max_age".into()));
        }
        Ok(())
    }

    #[inline]
    pub fn shift_ticks(&self, clock: &SimClock) -> u64 {
        clock.ticks_for_hours(self.shift_hours)
    }

    #[inline]
    pub fn lesson_ticks(&self, clock: &SimClock) -> u64 {
        clock.ticks_for_hours(self.lesson_hours)
    }

    #[inline]
    pub fn search_cooldown_ticks(&self, clock: &SimClock) -> u64 {
        clock.ticks_for_hours(self.search_cooldown_hours)
    }
}

//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter.  One tick is the time
//! an agent needs to cross one tile at default speed.  The mapping to a
//! day/hour calendar is held in `SimClock`:
//!
//!   hour_of_day = (tick / ticks_per_hour) % 24
//!   day         =  tick / (ticks_per_hour * 24)
//!
//! The core treats ticks as opaque strictly-increasing tokens; only the
//! scenario predicates (work hours, shopping hours) look at the calendar.

use std::fmt;

/// Hours in one simulated day.
pub const HOURS_PER_DAY: u64 = 24;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self`, zero if `earlier` is later.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Converts between tick counts and the day/hour calendar.
///
/// `SimClock` is cheap to copy and intentionally holds no heap data.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// How many ticks make one simulated hour.  Always at least 1.
    pub ticks_per_hour: u32,
    /// The current tick, advanced by `SimClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl SimClock {
    /// Create a clock at tick 0 with the given resolution.
    pub fn new(ticks_per_hour: u32) -> Self {
        Self {
            ticks_per_hour: ticks_per_hour.max(1),
            current_tick:   Tick::ZERO,
        }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    #[inline]
    pub fn ticks_per_day(&self) -> u64 {
        self.ticks_per_hour as u64 * HOURS_PER_DAY
    }

    /// Hour of day (0–23) for `tick`.
    #[inline]
    pub fn hour_of_day(&self, tick: Tick) -> u32 {
        ((tick.0 / self.ticks_per_hour as u64) % HOURS_PER_DAY) as u32
    }

    /// Whole days elapsed at `tick`.
    #[inline]
    pub fn day(&self, tick: Tick) -> u64 {
        tick.0 / self.ticks_per_day()
    }

    /// `true` if `tick` falls in the half-open hour window `[start, end)`.
    /// A window with `start > end` wraps past midnight.
    pub fn in_hours(&self, tick: Tick, start: u32, end: u32) -> bool {
        let h = self.hour_of_day(tick);
        if start <= end {
            h >= start && h < end
        } else {
            h >= start || h < end
        }
    }

    // ── Tick-count helpers ────────────────────────────────────────────────

    #[inline]
    pub fn ticks_for_hours(&self, hours: u64) -> u64 {
        hours * self.ticks_per_hour as u64
    }

    #[inline]
    pub fn ticks_for_days(&self, days: u64) -> u64 {
        days * self.ticks_per_day()
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = self.current_tick;
        let within_hour = t.0 % self.ticks_per_hour as u64;
        write!(
            f,
            "{} (day {} {:02}h+{})",
            t,
            self.day(t),
            self.hour_of_day(t),
            within_hour
        )
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level run configuration.
///
/// Typically loaded from a TOML file by `tc-sim` and passed to the simulation
/// builder.  Missing fields fall back to [`SimConfig::default`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Ticks per simulated hour.  Default: 12 (one tile every five minutes).
    pub ticks_per_hour: u32,

    /// Total ticks to simulate.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Call `SimObserver::on_snapshot` every N ticks.  0 disables snapshots.
    pub snapshot_interval_ticks: u64,
}

impl SimConfig {
    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.ticks_per_hour)
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            ticks_per_hour:          12,
            total_ticks:             12 * 24 * 7,
            seed:                    0,
            snapshot_interval_ticks: 12 * 24,
        }
    }
}

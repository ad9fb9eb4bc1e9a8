//! Simulation observer trait for progress reporting and data collection.

use tc_agent::CitizenStore;
use tc_behavior::SimEvent;
use tc_core::Tick;
use tc_registry::BuildingRegistry;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: birth and death counter
///
/// ```rust,ignore
/// #[derive(Default)]
/// struct Demography { born: usize, died: usize }
///
/// impl SimObserver for Demography {
///     fn on_tick_end(&mut self, _tick: Tick, events: &[SimEvent]) {
///         for e in events {
///             match e {
///                 SimEvent::Born { .. } => self.born += 1,
///                 SimEvent::Died { .. } => self.died += 1,
///                 _ => {}
///             }
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick with the events that tick produced.
    fn on_tick_end(&mut self, _tick: Tick, _events: &[SimEvent]) {}

    /// Called every `config.snapshot_interval_ticks` ticks with read-only
    /// access to citizens and buildings.
    fn on_snapshot(&mut self, _tick: Tick, _citizens: &CitizenStore, _registry: &BuildingRegistry) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

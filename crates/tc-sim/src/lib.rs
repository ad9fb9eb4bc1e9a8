//! `tc-sim`: tick loop orchestrator for the tilecity simulation.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Upkeep     : commercial queues admit waiting customers; utilities
//!                   break at random (SimRng).
//!   ② Citizens   : ascending CitizenId:
//!                     handle(state)      → run current task, exit transition
//!                     Scheduler::plan    → refill an empty queue
//!   ③ Demography : dead citizens leave every roster and the store;
//!                   birth wishes become newborns at the parent's home.
//!   ④ Observers  : on_tick_end(tick, events of this tick), snapshots.
//! ```
//!
//! Everything that happens is appended to a [`SimEvent`] log that callers
//! drain with [`Sim::drain_events`].
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use tc_sim::{NoopObserver, SimBuilder, SimSettings};
//! use tc_spatial::AStarPathFinder;
//!
//! let settings = SimSettings::load("town.toml".as_ref())?;
//! let mut sim = SimBuilder::new(settings.sim, map, registry, AStarPathFinder)
//!     .behavior(settings.behavior)
//!     .citizens(population)
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! ```
//!
//! [`SimEvent`]: tc_behavior::SimEvent

pub mod builder;
pub mod error;
pub mod observer;
pub mod settings;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use settings::SimSettings;
pub use sim::{Census, Sim};

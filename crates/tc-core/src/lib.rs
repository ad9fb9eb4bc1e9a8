//! `tc-core`: foundational types for the `tilecity` simulation.
//!
//! This crate is a dependency of every other `tc-*` crate.  It has no `tc-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `CitizenId`, `BuildingId` (generational handle)       |
//! | [`geo`]         | `Position`, `Area`, `Placement`                       |
//! | [`time`]        | `Tick`, `SimClock`, `SimConfig`                       |
//! | [`rng`]         | `AgentRng` (per-citizen), `SimRng` (global)           |
//! | [`nav`]         | `NavKind` enum                                        |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod nav;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{Area, Placement, Position};
pub use ids::{BuildingId, CitizenId};
pub use nav::NavKind;
pub use rng::{AgentRng, SimRng};
pub use time::{SimClock, SimConfig, Tick};

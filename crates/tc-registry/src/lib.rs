//! `tc-registry`: where every building is, and what it offers.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                    |
//! |-----------------|-------------------------------------------------------------|
//! | [`registry`]    | `BuildingRegistry`: generational arena, R-tree, changelog  |
//! | [`facility`]    | `Facility` trait, `FacilityTable`, `FacilityMap`            |
//! | [`facilities`]  | `Housing`, `Workplace`, `School`, `Commercial`, `Utilities` |
//! | [`error`]       | `RegistryError`, `RegistryResult<T>`                        |
//!
//! # Ownership
//!
//! The registry is the single source of truth for "where is building X".
//! Tiles only carry an [`Occupant`][tc_spatial::Occupant] back-reference and
//! citizens only hold [`BuildingId`][tc_core::BuildingId] handles.  Removing
//! a building bumps its slot generation, so stale handles resolve to `None`
//! everywhere at once.
//!
//! # Changelog
//!
//! Placements and removals are appended to an event log instead of firing
//! callbacks.  Consumers (a UI adapter, the demo's summary) call
//! [`BuildingRegistry::drain_events`] once per tick.

pub mod error;
pub mod facilities;
pub mod facility;
pub mod registry;

#[cfg(test)]
mod tests;

pub use error::{RegistryError, RegistryResult};
pub use facilities::{Commercial, Housing, School, UtilityKind, Utilities, Workplace};
pub use facility::{Facility, FacilityMap, FacilityTable, TypedFacilityTable};
pub use registry::{BuildingKind, BuildingRegistry, RegistryEvent};

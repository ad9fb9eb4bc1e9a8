//! `tc-mobility`: moving entities and the movement service.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`state`]   | `MovingEntity`: position, target, cached path, speed           |
//! | [`service`] | `EntityMovement` trait, `EntityMovementService<F>`, `Step`      |
//! | [`error`]   | `MobilityError`, `MobilityResult<T>`                            |
//!
//! # Movement model (one tile per step)
//!
//! 1. [`EntityMovement::set_target`] stores the target and plans a path
//!    through a pluggable [`PathFinder`][tc_spatial::PathFinder].
//! 2. Each call to [`EntityMovement::play_movement`] dequeues at most one
//!    tile, gated by the entity's `ticks_per_tile`.
//! 3. The cached path is tagged with the target and map revision it was
//!    planned for.  It is replanned only when that tag no longer matches,
//!    never on every tick.
//! 4. The service never touches behavioural state.  A failed plan leaves the
//!    path empty and the calling task decides what to do.

pub mod error;
pub mod service;
pub mod state;

#[cfg(test)]
mod tests;

pub use error::{MobilityError, MobilityResult};
pub use service::{EntityMovement, EntityMovementService, Step};
pub use state::MovingEntity;

//! Per-entity movement state.

use std::collections::VecDeque;

use tc_core::{Position, Tick};

/// A grid-bound entity that walks towards a target one tile at a time.
///
/// # Invariant
///
/// When `path` is non-empty its last element is the target the path was
/// planned for.  `planned_for` records that target and the map revision; if
/// either differs from the current `target` / map revision the path is stale
/// and must be replanned before it is trusted.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovingEntity {
    /// Tile the entity currently stands on.
    pub position: Position,

    /// Tile the entity is heading to.  Equals `position` when stationary.
    pub target: Position,

    /// Remaining tiles to step onto, excluding `position`.
    pub path: VecDeque<Position>,

    /// Minimum ticks between two steps.  1 = one tile per tick.
    pub ticks_per_tile: u32,

    /// Tick of the most recent step, `None` before the first.
    pub last_step: Option<Tick>,

    /// `(target, map revision)` of the last planning attempt.
    pub planned_for: Option<(Position, u64)>,
}

impl MovingEntity {
    /// A stationary entity standing on `position`.
    pub fn at(position: Position) -> Self {
        Self {
            position,
            target:         position,
            path:           VecDeque::new(),
            ticks_per_tile: 1,
            last_step:      None,
            planned_for:    None,
        }
    }

    /// Builder-style speed setter.  Zero is treated as 1.
    pub fn with_speed(mut self, ticks_per_tile: u32) -> Self {
        self.ticks_per_tile = ticks_per_tile.max(1);
        self
    }

    /// `true` when the entity stands on its target.
    ///
    /// This is the only arrival predicate in the simulation; tasks never
    /// infer arrival from distances.
    #[inline]
    pub fn has_arrived(&self) -> bool {
        self.position == self.target
    }

    /// Number of tiles still queued.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.path.len()
    }

    /// `true` if the cached path was planned for a different target or an
    /// older map revision (or never planned at all).
    pub fn is_path_stale(&self, map_revision: u64) -> bool {
        match self.planned_for {
            Some((target, revision)) => target != self.target || revision != map_revision,
            None => true,
        }
    }

    /// `true` if enough ticks have passed since the previous step.
    #[inline]
    pub fn ready_to_step(&self, now: Tick) -> bool {
        match self.last_step {
            Some(prev) => now.since(prev) >= self.ticks_per_tile.max(1) as u64,
            None => true,
        }
    }

    /// Drop the cached path and its planning tag.
    pub fn clear_path(&mut self) {
        self.path.clear();
        self.planned_for = None;
    }

    /// Place the entity on `position` without walking, cancelling any trip.
    pub fn teleport(&mut self, position: Position) {
        self.position = position;
        self.target = position;
        self.clear_path();
    }

    /// Abandon the current trip and stay where the entity is.
    pub fn stop(&mut self) {
        self.target = self.position;
        self.clear_path();
    }
}

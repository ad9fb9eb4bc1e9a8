//! Spatial-subsystem error type.

use thiserror::Error;

use tc_core::{BuildingId, Position};

/// Errors produced by `tc-spatial`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpatialError {
    /// A tile access outside `[0, width) x [0, height)`.  Always a caller bug.
    #[error("position {pos} is outside the {width}x{height} grid")]
    OutOfBounds { pos: Position, width: u32, height: u32 },

    /// The search exhausted every reachable tile without touching the goal.
    #[error("no path from {from} to {to}")]
    NoPath { from: Position, to: Position },

    /// The goal itself can't be entered under the requested profile.
    #[error("goal {0} is not enterable")]
    GoalNotEnterable(Position),

    #[error("tile {pos} is already occupied by {by}")]
    Occupied { pos: Position, by: BuildingId },

    #[error("map parse error: {0}")]
    Parse(String),
}

pub type SpatialResult<T> = Result<T, SpatialError>;

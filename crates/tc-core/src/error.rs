//! Shared error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant through `#[from]`.

use thiserror::Error;

use crate::{CitizenId, Position};

/// The base error type for `tc-core` and a common building block for
/// sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("position {pos} is outside the {width}x{height} grid")]
    OutOfBounds { pos: Position, width: u32, height: u32 },

    #[error("citizen {0} not found")]
    CitizenNotFound(CitizenId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `tc-*` crates.
pub type CoreResult<T> = Result<T, CoreError>;

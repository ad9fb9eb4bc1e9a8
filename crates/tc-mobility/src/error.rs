use tc_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MobilityError {
    #[error("path planning failed: {0}")]
    Routing(#[from] SpatialError),
}

pub type MobilityResult<T> = Result<T, MobilityError>;

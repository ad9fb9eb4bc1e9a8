use tc_core::BuildingId;
use tc_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The handle was never issued or its building has been removed.
    #[error("unknown building {0}")]
    UnknownBuilding(BuildingId),

    #[error("footprint has zero width or height")]
    EmptyFootprint,

    #[error(transparent)]
    Spatial(#[from] SpatialError),
}

pub type RegistryResult<T> = Result<T, RegistryError>;

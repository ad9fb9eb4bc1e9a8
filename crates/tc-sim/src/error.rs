use tc_agent::AgentError;
use tc_behavior::BehaviorError;
use tc_core::{BuildingId, Position};
use tc_registry::RegistryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("citizen #{index} starts at {position}, outside the map")]
    OutOfMap { index: usize, position: Position },

    #[error("citizen #{index} names a home at {tile}, but no building covers that tile")]
    NoBuildingAt { index: usize, tile: Position },

    #[error("citizen #{index}: home {home} does not exist or is not housing")]
    NotHousing { index: usize, home: BuildingId },

    #[error("citizen #{index}: home {home} is full")]
    HomeFull { index: usize, home: BuildingId },

    #[error(transparent)]
    Behavior(#[from] BehaviorError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error("settings parse error: {0}")]
    Settings(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;

use tc_core::CitizenId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("citizen {0} not found")]
    NotFound(CitizenId),

    #[error("citizen {0} already exists")]
    Duplicate(CitizenId),

    #[error("population parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AgentResult<T> = Result<T, AgentError>;

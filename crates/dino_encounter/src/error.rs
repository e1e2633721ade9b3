//! Error types for the encounter engine

use dino_core::AgentId;
use dino_defs::DefinitionError;
use thiserror::Error;

/// Encounter engine errors
#[derive(Debug, Error)]
pub enum EncounterError {
    /// A species or boss id is not in the definition registry
    #[error("Definition not found: {0}")]
    DefinitionNotFound(String),

    /// Definitions failed to load or validate
    #[error("Definition error: {0}")]
    Definitions(DefinitionError),

    /// No spawn point, known or generated, is usable
    #[error("No valid spawn position")]
    NoValidSpawnPosition,

    #[error("Unknown agent: {0}")]
    UnknownAgent(AgentId),

    /// The world produced a non-finite position for an agent
    #[error("Invalid position for {0}")]
    InvalidPosition(AgentId),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The encounter service thread is no longer running
    #[error("Encounter service stopped")]
    ServiceStopped,

    #[error("Failed to start service thread: {0}")]
    Spawn(#[from] std::io::Error),
}

impl From<DefinitionError> for EncounterError {
    fn from(error: DefinitionError) -> Self {
        match error {
            DefinitionError::NotFound(id) => Self::DefinitionNotFound(id),
            other => Self::Definitions(other),
        }
    }
}

/// Result type for encounter operations
pub type Result<T> = std::result::Result<T, EncounterError>;

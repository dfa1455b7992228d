//! Error types for the combat engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CombatError {
    #[error("Invalid enemy definition: {0}")]
    InvalidDefinition(String),

    #[error("Entity not found: {0}")]
    EntityNotFound(u32),

    #[error("No combat encounter is active")]
    NotInCombat,

    #[error("Invalid combat action: {0}")]
    InvalidAction(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CombatError>;

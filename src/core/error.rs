use crate::core::types::{Location, PlayerId};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Location {0} is not on the map")]
    NotOnMap(Location),

    #[error("No spawn location available")]
    NoSpawnAvailable,

    #[error("Decision protocol error: {0}")]
    DecisionProtocol(#[from] DecisionError),

    #[error("Structural invariant violated: {0}")]
    StructuralInvariantViolation(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Invalid worker endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),

    #[error("Player already in game: {0}")]
    DuplicatePlayer(PlayerId),

    #[error("Cell {0} is already occupied")]
    CellOccupied(Location),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    ConfigError(#[from] toml::de::Error),
}

/// Everything that can go wrong while asking a worker for an action.
///
/// These never escape `AvatarRuntime::decide`; the avatar waits instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecisionError {
    #[error("Could not connect to worker: {0}")]
    Unreachable(String),

    #[error("Worker did not answer within {0:?}")]
    Timeout(Duration),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed decision payload: {0}")]
    MalformedPayload(String),

    #[error("Unknown action type: {0}")]
    UnknownAction(String),

    #[error("Invalid options for {action}: {reason}")]
    InvalidOptions { action: String, reason: String },
}

impl From<reqwest::Error> for DecisionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() {
            DecisionError::Unreachable(e.to_string())
        } else if e.is_decode() {
            DecisionError::MalformedPayload(e.to_string())
        } else {
            DecisionError::Transport(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, GameError>;

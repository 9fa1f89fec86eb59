//! Error types for audio output and score storage.

use thiserror::Error;

/// Result type for audio operations.
pub type AudioResult<T> = Result<T, AudioError>;

/// Result type for score storage operations.
pub type ScoreResult<T> = Result<T, ScoreError>;

/// Errors raised while opening an audio output.
///
/// These never reach the game loop: a failed open leaves the game silent.
#[derive(Debug, Error)]
pub enum AudioError {
    /// No output device available.
    #[error("no audio output device available")]
    NoDevice,

    /// The device rejected its default configuration.
    #[error("audio config error: {0}")]
    Config(String),

    /// Building the output stream failed.
    #[error("failed to build output stream: {0}")]
    BuildStream(String),

    /// Starting the output stream failed.
    #[error("failed to start output stream: {0}")]
    PlayStream(String),

    /// The backend was already consumed by an earlier open.
    #[error("audio backend already opened")]
    AlreadyOpened,
}

/// Errors raised by the score store.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be (de)serialized.
    #[error("invalid score data: {0}")]
    Json(#[from] serde_json::Error),
}

/// A difficulty label that is not easy, medium or hard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown difficulty '{0}' (expected easy, medium or hard)")]
pub struct UnknownDifficulty(pub String);

/// A pitch name that is not a single letter C through B.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown pitch '{0}'")]
pub struct UnknownPitch(pub String);

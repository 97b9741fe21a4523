use crate::domain::state::Phase;
use std::time::Duration;
use thiserror::Error;

pub const INITIALIZATION_MESSAGE: &str = "there was a problem initializing the payment form";

/// Errors raised by collaborators, stores and the command-line surface.
#[derive(Error, Debug)]
pub enum UpdaterError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[cfg(feature = "storage-rocksdb")]
    #[error("Storage error: {0}")]
    StorageError(#[from] rocksdb::Error),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("{0}")]
    Tokenizer(String),
    #[error("{0}")]
    Challenge(String),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("Internal error: {0}")]
    InternalError(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, UpdaterError>;

/// Failures surfaced to the user interface.
///
/// Each variant renders as a single human-readable message. Callers only ever
/// see that text through [`crate::domain::state::WorkflowState::error_message`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    /// Local precondition failure. No collaborator was contacted.
    #[error("{0}")]
    Initialization(String),
    /// The tokenizer rejected the card or failed to produce a token.
    #[error("there was a problem with the payment processor: {0}")]
    Tokenization(String),
    /// The replacement request never reached a usable response.
    #[error("there was an issue updating your card details")]
    Transport,
    /// Verification failed, or the processor refused without offering a challenge.
    #[error("{0}")]
    Challenge(String),
}

impl WorkflowError {
    pub fn uninitialized() -> Self {
        Self::Initialization(INITIALIZATION_MESSAGE.to_string())
    }
}

/// An event that is not legal in the current phase.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot apply {event} while {from:?}")]
pub struct TransitionError {
    pub from: Phase,
    pub event: &'static str,
}

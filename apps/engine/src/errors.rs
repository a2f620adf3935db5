use thiserror::Error;

use crate::llm_client::LlmError;

/// Engine-level error type.
///
/// Only [`EngineError::Configuration`] and [`EngineError::PermissionDenied`]
/// ever reach the caller of `simulate_interview`: generation failures inside
/// the round loop end the loop early (the partial transcript is kept), and
/// failures inside the assessment pipeline are recovered by deterministic
/// fallbacks.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Generation backend is disabled")]
    PermissionDenied,

    #[error("Generation error: {0}")]
    Generation(#[from] LlmError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

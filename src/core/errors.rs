// src/core/errors.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExplainError {
    /// Missing or empty constructor inputs, bad arity, or out-of-range parameters.
    #[error("Invalid Argument: {0}")]
    InvalidArgument(String),
    /// The explanation engine could not be built for this model.
    #[error("Engine Initialization Error: {0}")]
    EngineInitialization(String),
    /// The engine returned values that cannot be resolved to one value per feature.
    #[error("Engine Output Error: {0}")]
    EngineOutput(String),
    #[error("Model Prediction Error: {0}")]
    ModelPrediction(String),
    #[error("Ndarray Error: {0}")]
    Ndarray(#[from] ndarray::ShapeError),
}

impl ExplainError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        ExplainError::InvalidArgument(msg.into())
    }

    pub(crate) fn engine_output(msg: impl Into<String>) -> Self {
        ExplainError::EngineOutput(msg.into())
    }
}

// Convenience type alias for Result
pub type Result<T> = std::result::Result<T, ExplainError>;

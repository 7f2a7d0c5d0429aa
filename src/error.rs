use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised by the pipeline's collaborators.
///
/// The `Display` text of each variant is what ends up in the `errors` field of
/// a failed response, so messages are written for the caller, not for logs.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Model path {} is not a directory.", .0.display())]
    NotADirectory(PathBuf),

    #[error("Artifact not found: {}", .0.display())]
    ArtifactNotFound(PathBuf),

    #[error("Tokenization error: {0}")]
    Tokenization(String),

    #[error("Invalid vectorizer: {0}")]
    Vectorizer(String),

    #[error("Unsupported activation: {0}")]
    Activation(String),

    #[error("Classifier must have exactly 2 output classes, found {0}")]
    ClassCount(usize),

    #[error("Feature width {found} does not match classifier input width {expected}")]
    FeatureWidth { expected: usize, found: usize },

    #[error("Classifier returned {scores} score vectors for {messages} messages")]
    ScoreCount { scores: usize, messages: usize },

    #[error("Classifier returned an empty score vector for message {0}")]
    EmptyScores(usize),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Candle(#[from] candle_core::Error),

    #[error("{0}")]
    Hub(#[from] hf_hub::api::sync::ApiError),

    #[error("{0}")]
    Internal(String),
}

impl Error {
    pub fn vectorizer(msg: impl Into<String>) -> Self {
        Self::Vectorizer(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

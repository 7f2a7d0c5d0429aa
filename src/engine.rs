use candle_core::Tensor;

use crate::Result;

/// Splits raw text into the normalized tokens the encoder's vocabulary was
/// built from.
pub trait Tokenize: Send + Sync {
    fn tokenize(&self, text: &str) -> Result<Vec<String>>;
}

/// Turns messages into a dense `(messages, features)` matrix.
pub trait FeatureEncoder: Send {
    fn transform(&self, messages: &[String]) -> Result<Tensor>;
}

/// Scores a feature matrix, one class-score vector per row.
pub trait Classifier: Send {
    fn predict(&self, features: &Tensor) -> Result<Vec<Vec<f32>>>;
}

/// Loads fresh collaborator instances for one invocation.
pub trait ArtifactLoader: Send + Sync {
    fn load_classifier(&self) -> Result<Box<dyn Classifier>>;

    fn load_encoder(&self) -> Result<Box<dyn FeatureEncoder>>;
}

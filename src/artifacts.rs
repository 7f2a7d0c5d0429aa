use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};
use std::path::PathBuf;

use crate::config::Config;
use crate::encoder::VectorizerState;
use crate::engine::{ArtifactLoader, Classifier, FeatureEncoder};
use crate::mlp_engine::MlpClassifier;
use crate::normalizer::TextNormalizer;
use crate::{Error, Result};

pub const CLASSIFIER_CONFIG_FILE: &str = "config.json";
pub const SAFETENSORS_WEIGHTS_FILE: &str = "model.safetensors";
pub const PTH_WEIGHTS_FILE: &str = "pytorch_model.bin";
pub const VECTORIZER_FILE: &str = "vectorizer.json";

/// Where the trained artifacts live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactSource {
    Local(PathBuf),
    Hub { model_id: String, revision: String },
}

impl From<&Config> for ArtifactSource {
    fn from(config: &Config) -> Self {
        match &config.model_id {
            Some(model_id) => Self::Hub {
                model_id: model_id.clone(),
                revision: config.model_revision.clone(),
            },
            None => Self::Local(config.model_path.clone()),
        }
    }
}

/// Reads the classifier and encoder artifacts fresh on every load.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    source: ArtifactSource,
    use_pth: bool,
    cpu: bool,
}

impl ArtifactStore {
    pub fn new(source: ArtifactSource, use_pth: bool, cpu: bool) -> Self {
        Self {
            source,
            use_pth,
            cpu,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(ArtifactSource::from(config), config.use_pth, config.cpu_only)
    }

    pub fn source(&self) -> &ArtifactSource {
        &self.source
    }

    /// Resolves one artifact file to a local path.
    pub fn fetch(&self, filename: &str) -> Result<PathBuf> {
        match &self.source {
            ArtifactSource::Local(base_path) => {
                if !base_path.is_dir() {
                    return Err(Error::NotADirectory(base_path.clone()));
                }
                let path = base_path.join(filename);
                if !path.is_file() {
                    return Err(Error::ArtifactNotFound(path));
                }
                Ok(path)
            }
            ArtifactSource::Hub { model_id, revision } => {
                let repo = Repo::with_revision(model_id.clone(), RepoType::Model, revision.clone());
                let api = Api::new()?;
                Ok(api.repo(repo).get(filename)?)
            }
        }
    }

    fn weights_file(&self) -> &'static str {
        if self.use_pth {
            PTH_WEIGHTS_FILE
        } else {
            SAFETENSORS_WEIGHTS_FILE
        }
    }
}

impl ArtifactLoader for ArtifactStore {
    #[tracing::instrument(skip(self), fields(source = ?self.source))]
    fn load_classifier(&self) -> Result<Box<dyn Classifier>> {
        let config_path = self.fetch(CLASSIFIER_CONFIG_FILE)?;
        let weights_path = self.fetch(self.weights_file())?;
        let classifier = MlpClassifier::load(&config_path, &weights_path, self.use_pth, self.cpu)?;
        Ok(Box::new(classifier))
    }

    #[tracing::instrument(skip(self), fields(source = ?self.source))]
    fn load_encoder(&self) -> Result<Box<dyn FeatureEncoder>> {
        let state = VectorizerState::from_file(&self.fetch(VECTORIZER_FILE)?)?;
        // The lemmatizer may only map onto terms the vocabulary was fitted on.
        let normalizer = TextNormalizer::english(state.terms().cloned().collect::<Vec<_>>());
        Ok(Box::new(state.bind(normalizer)))
    }
}

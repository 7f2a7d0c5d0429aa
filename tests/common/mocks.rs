use candle_core::{DType, Device, Tensor};
use spam_or_ham::{
    Error, Result,
    engine::{ArtifactLoader, Classifier, FeatureEncoder},
};
use std::sync::{Arc, Mutex};

/// Mock classifier returning canned score vectors
#[derive(Debug, Clone)]
pub struct MockClassifier {
    pub scores: Vec<Vec<f32>>,
    pub error: Option<String>,
    pub seen_shapes: Arc<Mutex<Vec<Vec<usize>>>>,
}

impl Classifier for MockClassifier {
    fn predict(&self, features: &Tensor) -> Result<Vec<Vec<f32>>> {
        self.seen_shapes
            .lock()
            .unwrap()
            .push(features.dims().to_vec());
        match &self.error {
            Some(error) => Err(Error::internal(error.clone())),
            None => Ok(self.scores.clone()),
        }
    }
}

/// Mock encoder producing a zero matrix of a fixed width
#[derive(Debug, Clone)]
pub struct MockEncoder {
    pub width: usize,
    pub error: Option<String>,
}

impl FeatureEncoder for MockEncoder {
    fn transform(&self, messages: &[String]) -> Result<Tensor> {
        if let Some(error) = &self.error {
            return Err(Error::internal(error.clone()));
        }
        Ok(Tensor::zeros(
            (messages.len(), self.width),
            DType::F32,
            &Device::Cpu,
        )?)
    }
}

/// Mock artifact loader handing out fresh mock collaborators
#[derive(Debug, Clone)]
pub struct MockLoader {
    pub scores: Vec<Vec<f32>>,
    pub classifier_load_error: Option<String>,
    pub encoder_load_error: Option<String>,
    pub predict_error: Option<String>,
    pub transform_error: Option<String>,
    pub classifier_loads: Arc<Mutex<usize>>,
    pub encoder_loads: Arc<Mutex<usize>>,
    pub seen_shapes: Arc<Mutex<Vec<Vec<usize>>>>,
}

impl MockLoader {
    pub fn new() -> Self {
        Self {
            scores: Vec::new(),
            classifier_load_error: None,
            encoder_load_error: None,
            predict_error: None,
            transform_error: None,
            classifier_loads: Arc::new(Mutex::new(0)),
            encoder_loads: Arc::new(Mutex::new(0)),
            seen_shapes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_scores(mut self, scores: Vec<Vec<f32>>) -> Self {
        self.scores = scores;
        self
    }

    pub fn with_classifier_load_error(mut self, error: &str) -> Self {
        self.classifier_load_error = Some(error.to_string());
        self
    }

    pub fn with_encoder_load_error(mut self, error: &str) -> Self {
        self.encoder_load_error = Some(error.to_string());
        self
    }

    pub fn with_predict_error(mut self, error: &str) -> Self {
        self.predict_error = Some(error.to_string());
        self
    }

    pub fn with_transform_error(mut self, error: &str) -> Self {
        self.transform_error = Some(error.to_string());
        self
    }

    pub fn classifier_loads(&self) -> usize {
        *self.classifier_loads.lock().unwrap()
    }

    pub fn encoder_loads(&self) -> usize {
        *self.encoder_loads.lock().unwrap()
    }

    pub fn seen_shapes(&self) -> Vec<Vec<usize>> {
        self.seen_shapes.lock().unwrap().clone()
    }
}

impl ArtifactLoader for MockLoader {
    fn load_classifier(&self) -> Result<Box<dyn Classifier>> {
        *self.classifier_loads.lock().unwrap() += 1;
        if let Some(error) = &self.classifier_load_error {
            return Err(Error::internal(error.clone()));
        }
        Ok(Box::new(MockClassifier {
            scores: self.scores.clone(),
            error: self.predict_error.clone(),
            seen_shapes: self.seen_shapes.clone(),
        }))
    }

    fn load_encoder(&self) -> Result<Box<dyn FeatureEncoder>> {
        *self.encoder_loads.lock().unwrap() += 1;
        if let Some(error) = &self.encoder_load_error {
            return Err(Error::internal(error.clone()));
        }
        Ok(Box::new(MockEncoder {
            width: 3,
            error: self.transform_error.clone(),
        }))
    }
}

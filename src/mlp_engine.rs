use candle_core::utils::{cuda_is_available, metal_is_available};
use candle_core::{DType, Device, Tensor};
use candle_nn::ops::{sigmoid, softmax};
use candle_nn::{Linear, Module, VarBuilder, linear};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

use crate::engine::Classifier;
use crate::{Error, Result};

/// Number of classes the binary ham/spam label mapping is defined for.
pub const NUM_CLASSES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Relu,
    Gelu,
    Tanh,
    Sigmoid,
}

impl FromStr for Activation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "relu" => Ok(Self::Relu),
            "gelu" => Ok(Self::Gelu),
            "tanh" => Ok(Self::Tanh),
            "sigmoid" => Ok(Self::Sigmoid),
            other => Err(Error::Activation(other.to_string())),
        }
    }
}

impl Activation {
    fn apply(&self, xs: &Tensor) -> Result<Tensor> {
        let ys = match self {
            Self::Relu => xs.relu()?,
            Self::Gelu => xs.gelu()?,
            Self::Tanh => xs.tanh()?,
            Self::Sigmoid => sigmoid(xs)?,
        };
        Ok(ys)
    }
}

/// Architecture of the trained network (`config.json`).
#[derive(Debug, Clone, Deserialize)]
pub struct MlpConfig {
    pub input_dim: usize,
    #[serde(default)]
    pub hidden_sizes: Vec<usize>,
    #[serde(default = "default_activation")]
    pub activation: String,
    pub num_classes: usize,
}

fn default_activation() -> String {
    "relu".to_string()
}

impl MlpConfig {
    /// Reads `config.json`, rejecting anything but a two-class head before
    /// any weights are touched.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        if config.num_classes != NUM_CLASSES {
            return Err(Error::ClassCount(config.num_classes));
        }
        Ok(config)
    }
}

pub fn device(cpu: bool) -> Result<Device> {
    if cpu {
        Ok(Device::Cpu)
    } else if metal_is_available() {
        tracing::info!("Using metal acceleration");
        Ok(Device::new_metal(0)?)
    } else if cuda_is_available() {
        tracing::info!("Using CUDA GPU acceleration");
        Ok(Device::new_cuda(0)?)
    } else {
        tracing::debug!("No GPU backend available, running on CPU");
        Ok(Device::Cpu)
    }
}

/// Feed-forward classifier with a softmax head.
pub struct MlpClassifier {
    hidden: Vec<Linear>,
    output: Linear,
    activation: Activation,
    input_dim: usize,
    device: Device,
}

impl MlpClassifier {
    #[tracing::instrument(skip(config, vb), fields(input_dim = config.input_dim))]
    pub fn new(config: &MlpConfig, vb: VarBuilder, device: Device) -> Result<Self> {
        let activation: Activation = config.activation.parse()?;

        let mut hidden = Vec::with_capacity(config.hidden_sizes.len());
        let mut in_dim = config.input_dim;
        for (i, &size) in config.hidden_sizes.iter().enumerate() {
            hidden.push(linear(in_dim, size, vb.pp(format!("hidden.{i}")))?);
            in_dim = size;
        }
        let output = linear(in_dim, config.num_classes, vb.pp("output"))?;

        Ok(Self {
            hidden,
            output,
            activation,
            input_dim: config.input_dim,
            device,
        })
    }

    /// Loads the architecture and weights from disk.
    #[tracing::instrument(skip_all, fields(weights = %weights_path.display()))]
    pub fn load(config_path: &Path, weights_path: &Path, use_pth: bool, cpu: bool) -> Result<Self> {
        let device = device(cpu)?;
        let config = MlpConfig::from_file(config_path)?;

        let vb = if use_pth {
            VarBuilder::from_pth(weights_path, DType::F32, &device)?
        } else {
            unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)? }
        };

        let classifier = Self::new(&config, vb, device)?;
        tracing::debug!(
            hidden_layers = classifier.hidden.len(),
            "Classifier loaded"
        );
        Ok(classifier)
    }
}

impl Classifier for MlpClassifier {
    #[tracing::instrument(skip(self, features), fields(shape = ?features.dims()))]
    fn predict(&self, features: &Tensor) -> Result<Vec<Vec<f32>>> {
        let (_, width) = features.dims2()?;
        if width != self.input_dim {
            return Err(Error::FeatureWidth {
                expected: self.input_dim,
                found: width,
            });
        }

        let mut xs = features.to_device(&self.device)?.to_dtype(DType::F32)?;
        for layer in &self.hidden {
            xs = self.activation.apply(&layer.forward(&xs)?)?;
        }
        let logits = self.output.forward(&xs)?;
        Ok(softmax(&logits, 1)?.to_vec2::<f32>()?)
    }
}

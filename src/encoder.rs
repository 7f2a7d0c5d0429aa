use candle_core::{Device, Tensor};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::engine::{FeatureEncoder, Tokenize};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

fn default_true() -> bool {
    true
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

/// Fitted TF-IDF state as written by the training job (`vectorizer.json`).
///
/// The state has no tokenizer of its own; [`VectorizerState::bind`] attaches
/// the one the vocabulary was fitted with.
#[derive(Debug, Clone, Deserialize)]
pub struct VectorizerState {
    pub vocabulary: HashMap<String, usize>,
    pub idf: Vec<f64>,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    /// `null` disables normalization; an absent field means l2.
    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
}

impl VectorizerState {
    #[tracing::instrument]
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let state: Self = serde_json::from_str(&contents)?;
        state.check()?;
        tracing::debug!(vocabulary = state.vocabulary.len(), "Vectorizer state loaded");
        Ok(state)
    }

    fn check(&self) -> Result<()> {
        if self.idf.len() != self.vocabulary.len() {
            return Err(Error::vectorizer(format!(
                "idf has {} entries for a vocabulary of {} terms",
                self.idf.len(),
                self.vocabulary.len()
            )));
        }
        if let Some((term, column)) = self
            .vocabulary
            .iter()
            .find(|(_, column)| **column >= self.vocabulary.len())
        {
            return Err(Error::vectorizer(format!(
                "column {column} of term '{term}' is out of range"
            )));
        }
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(Error::vectorizer(format!(
                "invalid ngram_range ({min_n}, {max_n})"
            )));
        }
        Ok(())
    }

    pub fn terms(&self) -> impl Iterator<Item = &String> {
        self.vocabulary.keys()
    }

    pub fn width(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn bind<T: Tokenize>(self, tokenizer: T) -> TfidfEncoder<T> {
        TfidfEncoder {
            state: self,
            tokenizer,
        }
    }
}

/// TF-IDF encoder with its tokenizer bound.
pub struct TfidfEncoder<T> {
    state: VectorizerState,
    tokenizer: T,
}

impl<T: Tokenize> TfidfEncoder<T> {
    fn ngrams(&self, tokens: &[String]) -> Vec<String> {
        let (min_n, max_n) = self.state.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n.min(tokens.len()) {
            terms.extend(tokens.windows(n).map(|window| window.join(" ")));
        }
        terms
    }

    /// Encodes one message into a dense row.
    pub fn encode(&self, message: &str) -> Result<Vec<f32>> {
        let text = if self.state.lowercase {
            message.to_lowercase()
        } else {
            message.to_string()
        };
        let tokens = self.tokenizer.tokenize(&text)?;

        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in self.ngrams(&tokens) {
            if let Some(&column) = self.state.vocabulary.get(&term) {
                *counts.entry(column).or_insert(0.0) += 1.0;
            }
        }

        let mut row = vec![0.0f64; self.state.width()];
        for (column, tf) in counts {
            let tf = if self.state.sublinear_tf {
                1.0 + tf.ln()
            } else {
                tf
            };
            row[column] = tf * self.state.idf[column];
        }

        let scale = match self.state.norm {
            Some(Norm::L2) => row.iter().map(|v| v * v).sum::<f64>().sqrt(),
            Some(Norm::L1) => row.iter().map(|v| v.abs()).sum::<f64>(),
            None => 1.0,
        };
        if scale > 0.0 {
            row.iter_mut().for_each(|v| *v /= scale);
        }

        Ok(row.into_iter().map(|v| v as f32).collect())
    }
}

impl<T: Tokenize> FeatureEncoder for TfidfEncoder<T> {
    #[tracing::instrument(skip(self, messages), fields(message_count = messages.len()))]
    fn transform(&self, messages: &[String]) -> Result<Tensor> {
        let width = self.state.width();
        let mut data = Vec::with_capacity(messages.len() * width);
        for message in messages {
            data.extend(self.encode(message)?);
        }
        Ok(Tensor::from_vec(data, (messages.len(), width), &Device::Cpu)?)
    }
}

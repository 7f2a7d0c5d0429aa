use candle_core::Tensor;
use indexmap::IndexMap;
use serde_json::Value;
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use crate::engine::{ArtifactLoader, Classifier};
use crate::types::{ClassificationRequest, ClassificationResponse, Function, Label};
use crate::{Error, Result};

/// Index of the largest score. Ties go to the lowest index and the first NaN
/// wins outright, matching numpy's `argmax`.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &score) in scores.iter().enumerate() {
        let replace = match best {
            None => true,
            Some((_, top)) => !top.is_nan() && (score.is_nan() || score > top),
        };
        if replace {
            best = Some((index, score));
        }
    }
    best.map(|(index, _)| index)
}

/// Scores every message with one batch prediction and maps each to a label.
///
/// Messages are keys of the result, so a repeated message keeps its first
/// position but takes the label of its last occurrence.
#[tracing::instrument(skip_all, fields(message_count = messages.len()))]
pub fn classify(
    model: &dyn Classifier,
    messages: &[String],
    features: &Tensor,
) -> Result<ClassificationResponse> {
    let scores = model.predict(features)?;
    if scores.len() != messages.len() {
        return Err(Error::ScoreCount {
            scores: scores.len(),
            messages: messages.len(),
        });
    }

    let mut responses = IndexMap::with_capacity(messages.len());
    for (index, (message, message_scores)) in messages.iter().zip(&scores).enumerate() {
        let class = argmax(message_scores).ok_or(Error::EmptyScores(index))?;
        responses.insert(message.clone(), Label::from_class_index(class));
    }

    Ok(ClassificationResponse::success(Function::SpamOrHam, responses))
}

/// Runs validation, artifact loading, encoding and prediction for one event.
///
/// Artifacts come from the injected loader on every call. Whatever fails
/// after validation, a panicking collaborator included, is returned as a
/// bad-request response carrying the failure's message.
#[derive(Clone)]
pub struct Pipeline {
    loader: Arc<dyn ArtifactLoader>,
}

impl Pipeline {
    pub fn new(loader: Arc<dyn ArtifactLoader>) -> Self {
        Self { loader }
    }

    pub fn loader(&self) -> &dyn ArtifactLoader {
        self.loader.as_ref()
    }

    pub fn handle(&self, event: Option<&Value>) -> ClassificationResponse {
        match ClassificationRequest::from_event(event) {
            Ok(request) => self.handle_request(&request),
            Err(rejection) => rejection,
        }
    }

    /// Async entry point; the blocking work runs on its own blocking task.
    pub async fn handle_blocking(&self, event: Option<Value>) -> ClassificationResponse {
        let request = match ClassificationRequest::from_event(event.as_ref()) {
            Ok(request) => request,
            Err(rejection) => return rejection,
        };
        let function = request.function;

        let pipeline = self.clone();
        match tokio::task::spawn_blocking(move || pipeline.handle_request(&request)).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "Classification task failed");
                ClassificationResponse::failure(Some(function), vec![e.to_string()])
            }
        }
    }

    #[tracing::instrument(skip_all, fields(function = %request.function, message_count = request.messages.len()))]
    pub fn handle_request(&self, request: &ClassificationRequest) -> ClassificationResponse {
        let outcome = catch_unwind(AssertUnwindSafe(|| self.run(request)))
            .unwrap_or_else(|payload| Err(Error::internal(panic_message(payload.as_ref()))));
        match outcome {
            Ok(response) => {
                tracing::info!("Classification completed successfully");
                response
            }
            Err(e) => {
                tracing::error!(error = %e, "Classification failed");
                ClassificationResponse::failure(Some(request.function), vec![e.to_string()])
            }
        }
    }

    fn run(&self, request: &ClassificationRequest) -> Result<ClassificationResponse> {
        match request.function {
            Function::SpamOrHam => {
                let model = self.loader.load_classifier()?;
                let encoder = self.loader.load_encoder()?;
                let features = encoder.transform(&request.messages)?;
                classify(model.as_ref(), &request.messages, &features)
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "Classification panicked".to_string()
    }
}

use serde_json::Value;

use crate::pipeline::Pipeline;
use crate::types::ClassificationResponse;

pub const MISSING_EVENT_ERROR: &str =
    "No JSON-encoded event object provided. Use the --event argument to provide an event object";

/// Decodes a JSON event body, rejecting malformed input with the parser's
/// message.
pub fn decode_event(raw: &[u8]) -> Result<Value, ClassificationResponse> {
    serde_json::from_slice(raw).map_err(|e| {
        tracing::debug!(error = %e, "Event object is not valid JSON");
        ClassificationResponse::rejected(format!("Unable to parse event object: {e}"))
    })
}

/// Handles the `--event` argument. An empty argument counts as missing.
pub async fn run(event: Option<&str>, pipeline: &Pipeline) -> ClassificationResponse {
    let raw = match event.filter(|raw| !raw.is_empty()) {
        Some(raw) => raw,
        None => return ClassificationResponse::rejected(MISSING_EVENT_ERROR),
    };

    match decode_event(raw.as_bytes()) {
        Ok(event) => pipeline.handle_blocking(Some(event)).await,
        Err(rejection) => rejection,
    }
}

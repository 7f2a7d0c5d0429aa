use serde_json::Value;

use crate::types::{
    ClassificationRequest, ClassificationResponse, FUNCTION_FIELD, Function, MESSAGES_FIELD,
};

/// Validates an inbound event against the request schema.
///
/// Envelope problems (missing, non-object, empty, bad `function`) end
/// validation at the first one found. Once the function is known, every field
/// problem is collected so the caller sees all of them in one response.
/// Returns `None` for a valid event.
pub fn validate_event(event: Option<&Value>) -> Option<ClassificationResponse> {
    let fields = match event {
        None | Some(Value::Null) => {
            return Some(ClassificationResponse::rejected("Event object is missing"));
        }
        Some(Value::Object(fields)) => fields,
        Some(_) => {
            return Some(ClassificationResponse::rejected(
                "Event object is not a dictionary",
            ));
        }
    };

    if fields.is_empty() {
        return Some(ClassificationResponse::rejected("Event object is empty"));
    }

    let function = match fields.get(FUNCTION_FIELD) {
        None => {
            return Some(ClassificationResponse::rejected("Function field is required"));
        }
        Some(Value::String(name)) => match name.parse::<Function>() {
            Ok(function) => function,
            Err(()) => {
                return Some(ClassificationResponse::rejected(format!(
                    "Invalid function name: {name}"
                )));
            }
        },
        Some(_) => {
            return Some(ClassificationResponse::rejected(
                "Function field must be a string",
            ));
        }
    };

    let mut errors = Vec::new();

    match function {
        Function::SpamOrHam => {
            match fields.get(MESSAGES_FIELD) {
                None => errors.push("Messages field is required".to_string()),
                Some(Value::Array(messages)) if messages.is_empty() => {
                    errors.push("Messages field must contain at least one message".to_string())
                }
                Some(Value::Array(messages)) => {
                    if messages.iter().any(|message| !message.is_string()) {
                        errors.push(
                            "Messages field contains an invalid message; all messages must be strings"
                                .to_string(),
                        );
                    }
                }
                Some(_) => errors.push("Messages field must be a list".to_string()),
            }
        }
    }

    errors.extend(
        fields
            .keys()
            .filter(|key| !function.fields().contains(&key.as_str()))
            .map(|key| format!("Invalid field in event: {key}")),
    );

    if errors.is_empty() {
        None
    } else {
        tracing::debug!(function = %function, error_count = errors.len(), "Event rejected");
        Some(ClassificationResponse::failure(Some(function), errors))
    }
}

impl ClassificationRequest {
    /// Parse-or-reject step at the request boundary.
    pub fn from_event(event: Option<&Value>) -> Result<Self, ClassificationResponse> {
        if let Some(rejection) = validate_event(event) {
            return Err(rejection);
        }

        // A validated event always matches the struct; a mismatch here means
        // the validator and the schema disagree.
        let event = event.cloned().unwrap_or(Value::Null);
        serde_json::from_value(event).map_err(|e| {
            tracing::error!(error = %e, "Validated event failed to deserialize");
            ClassificationResponse::failure(Some(Function::SpamOrHam), vec![e.to_string()])
        })
    }
}

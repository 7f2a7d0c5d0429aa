use candle_core::{Device, Tensor};
use serde_json::json;
use std::collections::HashMap;
use std::path::Path;

pub const MESSAGE_1: &str = "Hello, how are you?";
pub const MESSAGE_2: &str = "Congratulations, you have won a prize!";
pub const MESSAGE_3: &str = "You have been selected for a job interview.";

const VOCABULARY: &[&str] = &[
    "hello",
    "congratulations",
    "prize",
    "free",
    "job",
    "interview",
    "selected",
    "win",
];

// Per-term evidence for (ham, spam).
const TERM_WEIGHTS: &[(f32, f32)] = &[
    (1.0, 0.0),
    (0.0, 1.0),
    (0.0, 2.0),
    (0.0, 2.0),
    (1.0, 0.0),
    (1.0, 0.0),
    (0.5, 0.0),
    (0.0, 1.0),
];

pub fn event(messages: &[&str]) -> serde_json::Value {
    json!({"function": "spam_or_ham", "messages": messages})
}

/// Writes a small but complete artifact set: one identity hidden layer and a
/// linear head that favors spam for prize/free/win vocabulary.
pub fn write_artifacts(dir: &Path, num_classes: usize) {
    let width = VOCABULARY.len();

    let vocabulary: HashMap<&str, usize> = VOCABULARY
        .iter()
        .enumerate()
        .map(|(column, term)| (*term, column))
        .collect();
    std::fs::write(
        dir.join("vectorizer.json"),
        json!({
            "vocabulary": vocabulary,
            "idf": vec![1.0; width],
            "lowercase": true,
            "norm": "l2",
            "sublinear_tf": false,
            "ngram_range": [1, 1]
        })
        .to_string(),
    )
    .unwrap();

    std::fs::write(
        dir.join("config.json"),
        json!({
            "input_dim": width,
            "hidden_sizes": [width],
            "activation": "relu",
            "num_classes": num_classes
        })
        .to_string(),
    )
    .unwrap();

    let device = Device::Cpu;
    let identity: Vec<f32> = (0..width * width)
        .map(|i| if i / width == i % width { 1.0 } else { 0.0 })
        .collect();
    let mut output: Vec<f32> = TERM_WEIGHTS.iter().map(|(ham, _)| *ham).collect();
    output.extend(TERM_WEIGHTS.iter().map(|(_, spam)| *spam));

    let tensors: HashMap<String, Tensor> = [
        (
            "hidden.0.weight",
            Tensor::from_vec(identity, (width, width), &device).unwrap(),
        ),
        ("hidden.0.bias", Tensor::zeros(width, candle_core::DType::F32, &device).unwrap()),
        (
            "output.weight",
            Tensor::from_vec(output, (2, width), &device).unwrap(),
        ),
        ("output.bias", Tensor::new(&[0.1f32, 0.0], &device).unwrap()),
    ]
    .into_iter()
    .map(|(name, tensor)| (name.to_string(), tensor))
    .collect();
    candle_core::safetensors::save(&tensors, dir.join("model.safetensors")).unwrap();
}

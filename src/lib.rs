pub mod artifacts;
pub mod cli;
pub mod config;
pub mod encoder;
pub mod engine;
pub mod error;
pub mod mlp_engine;
pub mod normalizer;
pub mod pipeline;
pub mod server;
pub mod types;
pub mod validation;

pub use error::{Error, Result};

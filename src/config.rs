use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// JSON string representing the event object
    #[arg(long)]
    pub event: Option<String>,

    /// Serve the classifier over HTTP instead of handling a single event
    #[arg(long)]
    pub serve: bool,

    /// Server host to bind to
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Server port to bind to
    #[arg(long, env = "PORT", default_value = "8000")]
    pub port: u16,

    /// Model ID from Hugging Face Hub; takes precedence over --model-path
    #[arg(long, env = "MODEL_ID")]
    pub model_id: Option<String>,

    /// Local directory holding config.json, the weights and vectorizer.json
    #[arg(long, env = "MODEL_PATH", default_value = "Resources")]
    pub model_path: PathBuf,

    /// Model revision/branch on Hugging Face
    #[arg(long, env = "MODEL_REVISION", default_value = "main")]
    pub model_revision: String,

    /// Use PyTorch weights instead of safetensors
    #[arg(long, env = "USE_PTH")]
    pub use_pth: bool,

    /// Run on CPU instead of GPU
    #[arg(long, env = "CPU_ONLY")]
    pub cpu_only: bool,
}

impl Config {
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

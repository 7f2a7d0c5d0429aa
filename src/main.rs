use clap::Parser;
use std::io::Write;
use std::sync::Arc;

use spam_or_ham::artifacts::ArtifactStore;
use spam_or_ham::config::Config;
use spam_or_ham::pipeline::Pipeline;
use spam_or_ham::{cli, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries only the response.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();
    tracing::debug!("Starting with config: {:?}", config);

    let store = ArtifactStore::from_config(&config);
    tracing::info!(source = ?store.source(), "Using artifact source");
    let pipeline = Pipeline::new(Arc::new(store));

    if config.serve {
        return server::serve(&config, pipeline).await;
    }

    let response = cli::run(config.event.as_deref(), &pipeline).await;
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer(&mut stdout, &response)?;
    writeln!(stdout)?;
    Ok(())
}

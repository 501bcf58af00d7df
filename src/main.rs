mod classifier;
mod config;
mod driver;
mod exec;
mod few_shot;
mod model;
mod prompts;
mod table;
mod backends {
    pub mod chat_api;
    pub mod ollama;
}

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    backends::{chat_api::ChatApiModel, ollama::OllamaCli},
    config::{Backend, Cli},
    driver::run,
};

const DEFAULT_LOG_FILTER: &str = "relevance_rs=info";

/// `RUST_LOG` when set, non-empty and parseable, else `relevance_rs=info`.
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[tokio::main]
async fn main() -> Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref()))
        .init();

    let cli = Cli::parse();
    cli.validate()?;
    let config = cli.to_config();

    let mut rng = rand::rng();
    let summary = match cli.backend {
        Backend::Ollama => {
            if which::which(&cli.ollama_bin).is_err() {
                warn!("`{}` not found on PATH; every row will fall back to Non", cli.ollama_bin);
            }
            let model = OllamaCli::new(&cli.ollama_bin, &config.model);
            run(&config, &model, &mut rng).await?
        }
        Backend::ChatApi => {
            info!("using chat completions at {}", cli.api_base);
            let model = ChatApiModel::new(&cli.api_base, &cli.api_key, &config.model);
            run(&config, &model, &mut rng).await?
        }
    };

    info!("{} rows labelled", summary.rows);
    Ok(())
}

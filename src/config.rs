use anyhow::{ensure, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Which runtime answers the per-row prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// `ollama run <model>` with the prompt on stdin.
    Ollama,
    /// OpenAI-compatible chat completions endpoint.
    ChatApi,
}

#[derive(Parser, Debug)]
#[command(
    name = "relevance-rs",
    version,
    about = "Few-shot relevance labelling of news articles with a local LLM"
)]
pub struct Cli {
    /// Labelled training CSV (Title, Société, Pertinent, Commentaire)
    #[arg(long, env = "RELEVANCE_TRAIN", default_value = "sample_test_relevance.csv")]
    pub train: PathBuf,

    /// CSV to classify (Title, Société, Pertinent); overwritten on completion
    #[arg(long, env = "RELEVANCE_TARGET", default_value = "articles_to_classify.csv")]
    pub target: PathBuf,

    /// Write the labelled table here instead of overwriting --target
    #[arg(long, env = "RELEVANCE_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Model identifier handed to the runtime
    #[arg(long, env = "RELEVANCE_MODEL", default_value = "llama3.1")]
    pub model: String,

    /// Relevant examples sampled per prompt
    #[arg(long, env = "RELEVANCE_NB_OUI", default_value_t = 8)]
    pub nb_oui: usize,

    /// Not-relevant examples sampled per prompt
    #[arg(long, env = "RELEVANCE_NB_NON", default_value_t = 8)]
    pub nb_non: usize,

    #[arg(long, env = "RELEVANCE_BACKEND", value_enum, default_value = "ollama")]
    pub backend: Backend,

    /// Ollama executable (name on PATH or absolute path)
    #[arg(long, env = "OLLAMA_BIN", default_value = "ollama")]
    pub ollama_bin: String,

    /// Base URL of the chat-api backend
    #[arg(long, env = "RELEVANCE_API_BASE", default_value = "http://localhost:11434/v1")]
    pub api_base: String,

    /// Key for the chat-api backend (Ollama ignores it)
    #[arg(long, env = "OPENAI_API_KEY", default_value = "ollama", hide_env_values = true)]
    pub api_key: String,
}

impl Cli {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.nb_oui > 0 || self.nb_non > 0,
            "--nb-oui and --nb-non cannot both be 0"
        );
        ensure!(!self.model.trim().is_empty(), "--model is empty");
        Ok(())
    }

    pub fn to_config(&self) -> ClassifierConfig {
        ClassifierConfig {
            train_csv: self.train.clone(),
            target_csv: self.target.clone(),
            output_csv: self.output.clone(),
            model: self.model.clone(),
            nb_oui: self.nb_oui,
            nb_non: self.nb_non,
        }
    }
}

/// Everything a run needs, passed explicitly to each step.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub train_csv: PathBuf,
    pub target_csv: PathBuf,
    pub output_csv: Option<PathBuf>,
    pub model: String,
    pub nb_oui: usize,
    pub nb_non: usize,
}

impl ClassifierConfig {
    /// Where the labelled table is written: `output_csv`, else the target itself.
    pub fn output_path(&self) -> &std::path::Path {
        self.output_csv.as_deref().unwrap_or(&self.target_csv)
    }
}

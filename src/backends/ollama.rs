use anyhow::{ensure, Result};

use crate::exec::run_with_stdin;
use crate::model::LanguageModel;

/// `ollama run <model>` with the prompt piped on stdin.
pub struct OllamaCli {
    pub program: String,
    pub model: String,
}

impl OllamaCli {
    pub fn new(program: &str, model: &str) -> Self {
        Self {
            program: program.to_string(),
            model: model.to_string(),
        }
    }
}

impl LanguageModel for OllamaCli {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let out = run_with_stdin(&self.program, &["run", &self.model], prompt).await?;
        ensure!(
            out.success(),
            "`{} run {}` exited with status {}: {}",
            self.program,
            self.model,
            out.status,
            out.stderr.trim()
        );
        Ok(out.stdout)
    }
}

use anyhow::Result;

/// Anything that turns a prompt into raw completion text.
///
/// The classifier only needs this one operation, so tests substitute a fake
/// instead of starting a real model runtime.
pub trait LanguageModel {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

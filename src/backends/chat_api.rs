use anyhow::{Context, Result};
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessage,
        ChatCompletionRequestUserMessageContent, CreateChatCompletionRequestArgs,
    },
    Client,
};

use crate::model::LanguageModel;

/// OpenAI-compatible chat completions endpoint (Ollama serves one under `/v1`).
pub struct ChatApiModel {
    pub model: String,
    pub client: Client<OpenAIConfig>,
}

impl ChatApiModel {
    pub fn new(api_base: &str, api_key: &str, model: &str) -> Self {
        let config = OpenAIConfig::new()
            .with_api_base(api_base)
            .with_api_key(api_key);
        Self {
            model: model.to_string(),
            client: Client::with_config(config),
        }
    }
}

impl LanguageModel for ChatApiModel {
    /// Sends the whole prompt as a single user message at temperature 0.
    async fn complete(&self, prompt: &str) -> Result<String> {
        let req = CreateChatCompletionRequestArgs::default()
            .model(self.model.as_str())
            .messages([ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessage {
                    content: ChatCompletionRequestUserMessageContent::Text(prompt.to_string()),
                    name: None,
                },
            )])
            .temperature(0.0)
            .build()?;

        let resp = self
            .client
            .chat()
            .create(req)
            .await
            .with_context(|| format!("chat completion with {}", self.model))?;
        let content = resp
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .context("chat completion returned no content")?;
        Ok(content)
    }
}

//! Title generation from relative file paths.

use crate::models::config::AiConfig;
use crate::services::openai::{ChatMessage, ChatRequest};
use crate::services::CompletionService;
use crate::{Error, Result};

/// Turns relative paths into candidate titles.
pub struct TitleGenerator {
    service: Box<dyn CompletionService>,
    config: AiConfig,
}

impl TitleGenerator {
    pub fn new(service: Box<dyn CompletionService>, config: AiConfig) -> Self {
        Self { service, config }
    }

    /// Build the chat request for one path.
    pub fn build_request(&self, relative_path: &str) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            temperature: self.config.temperature,
            messages: vec![
                ChatMessage::system(self.config.system_prompt.clone()),
                ChatMessage::user(relative_path),
            ],
        }
    }

    /// Ask the model for a title. The result is trimmed and never empty.
    pub async fn generate(&self, relative_path: &str) -> Result<String> {
        let request = self.build_request(relative_path);
        tracing::debug!("Requesting title for {}", relative_path);

        let content = self.service.complete(&request).await.map_err(|e| match e {
            Error::Generation(_) => e,
            other => Error::Generation(other.to_string()),
        })?;

        let title = content.trim();
        if title.is_empty() {
            return Err(Error::Generation("model returned an empty title".to_string()));
        }
        Ok(title.to_string())
    }
}

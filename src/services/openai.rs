//! OpenAI-compatible chat completion client.
//!
//! Works with any endpoint exposing `POST {endpoint}/chat/completions`
//! (OpenAI, Ollama's `/v1`, LM Studio, vLLM, ...).

use super::CompletionService;
use crate::models::config::AiConfig;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A chat message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system<S: Into<String>>(content: S) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user<S: Into<String>>(content: S) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat completion request payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub temperature: f32,
    pub messages: Vec<ChatMessage>,
}

/// Chat completion response.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Error body returned by OpenAI-style APIs.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// OpenAI-compatible API client.
pub struct OpenAiClient {
    endpoint: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl OpenAiClient {
    /// Create a client for the configured endpoint.
    pub fn new(config: &AiConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            client: reqwest::Client::new(),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint)
    }
}

#[async_trait::async_trait]
impl CompletionService for OpenAiClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let mut builder = self.client.post(self.completions_url()).json(request);
        if let Some(ref key) = self.api_key {
            builder = builder.bearer_auth(key);
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| Error::Generation(format!("request failed: {}", e)))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::Generation(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(Error::Generation(describe_failure(status, &body)));
        }

        parse_completion(&body)
    }
}

/// Extract the first choice's content from a response body.
fn parse_completion(body: &str) -> Result<String> {
    let resp: ChatResponse = serde_json::from_str(body)
        .map_err(|e| Error::Generation(format!("unexpected response: {}", e)))?;

    resp.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| Error::Generation("response contained no choices".to_string()))
}

fn describe_failure(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(err) => format!("{}: {}", status, err.error.message),
        Err(_) if body.trim().is_empty() => status.to_string(),
        Err(_) => format!("{}: {}", status, body.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = ChatRequest {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.0,
            messages: vec![ChatMessage::system("sys"), ChatMessage::user("a/b.mkv")],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "a/b.mkv");
    }

    #[test]
    fn test_parse_completion_first_choice() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"Alien"}},{"message":{"content":"Other"}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "Alien");
    }

    #[test]
    fn test_parse_completion_without_choices() {
        assert!(matches!(
            parse_completion(r#"{"choices":[]}"#),
            Err(Error::Generation(_))
        ));
    }

    #[test]
    fn test_describe_failure_uses_api_message() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        let msg = describe_failure(reqwest::StatusCode::UNAUTHORIZED, body);
        assert!(msg.contains("401"));
        assert!(msg.contains("Incorrect API key"));
    }

    #[test]
    fn test_completions_url() {
        let client = OpenAiClient::new(&AiConfig {
            endpoint: "http://localhost:11434/v1".to_string(),
            model: "llama3".to_string(),
            api_key: None,
            temperature: 0.0,
            system_prompt: "s".to_string(),
        });
        assert_eq!(client.completions_url(), "http://localhost:11434/v1/chat/completions");
    }
}

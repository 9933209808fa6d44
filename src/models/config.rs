//! AI configuration model and loader.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Environment variable consulted when the config file has no API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Default config file path.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

const MAX_TEMPERATURE: f32 = 2.0;

/// Configuration for the LLM endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct AiConfig {
    /// Base URL of the OpenAI-compatible API (without trailing slash).
    pub endpoint: String,
    /// Model name.
    pub model: String,
    /// API key, if the endpoint needs one.
    pub api_key: Option<String>,
    /// Sampling temperature.
    pub temperature: f32,
    /// System prompt sent with every request.
    pub system_prompt: String,
}

/// Top-level layout of the YAML file.
#[derive(Debug, Deserialize)]
struct RawConfig {
    ai: Option<RawAiConfig>,
}

#[derive(Debug, Deserialize)]
struct RawAiConfig {
    endpoint: Option<String>,
    model: Option<String>,
    api_key: Option<String>,
    temperature: Option<f32>,
    system_prompt: Option<String>,
}

/// Load the AI configuration from a YAML file.
///
/// The API key falls back to `OPENAI_API_KEY` when the file has none.
pub fn load_config(path: &Path) -> Result<AiConfig> {
    if !path.exists() {
        return Err(Error::Config(format!(
            "config file not found: {}",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;

    let env_api_key = std::env::var(API_KEY_ENV).ok();
    let config = parse_config(&content, env_api_key)?;

    tracing::debug!(
        "Loaded AI config from {} (endpoint: {}, model: {})",
        path.display(),
        config.endpoint,
        config.model
    );
    Ok(config)
}

/// Parse and validate the AI configuration from YAML text.
pub fn parse_config(content: &str, env_api_key: Option<String>) -> Result<AiConfig> {
    let raw: RawConfig = serde_yaml::from_str(content)
        .map_err(|e| Error::Config(format!("invalid YAML: {}", e)))?;

    let ai = raw
        .ai
        .ok_or_else(|| Error::Config("missing `ai` section".to_string()))?;

    let endpoint = required(ai.endpoint, "endpoint")?;
    let model = required(ai.model, "model")?;
    let system_prompt = required(ai.system_prompt, "system_prompt")?;

    let temperature = ai.temperature.unwrap_or(0.0);
    if !(0.0..=MAX_TEMPERATURE).contains(&temperature) {
        return Err(Error::Config(format!(
            "ai.temperature must be between 0 and {}, got {}",
            MAX_TEMPERATURE, temperature
        )));
    }

    let api_key = non_blank(ai.api_key).or_else(|| non_blank(env_api_key));

    Ok(AiConfig {
        endpoint: endpoint.trim_end_matches('/').to_string(),
        model,
        api_key,
        temperature,
        system_prompt,
    })
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    non_blank(value).ok_or_else(|| Error::Config(format!("ai.{} is required", field)))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

//! Integration tests for config loading.
//!
//! Tests cover:
//! - Loading a complete config file
//! - Required field validation
//! - Missing files

use plex_ai_titler::models::config::load_config;
use plex_ai_titler::Error;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_load_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.yaml");
    fs::write(
        &path,
        r#"
ai:
  endpoint: http://localhost:11434/v1
  model: llama3.1
  api_key: sk-local
  temperature: 0.5
  system_prompt: >
    You are given a media file path. Reply with a title only.
"#,
    )
    .unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(config.endpoint, "http://localhost:11434/v1");
    assert_eq!(config.model, "llama3.1");
    assert_eq!(config.api_key.as_deref(), Some("sk-local"));
    assert_eq!(config.temperature, 0.5);
    assert!(config.system_prompt.contains("Reply with a title only."));
}

#[test]
fn test_missing_system_prompt_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.yaml");
    fs::write(&path, "ai:\n  endpoint: http://localhost/v1\n  model: m\n").unwrap();

    match load_config(&path) {
        Err(Error::Config(msg)) => assert!(msg.contains("system_prompt")),
        other => panic!("expected config error, got {:?}", other),
    }
}

#[test]
fn test_missing_endpoint_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.yaml");
    fs::write(&path, "ai:\n  model: m\n  system_prompt: s\n").unwrap();

    assert!(matches!(load_config(&path), Err(Error::Config(_))));
}

#[test]
fn test_load_nonexistent_config() {
    let result = load_config(&PathBuf::from("/nonexistent/config.yaml"));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_load_invalid_yaml() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.yaml");
    fs::write(&path, "ai:\n\tendpoint: [").unwrap();

    assert!(matches!(load_config(&path), Err(Error::Config(_))));
}

//! Plex AI Titler Library
//!
//! Retitles Plex media items from their library-relative file paths using an
//! OpenAI-compatible LLM endpoint.

pub mod cli;
pub mod core;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use error::{Error, Result};

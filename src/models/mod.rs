//! Data models.

pub mod config;
pub mod credentials;
pub mod media;

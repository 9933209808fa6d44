//! Core business logic modules.

pub mod auth;
pub mod credentials;
pub mod generator;
pub mod pipeline;
pub mod session;

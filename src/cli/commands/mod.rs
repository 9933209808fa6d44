//! CLI command implementations.

pub mod retitle;

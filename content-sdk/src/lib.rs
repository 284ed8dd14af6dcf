//! # Content SDK
//!
//! A unified SDK for external service integrations in the ReviewForge project.
//!
//! This crate provides:
//!
//! - Typed clients for the text-generation and image-generation services
//! - Comprehensive error handling system
//! - Configuration management utilities backed by environment variables
//!
//! ## Architecture
//!
//! The Content SDK is designed around the following key pieces:
//!
//! - `TextGenClient`: OpenAI-compatible chat-completions client
//! - `ImageGenClient`: client for the image-generation service
//! - `ServiceError`: normalized error type for every SDK operation
//! - `ConfigProvider`: pluggable configuration source (env or in-memory)
//!
//! Neither client retries: the pipeline makes exactly one attempt per
//! request, and degradation decisions belong to the caller.

// Re-export service-specific modules
pub mod services;
pub use services::{imagegen, textgen};

// Re-export error handling
pub mod error;
pub use error::{Result, ServiceError};

// Re-export configuration management
pub mod config;
pub use config::{ConfigProvider, ImageGenConfig, ServiceConfig, TextGenConfig};

#[cfg(test)]
mod tests;

/// Create a text-generation client from the process environment.
///
/// Fails with a configuration error when `LLM_API_KEY` is absent.
pub fn textgen_client_from_env() -> Result<textgen::TextGenClient> {
    let config = TextGenConfig::from_provider(&config::EnvConfigProvider::new())?;
    textgen::TextGenClient::new_with_config(config)
}

/// Create an image-generation client from the process environment.
///
/// Fails with a configuration error when `IMAGE_API_KEY` is absent; the
/// caller decides whether that absence degrades or aborts.
pub fn imagegen_client_from_env() -> Result<imagegen::ImageGenClient> {
    let config = ImageGenConfig::from_provider(&config::EnvConfigProvider::new())?;
    imagegen::ImageGenClient::new_with_config(config)
}

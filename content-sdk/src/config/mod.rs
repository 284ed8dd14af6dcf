//! Configuration management for service clients
//!
//! This module provides utilities for loading and validating configuration
//! for external service clients, with support for environment variables.

use std::collections::HashMap;
use std::env;
use std::fmt::Debug;

use url::Url;

use crate::error::{Result, ServiceError};

/// Base trait for configuration providers
pub trait ConfigProvider: Send + Sync {
    /// Get a string configuration value
    fn get_string(&self, key: &str) -> Result<String>;

    /// Get a string configuration value with a default
    fn get_string_or(&self, key: &str, default: &str) -> String {
        self.get_string(key).unwrap_or_else(|_| default.to_string())
    }

    /// Get an integer configuration value with a default
    fn get_int_or(&self, key: &str, default: i64) -> i64 {
        self.get_string(key)
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(default)
    }
}

/// Environment variable based configuration provider
///
/// Keys are uppercased before lookup, so `llm_api_key` reads `LLM_API_KEY`.
#[derive(Debug, Clone, Default)]
pub struct EnvConfigProvider;

impl EnvConfigProvider {
    /// Create a new environment variable config provider
    pub fn new() -> Self {
        Self
    }

    fn format_key(key: &str) -> String {
        key.to_uppercase()
            .replace(|c: char| !c.is_ascii_alphanumeric(), "_")
    }
}

impl ConfigProvider for EnvConfigProvider {
    fn get_string(&self, key: &str) -> Result<String> {
        let env_key = Self::format_key(key);

        env::var(&env_key).map_err(|e| match e {
            env::VarError::NotPresent => ServiceError::configuration(format!(
                "Environment variable not set: {}",
                env_key
            )),
            env::VarError::NotUnicode(_) => ServiceError::configuration(format!(
                "Environment variable is not valid unicode: {}",
                env_key
            )),
        })
    }
}

/// In-memory config provider for testing or static configuration
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigProvider {
    values: HashMap<String, String>,
}

impl MemoryConfigProvider {
    /// Create a new empty memory config provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a configuration value
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: ToString,
    {
        self.values.insert(key.into(), value.to_string());
    }
}

impl ConfigProvider for MemoryConfigProvider {
    fn get_string(&self, key: &str) -> Result<String> {
        self.values
            .get(key)
            .cloned()
            .ok_or_else(|| ServiceError::configuration(format!("Configuration key not found: {}", key)))
    }
}

/// Trait for service-specific configuration
pub trait ServiceConfig: Debug + Send + Sync {
    /// Validate this configuration
    fn validate(&self) -> Result<()>;

    /// Service name
    fn service_name(&self) -> &str;
}

/// Configuration for the text-generation service (OpenAI-compatible API)
#[derive(Debug, Clone)]
pub struct TextGenConfig {
    /// API key
    pub api_key: String,

    /// Base URL (can be changed for proxies or compatible providers)
    pub base_url: String,

    /// Model identifier
    pub model: String,

    /// Optional timeout in seconds; the generation call is unbounded unless
    /// one is configured
    pub timeout_seconds: Option<u64>,
}

impl Default for TextGenConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_seconds: None,
        }
    }
}

impl TextGenConfig {
    /// Load configuration from a config provider
    pub fn from_provider<P: ConfigProvider>(provider: &P) -> Result<Self> {
        let api_key = provider.get_string("llm_api_key")?;
        let base_url = provider.get_string_or("llm_api_url", "https://api.openai.com/v1");
        let model = provider.get_string_or("llm_model", "gpt-4o-mini");
        let timeout_seconds = provider
            .get_string("llm_timeout_seconds")
            .ok()
            .and_then(|v| v.parse::<u64>().ok());

        let config = Self {
            api_key,
            base_url,
            model,
            timeout_seconds,
        };

        config.validate()?;
        Ok(config)
    }
}

impl ServiceConfig for TextGenConfig {
    fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(ServiceError::configuration(
                "Text-generation API key is required (LLM_API_KEY)",
            ));
        }

        if Url::parse(&self.base_url).is_err() {
            return Err(ServiceError::configuration(format!(
                "Text-generation base URL is not a valid URL: {}",
                self.base_url
            )));
        }

        Ok(())
    }

    fn service_name(&self) -> &str {
        "textgen"
    }
}

/// Configuration for the image-generation service
#[derive(Debug, Clone)]
pub struct ImageGenConfig {
    /// API key
    pub api_key: String,

    /// Base URL
    pub base_url: String,

    /// Timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for ImageGenConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.pixelforge.app/v1".to_string(),
            timeout_seconds: 20,
        }
    }
}

impl ImageGenConfig {
    /// Load configuration from a config provider
    pub fn from_provider<P: ConfigProvider>(provider: &P) -> Result<Self> {
        let api_key = provider.get_string("image_api_key")?;
        let base_url = provider.get_string_or("image_api_url", "https://api.pixelforge.app/v1");
        let timeout_seconds = provider.get_int_or("image_timeout_seconds", 20) as u64;

        let config = Self {
            api_key,
            base_url,
            timeout_seconds,
        };

        config.validate()?;
        Ok(config)
    }
}

impl ServiceConfig for ImageGenConfig {
    fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(ServiceError::configuration(
                "Image-generation API key is required (IMAGE_API_KEY)",
            ));
        }

        if Url::parse(&self.base_url).is_err() {
            return Err(ServiceError::configuration(format!(
                "Image-generation base URL is not a valid URL: {}",
                self.base_url
            )));
        }

        Ok(())
    }

    fn service_name(&self) -> &str {
        "imagegen"
    }
}

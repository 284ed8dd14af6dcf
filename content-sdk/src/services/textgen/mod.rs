//! Text-generation service client
//!
//! This module provides a strongly-typed client for an OpenAI-compatible
//! chat-completions API. The client makes exactly one attempt per call: the
//! pipeline it serves forbids retries and backoff.

mod models;
pub use models::*;

use std::time::Duration;

use log::debug;
use reqwest::Client;

use crate::config::{ConfigProvider, ServiceConfig, TextGenConfig};
use crate::error::{Result, ServiceError};
use crate::services::common::{build_http_client, parse_error_response, UserAgent};

/// Text-generation API client
pub struct TextGenClient {
    /// HTTP client
    http_client: Client,

    /// Configuration
    config: TextGenConfig,
}

impl TextGenClient {
    /// Create a new client with custom configuration
    pub fn new_with_config(config: TextGenConfig) -> Result<Self> {
        config.validate()?;

        let http_client = build_http_client(
            Some(UserAgent {
                extra: Some("textgen-client".to_string()),
                ..UserAgent::default()
            }),
            config.timeout_seconds.map(Duration::from_secs),
        )?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Create a new builder for the client
    pub fn builder() -> TextGenClientBuilder {
        TextGenClientBuilder::default()
    }

    /// Load configuration from a provider and build a client
    pub fn from_provider<P: ConfigProvider>(provider: &P) -> Result<Self> {
        let config = TextGenConfig::from_provider(provider)?;
        Self::new_with_config(config)
    }

    /// The configured model identifier
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Send a chat completion request
    pub async fn chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        let url = format!("{}/chat/completions", self.config.base_url);
        debug!("Sending request to text-generation service: POST {}", url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ServiceError::from_transport("textgen", e))?;

        if !response.status().is_success() {
            return Err(parse_error_response("textgen", response).await);
        }

        response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| ServiceError::parsing(format!("Failed to parse completion response: {}", e)))
    }

    /// Run one low-randomness completion and return the reply text.
    ///
    /// The reply is constrained to a single JSON object via `response_format`;
    /// an empty choice list or empty content is a parsing error.
    pub async fn structured_completion(&self, system: &str, user: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            temperature: Some(0.2),
            response_format: Some(ResponseFormat::json_object()),
            ..Default::default()
        };

        let response = self.chat_completion(request).await?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(ServiceError::parsing(
                "Text-generation service returned an empty completion",
            ));
        }

        Ok(content.to_string())
    }
}

/// Builder for the text-generation client
#[derive(Default)]
pub struct TextGenClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    timeout_seconds: Option<u64>,
}

impl TextGenClientBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API key
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the base URL
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the model identifier
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the timeout in seconds
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<TextGenClient> {
        let mut config = TextGenConfig::default();

        if let Some(api_key) = self.api_key {
            config.api_key = api_key;
        }

        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }

        if let Some(model) = self.model {
            config.model = model;
        }

        if self.timeout_seconds.is_some() {
            config.timeout_seconds = self.timeout_seconds;
        }

        TextGenClient::new_with_config(config)
    }
}

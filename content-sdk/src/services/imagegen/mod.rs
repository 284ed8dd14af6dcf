//! Image-generation service client
//!
//! Typed client for the image-rendering API. Like the text-generation client
//! it makes exactly one attempt per call; degradation on failure is the
//! caller's concern, which is why every error is surfaced rather than
//! absorbed here.

mod models;
pub use models::*;

use std::time::Duration;

use log::debug;
use reqwest::Client;

use crate::config::{ConfigProvider, ImageGenConfig, ServiceConfig};
use crate::error::{Result, ServiceError};
use crate::services::common::{build_http_client, parse_error_response, UserAgent};

/// Image-generation API client
pub struct ImageGenClient {
    /// HTTP client
    http_client: Client,

    /// Configuration
    config: ImageGenConfig,
}

impl ImageGenClient {
    /// Create a new client with custom configuration
    pub fn new_with_config(config: ImageGenConfig) -> Result<Self> {
        config.validate()?;

        let http_client = build_http_client(
            Some(UserAgent {
                extra: Some("imagegen-client".to_string()),
                ..UserAgent::default()
            }),
            Some(Duration::from_secs(config.timeout_seconds)),
        )?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Create a new builder for the client
    pub fn builder() -> ImageGenClientBuilder {
        ImageGenClientBuilder::default()
    }

    /// Load configuration from a provider and build a client
    pub fn from_provider<P: ConfigProvider>(provider: &P) -> Result<Self> {
        let config = ImageGenConfig::from_provider(provider)?;
        Self::new_with_config(config)
    }

    /// Request a batch of rendered images
    pub async fn generate_images(
        &self,
        request: ImageGenerationRequest,
    ) -> Result<ImageGenerationResponse> {
        let url = format!("{}/images/generations", self.config.base_url);
        debug!(
            "Sending request to image-generation service: POST {} ({} prompts, count {})",
            url,
            request.prompts.len(),
            request.count
        );

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ServiceError::from_transport("imagegen", e))?;

        if !response.status().is_success() {
            return Err(parse_error_response("imagegen", response).await);
        }

        response
            .json::<ImageGenerationResponse>()
            .await
            .map_err(|e| ServiceError::parsing(format!("Failed to parse image response: {}", e)))
    }
}

/// Builder for the image-generation client
#[derive(Default)]
pub struct ImageGenClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout_seconds: Option<u64>,
}

impl ImageGenClientBuilder {
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

    /// Set the timeout in seconds
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ImageGenClient> {
        let mut config = ImageGenConfig::default();

        if let Some(api_key) = self.api_key {
            config.api_key = api_key;
        }

        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }

        if let Some(timeout) = self.timeout_seconds {
            config.timeout_seconds = timeout;
        }

        ImageGenClient::new_with_config(config)
    }
}

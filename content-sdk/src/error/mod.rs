//! Error handling for the Content SDK
//!
//! This module provides a normalized error system that:
//! - Categorizes errors by type (network, auth, parsing, etc.)
//! - Maps upstream HTTP failures to those categories
//! - Provides a convenient Result type alias

use reqwest::StatusCode;
use thiserror::Error;

/// Result type for Content SDK operations
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Main error type for the Content SDK
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Network or connection errors
    #[error("Network error: {0}")]
    Network(String),

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Rate limiting errors
    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    /// Request validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Response parsing errors
    #[error("Parsing error: {0}")]
    Parsing(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Timeout errors
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Resource not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Upstream service errors
    #[error("Service error: {0}")]
    Service(String),
}

impl ServiceError {
    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        ServiceError::Network(message.into())
    }

    /// Create an authentication error
    pub fn authentication(message: impl Into<String>) -> Self {
        ServiceError::Authentication(message.into())
    }

    /// Create a rate limit error
    pub fn rate_limit(message: impl Into<String>) -> Self {
        ServiceError::RateLimit(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(message.into())
    }

    /// Create a parsing error
    pub fn parsing(message: impl Into<String>) -> Self {
        ServiceError::Parsing(message.into())
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        ServiceError::Configuration(message.into())
    }

    /// Create a timeout error
    pub fn timeout(message: impl Into<String>) -> Self {
        ServiceError::Timeout(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }

    /// Create an upstream service error
    pub fn service(message: impl Into<String>) -> Self {
        ServiceError::Service(message.into())
    }

    /// Map an HTTP error status from an upstream service to an error category.
    pub fn from_status(service: &str, status: StatusCode, body: &str) -> Self {
        let detail = if body.trim().is_empty() {
            format!("{} returned HTTP {}", service, status.as_u16())
        } else {
            format!("{} returned HTTP {}: {}", service, status.as_u16(), body.trim())
        };

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                ServiceError::authentication(detail)
            }
            StatusCode::TOO_MANY_REQUESTS => ServiceError::rate_limit(detail),
            StatusCode::NOT_FOUND => ServiceError::not_found(detail),
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
                ServiceError::timeout(detail)
            }
            s if s.is_client_error() => ServiceError::validation(detail),
            _ => ServiceError::service(detail),
        }
    }

    /// Map a reqwest transport failure to an error category.
    pub fn from_transport(service: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ServiceError::timeout(format!("{} request timed out: {}", service, err))
        } else {
            ServiceError::network(format!("{} request failed: {}", service, err))
        }
    }

    /// Whether this error reflects missing or invalid configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(self, ServiceError::Configuration(_))
    }
}

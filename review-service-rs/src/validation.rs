//! Request validation
//!
//! First line of defense for the generate endpoint: the raw JSON body is
//! checked against a compiled schema (shape, required fields, minimum
//! lengths, the fixed affiliate-platform key set) before any pipeline work
//! begins. The product URL additionally gets an explicit parse, since schema
//! format assertions are not enforced by default.

use axum::http::StatusCode;
use axum::Json;
use jsonschema::{Draft, JSONSchema};
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use url::Url;

use crate::models::GenerationRequest;

/// Maximum request payload size (1 MB)
pub const MAX_PAYLOAD_SIZE: usize = 1024 * 1024;

/// Schema for the generate request
static GENERATE_REQUEST_SCHEMA: Lazy<JSONSchema> = Lazy::new(|| {
    let schema = json!({
        "type": "object",
        "required": [
            "productUrl",
            "locale",
            "outline",
            "tone",
            "callToAction",
            "geoPersona",
            "wantDiscoverySchema"
        ],
        "properties": {
            "productUrl": { "type": "string", "minLength": 1, "maxLength": 2048 },
            "locale": { "type": "string", "minLength": 2, "maxLength": 32 },
            "keywords": { "type": "string", "maxLength": 512 },
            "outline": { "type": "string", "minLength": 3, "maxLength": 128 },
            "tone": { "type": "string", "minLength": 3, "maxLength": 128 },
            "callToAction": { "type": "string", "minLength": 3, "maxLength": 256 },
            "geoPersona": { "type": "string", "minLength": 3, "maxLength": 512 },
            "wantDiscoverySchema": { "type": "boolean" },
            "affiliateLinks": {
                "type": "object",
                "properties": {
                    "amazon": { "type": "string", "maxLength": 2048 },
                    "flipkart": { "type": "string", "maxLength": 2048 },
                    "myntra": { "type": "string", "maxLength": 2048 },
                    "ebay": { "type": "string", "maxLength": 2048 },
                    "walmart": { "type": "string", "maxLength": 2048 },
                    "aliexpress": { "type": "string", "maxLength": 2048 },
                    "etsy": { "type": "string", "maxLength": 2048 },
                    "target": { "type": "string", "maxLength": 2048 },
                    "bestbuy": { "type": "string", "maxLength": 2048 }
                },
                "additionalProperties": false
            },
            "imageStyle": { "type": "string", "maxLength": 256 }
        },
        "additionalProperties": false
    });

    JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(&schema)
        .expect("Invalid schema")
});

/// Error response for validation failures
#[derive(Debug, serde::Serialize)]
pub struct ValidationErrorResponse {
    pub error: String,
    pub code: u16,
    pub details: Option<Vec<String>>,
}

/// Validation error for generate requests
#[derive(Debug, thiserror::Error)]
pub enum ApiValidationError {
    #[error("Invalid request format: {0}")]
    InvalidFormat(String),

    #[error("Schema validation failed")]
    Schema(Vec<String>),

    #[error("Invalid product URL: {0}")]
    InvalidUrl(String),
}

impl ApiValidationError {
    /// Convert to HTTP status code and error response
    pub fn to_response(&self) -> (StatusCode, Json<ValidationErrorResponse>) {
        let details = match self {
            Self::Schema(details) => Some(details.clone()),
            _ => None,
        };

        (
            StatusCode::BAD_REQUEST,
            Json(ValidationErrorResponse {
                error: self.to_string(),
                code: 400,
                details,
            }),
        )
    }
}

/// Validate a raw JSON body and decode it into a typed request.
pub fn validate_generate_request(json: &Value) -> Result<GenerationRequest, ApiValidationError> {
    let validation = GENERATE_REQUEST_SCHEMA.validate(json);
    if let Err(errors) = validation {
        let details: Vec<String> = errors
            .map(|err| format!("{:?} at {}", err.kind, err.instance_path))
            .collect();

        return Err(ApiValidationError::Schema(if details.is_empty() {
            vec!["Schema validation failed".to_string()]
        } else {
            details
        }));
    }

    let request: GenerationRequest = serde_json::from_value(json.clone())
        .map_err(|e| ApiValidationError::InvalidFormat(e.to_string()))?;

    let url = Url::parse(&request.product_url).map_err(|e| {
        ApiValidationError::InvalidUrl(format!("{}: {}", request.product_url, e))
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ApiValidationError::InvalidUrl(format!(
            "unsupported scheme '{}'",
            url.scheme()
        )));
    }

    Ok(request)
}

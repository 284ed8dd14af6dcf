//! Image-generation API data models

use serde::{Deserialize, Serialize};

/// Context passed alongside the prompts so the service can ground its output
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ImageRequestMetadata {
    /// Product title, when extracted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_title: Option<String>,

    /// Product brand, when extracted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    /// URL of the product page
    pub source_url: String,
}

/// Image generation request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageGenerationRequest {
    /// Prompt strings to render
    pub prompts: Vec<String>,

    /// Aspect ratio, e.g. "16:9"
    pub aspect_ratio: String,

    /// Rendering style description
    pub style: String,

    /// Number of images to generate
    pub count: usize,

    /// Grounding metadata
    pub metadata: ImageRequestMetadata,
}

/// A single generated image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedImageData {
    /// URL of the rendered image
    pub url: String,

    /// Prompt the service attributes the image to, when echoed back
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Image generation response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageGenerationResponse {
    /// Rendered images, possibly fewer than requested
    #[serde(default)]
    pub images: Vec<GeneratedImageData>,
}

//! Wire-level data models for the review-generation service
//!
//! Request and response bodies use camelCase field names on the wire.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::extractor::ProductData;

/// Per-platform affiliate checkout/referral links supplied by the caller.
///
/// The platform set is fixed; unknown keys are rejected at the schema layer
/// and by serde. Absent entries default to the empty string and are never
/// surfaced downstream.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AffiliateLinks {
    #[serde(default)]
    pub amazon: String,
    #[serde(default)]
    pub flipkart: String,
    #[serde(default)]
    pub myntra: String,
    #[serde(default)]
    pub ebay: String,
    #[serde(default)]
    pub walmart: String,
    #[serde(default)]
    pub aliexpress: String,
    #[serde(default)]
    pub etsy: String,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub bestbuy: String,
}

impl AffiliateLinks {
    /// The entries whose value is non-empty, keyed by platform name.
    pub fn non_empty(&self) -> Vec<(&'static str, &str)> {
        [
            ("amazon", self.amazon.as_str()),
            ("flipkart", self.flipkart.as_str()),
            ("myntra", self.myntra.as_str()),
            ("ebay", self.ebay.as_str()),
            ("walmart", self.walmart.as_str()),
            ("aliexpress", self.aliexpress.as_str()),
            ("etsy", self.etsy.as_str()),
            ("target", self.target.as_str()),
            ("bestbuy", self.bestbuy.as_str()),
        ]
        .into_iter()
        .filter(|(_, link)| !link.trim().is_empty())
        .collect()
    }
}

fn default_image_style() -> String {
    "clean, modern product photography with soft natural lighting".to_string()
}

/// Inbound generation request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// URL of the product page to review
    pub product_url: String,

    /// Target locale for the article, e.g. "en-US"
    pub locale: String,

    /// Free-text SEO keywords
    #[serde(default)]
    pub keywords: String,

    /// Outline style, e.g. "listicle" or "long-form"
    pub outline: String,

    /// Writing tone
    pub tone: String,

    /// Call-to-action text to weave into the article
    pub call_to_action: String,

    /// Description of the geographic persona to write for
    pub geo_persona: String,

    /// Whether machine-readable structured data is requested
    pub want_discovery_schema: bool,

    /// Affiliate links, one optional URL per known platform
    #[serde(default)]
    pub affiliate_links: AffiliateLinks,

    /// Rendering style for the accompanying imagery
    #[serde(default = "default_image_style")]
    pub image_style: String,
}

/// SEO metadata produced by the generation service
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SeoMetadata {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub meta_description: String,

    #[serde(default)]
    pub keywords: Vec<String>,

    #[serde(default)]
    pub og_title: String,

    #[serde(default)]
    pub og_description: String,

    #[serde(default)]
    pub canonical_url: Option<String>,
}

/// A generated customer review
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(default)]
    pub reviewer: String,

    /// Rating on a 1-5 scale
    #[serde(default)]
    pub rating: f64,

    #[serde(default)]
    pub summary: String,

    #[serde(default)]
    pub details: String,
}

/// Parsed reply from the text-generation service.
///
/// Decoding fails closed: a reply missing `article` or `seo` is a parse
/// error, not a downstream surprise. `reviews` and `imagePrompts` tolerate
/// absence, `discoverySchema` is genuinely optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub article: String,

    pub seo: SeoMetadata,

    #[serde(default)]
    pub reviews: Vec<Review>,

    #[serde(default)]
    pub discovery_schema: Option<Value>,

    #[serde(default)]
    pub image_prompts: Vec<String>,
}

/// A recorded spell-check substitution
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpellCorrection {
    pub original: String,
    pub suggestion: String,
}

/// One acquired image, always paired with the prompt that produced it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratedImage {
    pub url: String,
    pub prompt: String,
}

/// Composed pipeline response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    /// Spell-corrected article text
    pub article: String,

    pub seo: SeoMetadata,

    /// Facts extracted from the product page
    pub product: ProductData,

    pub reviews: Vec<Review>,

    /// The caller's affiliate links, echoed back
    pub affiliate_links: AffiliateLinks,

    /// Structured data, or null when not requested
    pub discovery_schema: Option<Value>,

    pub images: Vec<GeneratedImage>,

    /// Corrections in the order they occurred
    pub spellcheck: Vec<SpellCorrection>,
}

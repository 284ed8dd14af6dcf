//! Image Acquisition Service
//!
//! Obtains imagery for a set of prompts, degrading gracefully: with no
//! credential configured the result is deterministic placeholder URLs
//! (no network call), and any service failure falls back to placeholders in
//! a visually distinct palette. The internal outcome is tagged so logs can
//! distinguish credential-absent from service-failed even though both
//! collapse to the same external shape. The returned list always has one
//! entry per prompt and the acquisition never fails.

use content_sdk::imagegen::{ImageGenClient, ImageGenerationRequest, ImageRequestMetadata};
use log::{debug, warn};

use crate::extractor::ProductData;
use crate::models::GeneratedImage;

/// Cap on the number of images requested from the service
pub const MAX_GENERATED_IMAGES: usize = 3;

/// Fixed aspect ratio for generated imagery
pub const IMAGE_ASPECT_RATIO: &str = "16:9";

struct Palette {
    background: &'static str,
    foreground: &'static str,
}

// Palette A: neutral slate, used when no credential is configured.
const UNCONFIGURED_PALETTE: Palette = Palette {
    background: "e2e8f0",
    foreground: "475569",
};

// Palette B: amber, used when the service was tried and failed.
const DEGRADED_PALETTE: Palette = Palette {
    background: "fde68a",
    foreground: "92400e",
};

#[derive(Debug)]
enum ImageOutcome {
    /// The service rendered at least one image
    Generated(Vec<String>),
    /// No credential configured; the service was never called
    CredentialMissing,
    /// The service was called and failed or returned nothing
    ServiceFailed,
}

/// Two default prompts synthesized from the product title and style.
pub fn default_prompts(product_title: Option<&str>, style: &str) -> Vec<String> {
    let subject = match product_title {
        Some(title) if !title.trim().is_empty() => title.trim(),
        _ => "the product",
    };

    vec![
        format!("Hero shot of {}, {}", subject, style),
        format!("Lifestyle photo of {} in everyday use, {}", subject, style),
    ]
}

/// Acquire one image per prompt, synthesizing default prompts when the list
/// is empty. Never fails; the result length equals the effective prompt
/// count.
pub async fn acquire_images(
    client: Option<&ImageGenClient>,
    prompts: &[String],
    style: &str,
    product: &ProductData,
) -> Vec<GeneratedImage> {
    let prompts: Vec<String> = if prompts.is_empty() {
        default_prompts(product.title.as_deref(), style)
    } else {
        prompts.to_vec()
    };

    let outcome = match client {
        None => {
            debug!("No image credential configured, using placeholders");
            ImageOutcome::CredentialMissing
        }
        Some(client) => request_images(client, &prompts, style, product).await,
    };

    match outcome {
        ImageOutcome::Generated(urls) => prompts
            .iter()
            .enumerate()
            .map(|(index, prompt)| GeneratedImage {
                // A short reply covers the leading prompts; the tail gets
                // absence placeholders, not failure ones.
                url: urls
                    .get(index)
                    .cloned()
                    .unwrap_or_else(|| placeholder_url(&UNCONFIGURED_PALETTE, index)),
                prompt: prompt.clone(),
            })
            .collect(),
        ImageOutcome::CredentialMissing => placeholders(&prompts, &UNCONFIGURED_PALETTE),
        ImageOutcome::ServiceFailed => placeholders(&prompts, &DEGRADED_PALETTE),
    }
}

async fn request_images(
    client: &ImageGenClient,
    prompts: &[String],
    style: &str,
    product: &ProductData,
) -> ImageOutcome {
    let request = ImageGenerationRequest {
        prompts: prompts.to_vec(),
        aspect_ratio: IMAGE_ASPECT_RATIO.to_string(),
        style: style.to_string(),
        count: prompts.len().min(MAX_GENERATED_IMAGES),
        metadata: ImageRequestMetadata {
            product_title: product.title.clone(),
            brand: product.brand.clone(),
            source_url: product.source_url.clone(),
        },
    };

    match client.generate_images(request).await {
        Ok(response) if !response.images.is_empty() => {
            ImageOutcome::Generated(response.images.into_iter().map(|image| image.url).collect())
        }
        Ok(_) => {
            warn!("Image service returned an empty image list, degrading to placeholders");
            ImageOutcome::ServiceFailed
        }
        Err(e) => {
            warn!("Image generation failed, degrading to placeholders: {}", e);
            ImageOutcome::ServiceFailed
        }
    }
}

fn placeholder_url(palette: &Palette, index: usize) -> String {
    format!(
        "https://placehold.co/1024x576/{}/{}?text=Image+{}",
        palette.background,
        palette.foreground,
        index + 1
    )
}

fn placeholders(prompts: &[String], palette: &Palette) -> Vec<GeneratedImage> {
    prompts
        .iter()
        .enumerate()
        .map(|(index, prompt)| GeneratedImage {
            url: placeholder_url(palette, index),
            prompt: prompt.clone(),
        })
        .collect()
}

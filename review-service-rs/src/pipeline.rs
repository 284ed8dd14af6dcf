//! Pipeline Coordinator
//!
//! Validates the inbound request, sequences the pipeline stages and
//! assembles the composed response. Two join points bound the concurrency:
//! extraction runs alongside the dictionary load, and after generation the
//! image acquisition runs alongside spell-checking and structured-data
//! building. A generation failure aborts the request; extraction and image
//! failures are absorbed by their own components and never do.

use std::env;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use content_sdk::config::EnvConfigProvider;
use content_sdk::error::ServiceError;
use content_sdk::imagegen::ImageGenClient;
use content_sdk::textgen::TextGenClient;
use log::{error, info, warn};
use serde_json::Value;

use crate::dictionary::{DictionaryHandle, DEFAULT_WORD_LIST_URL};
use crate::extractor::{ProductData, ProductExtractor};
use crate::models::{GenerateResponse, GenerationRequest, GenerationResult};
use crate::validation::{validate_generate_request, ApiValidationError};
use crate::{discovery, images, spellcheck};

/// Error response body for server-side failures
#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

/// Shared application state
pub struct AppState {
    /// Product page extractor with its browser-identified client
    pub extractor: ProductExtractor,

    /// Text-generation client; absence is fatal per request
    pub textgen: Option<TextGenClient>,

    /// Image-generation client; absence degrades to placeholders
    pub imagegen: Option<ImageGenClient>,

    /// Process-wide dictionary handle
    pub dictionary: DictionaryHandle,
}

impl AppState {
    /// Build the state from the process environment.
    ///
    /// A missing text-generation credential is deliberately not fatal at
    /// startup: every request fails with a configuration error instead, so
    /// the health endpoint stays reachable.
    pub fn from_env() -> Result<Self, ServiceError> {
        let provider = EnvConfigProvider::new();

        let textgen = match TextGenClient::from_provider(&provider) {
            Ok(client) => Some(client),
            Err(e) => {
                warn!("Text-generation client unavailable: {}", e);
                None
            }
        };

        let imagegen = match ImageGenClient::from_provider(&provider) {
            Ok(client) => Some(client),
            Err(e) => {
                info!("Image generation disabled: {}", e);
                None
            }
        };

        let word_list_url =
            env::var("WORD_LIST_URL").unwrap_or_else(|_| DEFAULT_WORD_LIST_URL.to_string());

        Ok(Self {
            extractor: ProductExtractor::new()?,
            textgen,
            imagegen,
            dictionary: DictionaryHandle::new(word_list_url),
        })
    }
}

/// POST /api/v1/generate
pub async fn generate_article(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Json(body) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            return ApiValidationError::InvalidFormat(rejection.body_text())
                .to_response()
                .into_response();
        }
    };

    let request = match validate_generate_request(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!("Rejected generate request: {}", e);
            return e.to_response().into_response();
        }
    };

    info!("Generating review article for {}", request.product_url);

    match run_pipeline(&state, request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Pipeline failed: {}", e);
            server_error(e.to_string())
        }
    }
}

fn server_error(message: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: message,
            code: 500,
        }),
    )
        .into_response()
}

/// Run the full pipeline for a validated request.
pub async fn run_pipeline(
    state: &AppState,
    request: GenerationRequest,
) -> Result<GenerateResponse, ServiceError> {
    // Join point (a): extraction and dictionary load are independent.
    let (product, dictionary) = tokio::join!(
        state.extractor.extract(&request.product_url),
        state.dictionary.get(),
    );
    let dictionary = dictionary?;

    let textgen = state.textgen.as_ref().ok_or_else(|| {
        ServiceError::configuration("Text-generation credential is not configured (LLM_API_KEY)")
    })?;

    let generation = generate_content(textgen, &request, &product).await?;

    // Join point (b): images run alongside spell-check and structured data,
    // which only depend on the generation result.
    let images_fut = images::acquire_images(
        state.imagegen.as_ref(),
        &generation.image_prompts,
        &request.image_style,
        &product,
    );
    let (images, (spell, discovery_schema)) = tokio::join!(images_fut, async {
        let spell = spellcheck::correct_text(&dictionary, &generation.article);

        let discovery_schema = match (&generation.discovery_schema, request.want_discovery_schema) {
            (Some(supplied), _) => Some(supplied.clone()),
            (None, true) => Some(discovery::build_discovery_schema(
                &generation,
                &product,
                &request.affiliate_links,
            )),
            (None, false) => None,
        };

        (spell, discovery_schema)
    });

    Ok(GenerateResponse {
        article: spell.corrected,
        seo: generation.seo,
        product,
        reviews: generation.reviews,
        affiliate_links: request.affiliate_links,
        discovery_schema,
        images,
        spellcheck: spell.corrections,
    })
}

/// Invoke the text-generation service and decode its structured reply.
///
/// Exactly one attempt: a missing credential is a configuration error and a
/// malformed reply is a parse error, both surfaced to the caller untouched.
pub async fn generate_content(
    client: &TextGenClient,
    request: &GenerationRequest,
    product: &ProductData,
) -> Result<GenerationResult, ServiceError> {
    let user_prompt = build_user_prompt(request, product)?;

    let content = client
        .structured_completion(SYSTEM_PROMPT, &user_prompt)
        .await?;

    serde_json::from_str(&content).map_err(|e| {
        ServiceError::parsing(format!(
            "Generation reply was not the expected JSON shape: {}",
            e
        ))
    })
}

const SYSTEM_PROMPT: &str = "\
You are a senior e-commerce content writer producing localized product \
review articles. Reply with a single JSON object containing exactly these \
fields: \"article\" (the full article text), \"seo\" (an object with \
\"title\", \"metaDescription\", \"keywords\" as a string array, \"ogTitle\", \
\"ogDescription\" and optional \"canonicalUrl\"), \"reviews\" (an array of \
objects with \"reviewer\", \"rating\" from 1 to 5, \"summary\" and \
\"details\"), \"discoverySchema\" (a schema.org Product object, or null) and \
\"imagePrompts\" (an array of image prompt strings). Affiliate \
calls-to-action may reference only the affiliate links listed in the \
request; never invent store links.";

fn build_user_prompt(
    request: &GenerationRequest,
    product: &ProductData,
) -> Result<String, ServiceError> {
    let product_json = serde_json::to_string_pretty(product)
        .map_err(|e| ServiceError::parsing(format!("Failed to serialize product data: {}", e)))?;

    let affiliate_lines = {
        let links = request.affiliate_links.non_empty();
        if links.is_empty() {
            "none".to_string()
        } else {
            links
                .iter()
                .map(|(platform, link)| format!("- {}: {}", platform, link))
                .collect::<Vec<_>>()
                .join("\n")
        }
    };

    Ok(format!(
        "Write a marketing review article for the product below.\n\
         \n\
         Locale: {locale}\n\
         SEO keywords: {keywords}\n\
         Outline style: {outline}\n\
         Tone: {tone}\n\
         Call to action: {cta}\n\
         Audience persona: {persona}\n\
         Structured data requested: {wants_schema}\n\
         \n\
         Affiliate links (use only these):\n{affiliates}\n\
         \n\
         Extracted product data:\n{product}",
        locale = request.locale,
        keywords = request.keywords,
        outline = request.outline,
        tone = request.tone,
        cta = request.call_to_action,
        persona = request.geo_persona,
        wants_schema = request.want_discovery_schema,
        affiliates = affiliate_lines,
        product = product_json,
    ))
}

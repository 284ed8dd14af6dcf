//! Service-level tests for the generation pipeline
//!
//! These exercise the coordinator end-to-end against mock upstreams: a
//! product page, the text-generation service, and (where relevant) the
//! image service, with a preloaded dictionary.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use content_sdk::error::ServiceError;
use content_sdk::textgen::TextGenClient;

use crate::dictionary::{Dictionary, DictionaryHandle};
use crate::extractor::ProductExtractor;
use crate::models::{AffiliateLinks, GenerationRequest};
use crate::pipeline::{run_pipeline, AppState};

const DICTIONARY_WORDS: &str = "this\nis\ngood\n";

const PRODUCT_PAGE: &str = r#"
    <html>
      <head>
        <meta property="og:title" content="Trail Kettle">
        <meta name="description" content="A lightweight titanium kettle.">
        <meta property="product:price:amount" content="49.99">
      </head>
      <body></body>
    </html>
"#;

fn completion_with_content(content: &serde_json::Value) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "model": "test-model",
        "choices": [
            {
                "index": 0,
                "message": { "role": "assistant", "content": content.to_string() },
                "finish_reason": "stop"
            }
        ],
        "usage": null
    })
}

fn generation_reply() -> serde_json::Value {
    json!({
        "article": "Ths is gud.",
        "seo": {
            "title": "Trail Kettle Review",
            "metaDescription": "Our verdict on the Trail Kettle.",
            "keywords": ["kettle", "camping"],
            "ogTitle": "Trail Kettle Review",
            "ogDescription": "Our verdict on the Trail Kettle."
        },
        "reviews": [
            { "reviewer": "Dana", "rating": 4, "summary": "Solid", "details": "Good kettle." },
            { "reviewer": "Sam", "rating": 5, "summary": "Great", "details": "Boils fast." }
        ],
        "discoverySchema": null,
        "imagePrompts": []
    })
}

fn test_state(llm_server: &MockServer) -> AppState {
    AppState {
        extractor: ProductExtractor::new().unwrap(),
        textgen: Some(
            TextGenClient::builder()
                .api_key("test-key")
                .base_url(llm_server.uri())
                .model("test-model")
                .timeout(5)
                .build()
                .unwrap(),
        ),
        imagegen: None,
        dictionary: DictionaryHandle::preloaded(Dictionary::from_word_list(DICTIONARY_WORDS)),
    }
}

fn sample_request(product_url: &str) -> GenerationRequest {
    GenerationRequest {
        product_url: product_url.to_string(),
        locale: "en-US".to_string(),
        keywords: "camping kettle".to_string(),
        outline: "listicle".to_string(),
        tone: "friendly".to_string(),
        call_to_action: "Buy it today".to_string(),
        geo_persona: "Outdoor enthusiasts".to_string(),
        want_discovery_schema: true,
        affiliate_links: AffiliateLinks {
            amazon: "https://a.co/x".to_string(),
            ..Default::default()
        },
        image_style: "studio lighting".to_string(),
    }
}

async fn mock_llm(content: &serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_with_content(content)))
        .mount(&server)
        .await;
    server
}

async fn mock_product_page() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/kettle"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PRODUCT_PAGE))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_full_pipeline_happy_path() {
    let page_server = mock_product_page().await;
    let llm_server = mock_llm(&generation_reply()).await;
    let state = test_state(&llm_server);

    let product_url = format!("{}/kettle", page_server.uri());
    let response = run_pipeline(&state, sample_request(&product_url))
        .await
        .unwrap();

    // Spell-checked article with ordered corrections.
    assert_eq!(response.article, "This is good.");
    assert_eq!(response.spellcheck.len(), 2);
    assert_eq!(response.spellcheck[0].original, "Ths");
    assert_eq!(response.spellcheck[0].suggestion, "This");

    // Extracted product facts flow through.
    assert_eq!(response.product.title.as_deref(), Some("Trail Kettle"));
    assert_eq!(response.product.price.as_deref(), Some("49.99"));

    // No image credential and no prompts from the model: two default
    // prompts, two placeholder images, paired in order.
    assert_eq!(response.images.len(), 2);
    assert!(response.images[0].prompt.contains("Trail Kettle"));
    assert!(response.images[0].url.contains("placehold.co"));

    // Structured data was requested and not supplied, so it was built.
    let schema = response.discovery_schema.expect("schema should be built");
    assert_eq!(schema["aggregateRating"]["ratingValue"], "4.5");
    assert_eq!(schema["aggregateRating"]["reviewCount"], 2);
    let related = schema["isRelatedTo"].as_object().unwrap();
    assert_eq!(related.len(), 1);
    assert_eq!(related["amazon"], "https://a.co/x");
    assert_eq!(schema["offers"]["lowPrice"], "49.99");

    // Affiliate links are echoed back.
    assert_eq!(response.affiliate_links.amazon, "https://a.co/x");
    assert_eq!(response.reviews.len(), 2);
}

#[tokio::test]
async fn test_unreachable_product_page_does_not_abort() {
    let llm_server = mock_llm(&generation_reply()).await;
    let state = test_state(&llm_server);

    // Nothing listens on port 1; extraction degrades to source-url-only.
    let response = run_pipeline(&state, sample_request("http://127.0.0.1:1/kettle"))
        .await
        .unwrap();

    assert_eq!(response.product.source_url, "http://127.0.0.1:1/kettle");
    assert!(response.product.title.is_none());
    assert_eq!(response.article, "This is good.");

    // Without a product price, the built schema carries no offers.
    let schema = response.discovery_schema.unwrap();
    assert!(schema.get("offers").is_none());
}

#[tokio::test]
async fn test_model_supplied_schema_is_passed_through() {
    let page_server = mock_product_page().await;
    let mut reply = generation_reply();
    reply["discoverySchema"] = json!({ "@type": "Product", "name": "From Model" });
    let llm_server = mock_llm(&reply).await;
    let state = test_state(&llm_server);

    let product_url = format!("{}/kettle", page_server.uri());
    let response = run_pipeline(&state, sample_request(&product_url))
        .await
        .unwrap();

    let schema = response.discovery_schema.unwrap();
    assert_eq!(schema["name"], "From Model");
    // The builder did not run: no aggregateRating was derived.
    assert!(schema.get("aggregateRating").is_none());
}

#[tokio::test]
async fn test_schema_not_requested_yields_null() {
    let page_server = mock_product_page().await;
    let llm_server = mock_llm(&generation_reply()).await;
    let state = test_state(&llm_server);

    let product_url = format!("{}/kettle", page_server.uri());
    let mut request = sample_request(&product_url);
    request.want_discovery_schema = false;

    let response = run_pipeline(&state, request).await.unwrap();
    assert!(response.discovery_schema.is_none());
}

#[tokio::test]
async fn test_non_json_reply_is_fatal_parse_error() {
    let page_server = mock_product_page().await;

    let llm_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-bad",
            "model": "test-model",
            "choices": [
                {
                    "index": 0,
                    "message": { "role": "assistant", "content": "sorry, no JSON today" },
                    "finish_reason": "stop"
                }
            ],
            "usage": null
        })))
        .mount(&llm_server)
        .await;

    let state = test_state(&llm_server);
    let product_url = format!("{}/kettle", page_server.uri());

    let result = run_pipeline(&state, sample_request(&product_url)).await;
    assert!(matches!(result, Err(ServiceError::Parsing(_))));
}

#[tokio::test]
async fn test_reply_missing_article_fails_closed() {
    let page_server = mock_product_page().await;
    let reply = json!({ "seo": {}, "reviews": [], "imagePrompts": [] });
    let llm_server = mock_llm(&reply).await;
    let state = test_state(&llm_server);

    let product_url = format!("{}/kettle", page_server.uri());
    let result = run_pipeline(&state, sample_request(&product_url)).await;

    assert!(matches!(result, Err(ServiceError::Parsing(_))));
}

#[tokio::test]
async fn test_missing_llm_credential_is_configuration_error() {
    let llm_server = MockServer::start().await;
    let mut state = test_state(&llm_server);
    state.textgen = None;

    let result = run_pipeline(&state, sample_request("https://shop.example/kettle")).await;

    match result {
        Err(e) => assert!(e.is_configuration()),
        Ok(_) => panic!("expected configuration error"),
    }
}

#[tokio::test]
async fn test_model_prompts_drive_image_count() {
    let page_server = mock_product_page().await;
    let mut reply = generation_reply();
    reply["imagePrompts"] = json!(["shot A", "shot B", "shot C"]);
    let llm_server = mock_llm(&reply).await;
    let state = test_state(&llm_server);

    let product_url = format!("{}/kettle", page_server.uri());
    let response = run_pipeline(&state, sample_request(&product_url))
        .await
        .unwrap();

    assert_eq!(response.images.len(), 3);
    assert_eq!(response.images[2].prompt, "shot C");
}

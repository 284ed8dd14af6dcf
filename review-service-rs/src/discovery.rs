//! Structured-Data Builder
//!
//! Assembles a schema.org Product record from the generation output and the
//! extracted product facts. Only runs when the caller asked for structured
//! data and the generation reply did not already supply its own.

use serde_json::{json, Map, Value};

use crate::extractor::ProductData;
use crate::models::{AffiliateLinks, GenerationResult, Review};

/// Fixed offer currency
pub const OFFER_CURRENCY: &str = "USD";

/// Fixed offer availability
pub const OFFER_AVAILABILITY: &str = "https://schema.org/InStock";

/// Build the product-review structured record.
pub fn build_discovery_schema(
    result: &GenerationResult,
    product: &ProductData,
    affiliate_links: &AffiliateLinks,
) -> Value {
    let mut schema = Map::new();

    schema.insert("@context".to_string(), json!("https://schema.org"));
    schema.insert("@type".to_string(), json!("Product"));

    let name = product
        .title
        .clone()
        .unwrap_or_else(|| result.seo.title.clone());
    schema.insert("name".to_string(), json!(name));

    let description = product
        .description
        .clone()
        .unwrap_or_else(|| result.seo.meta_description.clone());
    schema.insert("description".to_string(), json!(description));

    if !product.images.is_empty() {
        schema.insert("image".to_string(), json!(product.images));
    }

    if !result.reviews.is_empty() {
        schema.insert(
            "review".to_string(),
            Value::Array(result.reviews.iter().map(review_entry).collect()),
        );
        schema.insert(
            "aggregateRating".to_string(),
            json!({
                "@type": "AggregateRating",
                "ratingValue": mean_rating(&result.reviews),
                "reviewCount": result.reviews.len(),
            }),
        );
    }

    if let Some(price) = &product.price {
        schema.insert(
            "offers".to_string(),
            json!({
                "@type": "AggregateOffer",
                "lowPrice": price,
                "highPrice": price,
                "priceCurrency": OFFER_CURRENCY,
                "availability": OFFER_AVAILABILITY,
                "url": product.source_url,
            }),
        );
    }

    let related: Map<String, Value> = affiliate_links
        .non_empty()
        .into_iter()
        .map(|(platform, link)| (platform.to_string(), json!(link)))
        .collect();
    schema.insert("isRelatedTo".to_string(), Value::Object(related));

    Value::Object(schema)
}

fn review_entry(review: &Review) -> Value {
    json!({
        "@type": "Review",
        "author": { "@type": "Person", "name": review.reviewer },
        "name": review.summary,
        "reviewBody": review.details,
        "reviewRating": {
            "@type": "Rating",
            "ratingValue": review.rating,
            "bestRating": 5,
            "worstRating": 1,
        },
    })
}

/// Arithmetic mean of all review ratings, formatted to one decimal place.
fn mean_rating(reviews: &[Review]) -> String {
    let sum: f64 = reviews.iter().map(|r| r.rating).sum();
    format!("{:.1}", sum / reviews.len() as f64)
}

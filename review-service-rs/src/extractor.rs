//! Product Data Extractor
//!
//! Fetches a product page and best-effort parses structured facts out of its
//! markup. Every field runs a fallback chain (social-preview metadata, then
//! document defaults, then microdata annotations), and the whole operation
//! absorbs its own failures: an unreachable page yields a `ProductData`
//! carrying only the source URL.

use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use content_sdk::error::ServiceError;
use log::{debug, warn};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use url::Url;

/// Page fetch timeout
pub const PAGE_FETCH_TIMEOUT_SECS: u64 = 10;

/// Image list cap, after deduplication
pub const MAX_IMAGES: usize = 6;

/// Highlight list cap
pub const MAX_HIGHLIGHTS: usize = 10;

// Product pages routinely serve stripped-down markup to unknown agents, so
// the fetch identifies as a desktop browser.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

// Containers that conventionally hold highlight/feature bullet lists.
const HIGHLIGHT_SELECTORS: &[&str] = &[
    "#feature-bullets li",
    ".product-highlights li",
    ".highlights li",
    "ul.features li",
    "[data-hook=\"product-highlights\"] li",
];

/// Best-effort structured facts extracted from a product page
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProductData {
    /// The page the facts came from; the only field that is always set
    pub source_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub specifications: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

impl ProductData {
    /// The maximally-empty record: only the source URL is known.
    pub fn from_url(url: &str) -> Self {
        Self {
            source_url: url.to_string(),
            ..Default::default()
        }
    }
}

/// Fetches product pages and extracts `ProductData` from them
pub struct ProductExtractor {
    client: Client,
}

impl ProductExtractor {
    /// Build the extractor with its browser-identified HTTP client
    pub fn new() -> Result<Self, ServiceError> {
        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(Duration::from_secs(PAGE_FETCH_TIMEOUT_SECS))
            .gzip(true)
            .build()
            .map_err(|e| {
                ServiceError::configuration(format!("Failed to build extractor HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }

    /// Extract product facts from a page.
    ///
    /// Hard contract: never fails. Network errors, timeouts, non-2xx replies
    /// and parse trouble are logged and collapse to `ProductData::from_url`.
    pub async fn extract(&self, url: &str) -> ProductData {
        match self.fetch_and_parse(url).await {
            Ok(data) => data,
            Err(e) => {
                warn!("Product extraction failed for {}: {}", url, e);
                ProductData::from_url(url)
            }
        }
    }

    async fn fetch_and_parse(&self, url: &str) -> Result<ProductData, ServiceError> {
        debug!("Fetching product page {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ServiceError::from_transport("product-page", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::service(format!(
                "Product page returned HTTP {}",
                status.as_u16()
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| ServiceError::parsing(format!("Failed to read product page: {}", e)))?;

        Ok(parse_product_document(url, &html))
    }
}

/// Parse product facts out of an HTML document.
///
/// Pure and synchronous, so it is directly unit-testable against markup
/// literals.
pub fn parse_product_document(source_url: &str, html: &str) -> ProductData {
    let doc = Html::parse_document(html);
    let base = Url::parse(source_url).ok();

    let title = meta_content(&doc, "meta[property=\"og:title\"]")
        .or_else(|| first_text(&doc, "title"));

    let description = meta_content(&doc, "meta[name=\"description\"]")
        .or_else(|| meta_content(&doc, "meta[property=\"og:description\"]"));

    let price = meta_content(&doc, "meta[property=\"product:price:amount\"]")
        .or_else(|| micro_value(&doc, "[itemprop=\"price\"]"));

    let brand = micro_value(&doc, "[itemprop=\"brand\"]")
        .or_else(|| meta_content(&doc, "meta[property=\"product:brand\"]"));

    ProductData {
        source_url: source_url.to_string(),
        title,
        description,
        highlights: collect_highlights(&doc),
        specifications: collect_specifications(&doc),
        price,
        brand,
        images: collect_images(&doc, base.as_ref()),
    }
}

fn selector(css: &str) -> Selector {
    // Selectors here are compile-time literals.
    Selector::parse(css).expect("Invalid selector")
}

fn normalized_text(element: ElementRef) -> String {
    let text: String = element.text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn meta_content(doc: &Html, css: &str) -> Option<String> {
    doc.select(&selector(css))
        .find_map(|el| el.value().attr("content"))
        .map(|v| v.trim().to_string())
        .and_then(non_empty)
}

fn first_text(doc: &Html, css: &str) -> Option<String> {
    doc.select(&selector(css))
        .next()
        .map(normalized_text)
        .and_then(non_empty)
}

/// Value of a micro-annotated element: the `content` attribute wins over the
/// element text.
fn micro_value(doc: &Html, css: &str) -> Option<String> {
    let element = doc.select(&selector(css)).next()?;

    if let Some(content) = element.value().attr("content") {
        return non_empty(content.trim().to_string());
    }

    non_empty(normalized_text(element))
}

fn collect_images(doc: &Html, base: Option<&Url>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut images = Vec::new();

    for element in doc.select(&selector("img")) {
        let Some(src) = element.value().attr("src") else {
            continue;
        };

        let Some(resolved) = resolve_image_url(src, base) else {
            continue;
        };

        if seen.insert(resolved.clone()) {
            images.push(resolved);
            if images.len() == MAX_IMAGES {
                break;
            }
        }
    }

    images
}

fn resolve_image_url(src: &str, base: Option<&Url>) -> Option<String> {
    let url = match Url::parse(src) {
        Ok(url) => url,
        Err(_) => base?.join(src).ok()?,
    };

    match url.scheme() {
        "http" | "https" => Some(url.to_string()),
        _ => None,
    }
}

fn collect_highlights(doc: &Html) -> Vec<String> {
    let mut highlights = Vec::new();

    for css in HIGHLIGHT_SELECTORS {
        for element in doc.select(&selector(css)) {
            let text = normalized_text(element);
            if !text.is_empty() && !highlights.contains(&text) {
                highlights.push(text);
                if highlights.len() == MAX_HIGHLIGHTS {
                    return highlights;
                }
            }
        }
    }

    highlights
}

fn collect_specifications(doc: &Html) -> BTreeMap<String, String> {
    let mut specs = BTreeMap::new();

    // Paired microdata first.
    let names: Vec<String> = doc
        .select(&selector("[itemprop=\"name\"]"))
        .map(normalized_text)
        .collect();
    let values: Vec<String> = doc
        .select(&selector("[itemprop=\"value\"]"))
        .map(normalized_text)
        .collect();

    for (name, value) in names.into_iter().zip(values) {
        if !name.is_empty() && !value.is_empty() {
            specs.entry(name).or_insert(value);
        }
    }

    if !specs.is_empty() {
        return specs;
    }

    // Fall back to two-cell table rows.
    for row in doc.select(&selector("table tr")) {
        let cells: Vec<String> = row
            .select(&selector("td, th"))
            .map(normalized_text)
            .collect();

        if let [name, value] = cells.as_slice() {
            if !name.is_empty() && !value.is_empty() {
                specs.entry(name.clone()).or_insert_with(|| value.clone());
            }
        }
    }

    specs
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRODUCT_PAGE: &str = r#"
        <html>
          <head>
            <title>Fallback Title - Shop</title>
            <meta property="og:title" content="Trail Kettle 1.2L">
            <meta name="description" content="A lightweight titanium kettle.">
            <meta property="product:price:amount" content="49.99">
          </head>
          <body>
            <span itemprop="brand">Northbound</span>
            <div id="feature-bullets">
              <ul>
                <li>Weighs 140 g</li>
                <li>Boils in 3 minutes</li>
                <li>Weighs 140 g</li>
              </ul>
            </div>
            <img src="/img/kettle-front.jpg">
            <img src="https://cdn.shop.example/kettle-side.jpg">
            <img src="https://cdn.shop.example/kettle-side.jpg">
            <img src="data:image/png;base64,AAAA">
            <table>
              <tr><td>Material</td><td>Titanium</td></tr>
              <tr><td>Capacity</td><td>1.2 L</td></tr>
              <tr><td>only one cell</td></tr>
            </table>
          </body>
        </html>
    "#;

    #[test]
    fn test_fallback_chain_prefers_social_metadata() {
        let data = parse_product_document("https://shop.example/kettle", PRODUCT_PAGE);

        assert_eq!(data.title.as_deref(), Some("Trail Kettle 1.2L"));
        assert_eq!(
            data.description.as_deref(),
            Some("A lightweight titanium kettle.")
        );
        assert_eq!(data.price.as_deref(), Some("49.99"));
        assert_eq!(data.brand.as_deref(), Some("Northbound"));
    }

    #[test]
    fn test_title_falls_back_to_document_title() {
        let html = "<html><head><title>Plain Title</title></head><body></body></html>";
        let data = parse_product_document("https://shop.example/x", html);
        assert_eq!(data.title.as_deref(), Some("Plain Title"));
    }

    #[test]
    fn test_images_resolved_deduplicated_and_capped() {
        let data = parse_product_document("https://shop.example/kettle", PRODUCT_PAGE);

        assert_eq!(
            data.images,
            vec![
                "https://shop.example/img/kettle-front.jpg".to_string(),
                "https://cdn.shop.example/kettle-side.jpg".to_string(),
            ]
        );

        let many_imgs: String = (0..20)
            .map(|i| format!("<img src=\"https://cdn.example/{}.jpg\">", i))
            .collect();
        let html = format!("<html><body>{}</body></html>", many_imgs);
        let data = parse_product_document("https://shop.example/x", &html);
        assert_eq!(data.images.len(), MAX_IMAGES);
    }

    #[test]
    fn test_highlights_deduplicated_and_capped() {
        let data = parse_product_document("https://shop.example/kettle", PRODUCT_PAGE);
        assert_eq!(
            data.highlights,
            vec!["Weighs 140 g".to_string(), "Boils in 3 minutes".to_string()]
        );

        let many_items: String = (0..15).map(|i| format!("<li>Feature {}</li>", i)).collect();
        let html = format!(
            "<html><body><div id=\"feature-bullets\"><ul>{}</ul></div></body></html>",
            many_items
        );
        let data = parse_product_document("https://shop.example/x", &html);
        assert_eq!(data.highlights.len(), MAX_HIGHLIGHTS);
    }

    #[test]
    fn test_specifications_table_fallback() {
        let data = parse_product_document("https://shop.example/kettle", PRODUCT_PAGE);

        assert_eq!(data.specifications.get("Material").map(String::as_str), Some("Titanium"));
        assert_eq!(data.specifications.get("Capacity").map(String::as_str), Some("1.2 L"));
        assert_eq!(data.specifications.len(), 2);
    }

    #[test]
    fn test_specifications_microdata_wins_over_table() {
        let html = r#"
            <html><body>
              <span itemprop="name">Weight</span><span itemprop="value">140 g</span>
              <table><tr><td>Material</td><td>Titanium</td></tr></table>
            </body></html>
        "#;
        let data = parse_product_document("https://shop.example/x", html);
        assert_eq!(data.specifications.get("Weight").map(String::as_str), Some("140 g"));
        assert!(!data.specifications.contains_key("Material"));
    }

    #[test]
    fn test_empty_page_yields_only_source_url() {
        let data = parse_product_document("https://shop.example/empty", "<html></html>");
        assert_eq!(data, ProductData::from_url("https://shop.example/empty"));
    }

    #[tokio::test]
    async fn test_unreachable_url_yields_only_source_url() {
        let extractor = ProductExtractor::new().unwrap();
        // Nothing listens on port 1.
        let url = "http://127.0.0.1:1/product";
        let data = extractor.extract(url).await;
        assert_eq!(data, ProductData::from_url(url));
    }
}

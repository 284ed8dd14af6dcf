//! ReviewForge review-generation service
//!
//! Turns a product URL into a localized marketing review article with SEO
//! metadata, schema.org structured data, spell-checked prose and imagery.
//!
//! The pipeline is stateless per request: the only process-wide resource is
//! the spell-check dictionary, constructed once and shared read-only.

pub mod dictionary;
pub mod discovery;
pub mod extractor;
pub mod images;
pub mod models;
pub mod pipeline;
pub mod spellcheck;
pub mod validation;

#[cfg(test)]
mod tests;

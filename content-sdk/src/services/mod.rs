//! Service-specific client implementations
//!
//! This module contains client implementations for the external services the
//! pipeline consumes.

pub mod imagegen;
pub mod textgen;
mod common;

pub use common::UserAgent;

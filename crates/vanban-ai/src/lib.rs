//! Classification capability for the segmentation pipeline.
//!
//! The pipeline never talks to a model directly; it is handed
//! something implementing [`Classify`]. Production uses the
//! Gemini-backed [`GeminiClassifier`]; tests use the deterministic
//! [`StaticClassifier`].

mod gemini;
mod stub;

pub use gemini::{GeminiClassifier, GeminiConfig};
pub use stub::StaticClassifier;

use std::future::Future;

use thiserror::Error;
use vanban_core::Category;

#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("empty model response")]
    EmptyResponse,
    #[error("classifier unavailable: {0}")]
    Unavailable(String),
}

/// Raw outcome of one classification call, before coercion to the
/// closed taxonomy.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifyResponse {
    pub label: String,
    pub raw_confidence: f32,
}

/// A single-label document classifier.
///
/// `excerpt` is a bounded slice of the document; `categories` is the
/// closed set the response must come from. Implementations do not
/// coerce — the caller validates the label against the taxonomy.
pub trait Classify {
    fn classify(
        &self,
        excerpt: &str,
        categories: &[Category],
    ) -> impl Future<Output = Result<ClassifyResponse, ClassifyError>> + Send;
}

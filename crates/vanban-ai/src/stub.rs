//! Deterministic classifier stub for tests and offline runs.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};

use vanban_core::Category;

use crate::{Classify, ClassifyError, ClassifyResponse};

/// Always returns the same label; counts invocations so tests can
/// assert the one-call-per-document bound.
pub struct StaticClassifier {
    label: String,
    raw_confidence: f32,
    fail: bool,
    calls: AtomicUsize,
}

impl StaticClassifier {
    pub fn new(label: impl Into<String>, raw_confidence: f32) -> Self {
        Self {
            label: label.into(),
            raw_confidence,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// A stub whose every call errors, for exercising the coerced
    /// fallback path.
    pub fn failing() -> Self {
        Self {
            label: String::new(),
            raw_confidence: 0.0,
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of classify calls observed so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Classify for StaticClassifier {
    fn classify(
        &self,
        _excerpt: &str,
        _categories: &[Category],
    ) -> impl Future<Output = Result<ClassifyResponse, ClassifyError>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let result = if self.fail {
            Err(ClassifyError::Unavailable("stub configured to fail".into()))
        } else {
            Ok(ClassifyResponse {
                label: self.label.clone(),
                raw_confidence: self.raw_confidence,
            })
        };
        async move { result }
    }
}

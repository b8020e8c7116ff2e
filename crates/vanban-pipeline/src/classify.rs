//! Document-level category resolution.
//!
//! Two-stage: a deterministic keyword heuristic over filename and
//! content, then a single external-model call for inconclusive
//! documents. The external call carries a timeout and at most one
//! retry with backoff; on exhaustion the document gets the coerced
//! fallback category rather than an error.

use std::time::Duration;

use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};
use vanban_ai::Classify;
use vanban_core::Category;

use crate::config::CompiledConfig;

/// Where a document's category came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Keyword heuristic matched above threshold, no external call.
    Heuristic,
    /// External classifier returned an in-taxonomy label.
    External,
    /// Coerced: heuristic inconclusive and the external path failed
    /// or produced an out-of-taxonomy label.
    Fallback,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Heuristic => "heuristic",
            Self::External => "external",
            Self::Fallback => "fallback",
        }
    }
}

/// Resolved document classification.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub category: Category,
    pub provenance: Provenance,
    /// Warning text when the external path failed, else `None`.
    pub unavailable: Option<String>,
}

/// Stage 1: keyword heuristic. Filename hits score 0.9, content hits
/// 0.8; the first entry in table order wins.
pub(crate) fn heuristic_category(
    cfg: &CompiledConfig,
    filename: &str,
    text: &str,
) -> Option<Category> {
    let name = filename
        .rsplit('/')
        .next()
        .map(|n| n.rsplit_once('.').map_or(n, |(stem, _)| stem))
        .unwrap_or(filename)
        .to_lowercase();
    let content = text.to_lowercase();

    let mut best: Option<(Category, f32)> = None;
    for entry in &cfg.keywords {
        for keyword in &entry.keywords {
            let score = if name.contains(keyword.as_str()) {
                0.9
            } else if content.contains(keyword.as_str()) {
                0.8
            } else {
                continue;
            };
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((entry.category, score));
            }
            break;
        }
    }

    match best {
        Some((category, score)) if score >= cfg.heuristic_threshold => {
            debug!(category = %category, score, "heuristic classification accepted");
            Some(category)
        }
        Some((category, score)) => {
            debug!(category = %category, score, "heuristic score below threshold");
            None
        }
        None => None,
    }
}

/// Stage 2: one external call, timeout + single retry with backoff.
pub(crate) async fn external_category<C: Classify>(
    cfg: &CompiledConfig,
    classifier: &C,
    excerpt: &str,
) -> Classification {
    let budget = Duration::from_secs(cfg.classify_timeout_secs);

    let mut last_error = String::new();
    for attempt in 0..2 {
        if attempt > 0 {
            sleep(Duration::from_millis(cfg.classify_retry_backoff_ms)).await;
        }
        match timeout(budget, classifier.classify(excerpt, &Category::ALL)).await {
            Ok(Ok(response)) => {
                return match Category::from_label(&response.label) {
                    Some(category) => {
                        info!(category = %category, "external classification resolved");
                        Classification {
                            category,
                            provenance: Provenance::External,
                            unavailable: None,
                        }
                    }
                    None => {
                        warn!(label = %response.label, "out-of-taxonomy label coerced to fallback");
                        Classification {
                            category: cfg.fallback_category,
                            provenance: Provenance::Fallback,
                            unavailable: None,
                        }
                    }
                };
            }
            Ok(Err(err)) => {
                warn!(attempt, error = %err, "classification call failed");
                last_error = err.to_string();
            }
            Err(_) => {
                warn!(attempt, timeout_secs = cfg.classify_timeout_secs, "classification call timed out");
                last_error = format!("timed out after {}s", cfg.classify_timeout_secs);
            }
        }
    }

    Classification {
        category: cfg.fallback_category,
        provenance: Provenance::Fallback,
        unavailable: Some(last_error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use vanban_ai::StaticClassifier;

    fn compiled() -> crate::config::CompiledConfig {
        PipelineConfig::default().compile().unwrap()
    }

    #[test]
    fn filename_keyword_beats_threshold() {
        let cfg = compiled();
        let c = heuristic_category(&cfg, "quy-che-tuyển sinh-2024.pdf", "nội dung bất kỳ");
        assert_eq!(c, Some(Category::Admissions));
    }

    #[test]
    fn content_keyword_beats_threshold() {
        let cfg = compiled();
        let c = heuristic_category(&cfg, "tai-lieu.docx", "quy định về học phí năm học");
        assert_eq!(c, Some(Category::FinanceAndTuition));
    }

    #[test]
    fn table_order_breaks_score_ties() {
        let cfg = compiled();
        // Both admissions and examination keywords present in content;
        // admissions comes first in the table.
        let c = heuristic_category(&cfg, "x.pdf", "tuyển sinh và kỳ thi");
        assert_eq!(c, Some(Category::Admissions));
    }

    #[test]
    fn no_keywords_is_inconclusive() {
        let cfg = compiled();
        assert_eq!(heuristic_category(&cfg, "x.pdf", "văn xuôi trung tính"), None);
    }

    #[test]
    fn high_threshold_rejects_content_hits() {
        let mut cfg = PipelineConfig::default();
        cfg.heuristic_threshold = 0.85;
        let cfg = cfg.compile().unwrap();
        assert_eq!(heuristic_category(&cfg, "x.pdf", "quy định về học phí"), None);
        // A filename hit at 0.9 still passes.
        assert_eq!(
            heuristic_category(&cfg, "học phí.pdf", "trống"),
            Some(Category::FinanceAndTuition)
        );
    }

    #[tokio::test]
    async fn external_label_parsed_against_taxonomy() {
        let cfg = compiled();
        let stub = StaticClassifier::new("examination", 0.7);
        let c = external_category(&cfg, &stub, "đề thi").await;
        assert_eq!(c.category, Category::Examination);
        assert_eq!(c.provenance, Provenance::External);
        assert!(c.unavailable.is_none());
    }

    #[tokio::test]
    async fn out_of_taxonomy_label_coerced() {
        let cfg = compiled();
        let stub = StaticClassifier::new("sports_and_leisure", 0.9);
        let c = external_category(&cfg, &stub, "x").await;
        assert_eq!(c.category, Category::FALLBACK);
        assert_eq!(c.provenance, Provenance::Fallback);
    }

    #[tokio::test]
    async fn failure_retries_once_then_falls_back() {
        let mut raw = PipelineConfig::default();
        raw.classify_retry_backoff_ms = 1;
        let cfg = raw.compile().unwrap();
        let stub = StaticClassifier::failing();
        let c = external_category(&cfg, &stub, "x").await;
        assert_eq!(stub.calls(), 2);
        assert_eq!(c.provenance, Provenance::Fallback);
        assert!(c.unavailable.is_some());
    }
}

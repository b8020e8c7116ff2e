//! Pipeline orchestration.
//!
//! One [`Pipeline`] serves any number of documents; a run holds no
//! state beyond a per-run memo cell for the single classification
//! outcome, so runs are idempotent and documents can be processed
//! concurrently. A run never fails for document content — malformed
//! or incomplete input degrades to warnings on the output.

use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::info;
use vanban_ai::Classify;
use vanban_core::{Category, MetadataBlock, RawDocument};

use crate::blocks::build_blocks;
use crate::classify::{external_category, heuristic_category, Classification, Provenance};
use crate::config::{CompiledConfig, ConfigError, PipelineConfig};
use crate::confidence::score;
use crate::detect::detect_boundaries;
use crate::extract::{extract_amendments, extract_header, head_chars};
use crate::markdown::render_document;
use crate::normalize::normalize;

/// Non-fatal conditions surfaced to the caller alongside the blocks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    #[error("header extraction incomplete, empty fields: {}", missing.join(", "))]
    ExtractionIncomplete { missing: Vec<&'static str> },
    #[error("external classifier unavailable: {reason}")]
    ClassifierUnavailable { reason: String },
}

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub blocks: Vec<MetadataBlock>,
    pub category: Category,
    pub provenance: Provenance,
    pub warnings: Vec<Warning>,
}

impl PipelineOutput {
    /// The canonical two-section markdown for display and persistence.
    pub fn to_markdown(&self) -> String {
        render_document(&self.blocks)
    }
}

/// The segmentation and metadata pipeline.
///
/// Construction compiles and validates the configuration — the only
/// fatal path in the system. `run` is infallible per document.
pub struct Pipeline<C> {
    cfg: CompiledConfig,
    classifier: C,
}

impl<C: Classify> Pipeline<C> {
    pub fn new(config: PipelineConfig, classifier: C) -> Result<Self, ConfigError> {
        let cfg = config.compile()?;
        Ok(Self { cfg, classifier })
    }

    /// Normalize the raw body and cut the signature footer; block
    /// contents partition exactly this string.
    pub fn normalize_body(&self, raw: &str) -> String {
        let normalized = normalize(raw);
        match self.cfg.footer.find(&normalized) {
            Some(m) => normalized[..m.start()].trim_end().to_string(),
            None => normalized,
        }
    }

    /// Run the full pipeline over one document.
    ///
    /// For an empty or whitespace-only body this yields zero blocks
    /// and the configured fallback category without consulting the
    /// classifier.
    pub async fn run(&self, doc: &RawDocument) -> PipelineOutput {
        let body = self.normalize_body(&doc.body);

        let boundaries = detect_boundaries(&self.cfg, &body);
        let content_blocks = build_blocks(&body, &boundaries);
        if content_blocks.is_empty() {
            info!(filename = %doc.filename, "document produced zero blocks");
            return PipelineOutput {
                blocks: Vec::new(),
                category: self.cfg.fallback_category,
                provenance: Provenance::Heuristic,
                warnings: Vec::new(),
            };
        }

        let mut warnings = Vec::new();

        let header = extract_header(&body);
        let missing = header.missing_fields();
        if !missing.is_empty() {
            warnings.push(Warning::ExtractionIncomplete { missing });
        }

        // One classification per document, shared by every block. The
        // memo cell serializes would-be concurrent attempts so at most
        // one external call is outstanding.
        let memo: OnceCell<Classification> = OnceCell::new();
        let classification = memo
            .get_or_init(|| async {
                if let Some(category) = heuristic_category(&self.cfg, &doc.filename, &body) {
                    return Classification {
                        category,
                        provenance: Provenance::Heuristic,
                        unavailable: None,
                    };
                }
                let excerpt = head_chars(&body, self.cfg.max_excerpt_chars);
                external_category(&self.cfg, &self.classifier, excerpt).await
            })
            .await;

        if let Some(reason) = &classification.unavailable {
            warnings.push(Warning::ClassifierUnavailable {
                reason: reason.clone(),
            });
        }

        let blocks: Vec<MetadataBlock> = content_blocks
            .into_iter()
            .map(|block| {
                let flags = extract_amendments(&block.content);
                MetadataBlock {
                    index: block.index,
                    confidence: score(block.boundary.kind, classification.provenance),
                    source: block.boundary.label.clone(),
                    boundary: block.boundary,
                    content: block.content,
                    doc_id: header.doc_id.clone(),
                    department: header.department.clone(),
                    type_data: "markdown".to_string(),
                    category: classification.category,
                    date: header.date.clone(),
                    modify: flags.modify,
                    partial_mod: flags.partial_mod,
                    amend: flags.amend,
                }
            })
            .collect();

        info!(
            filename = %doc.filename,
            blocks = blocks.len(),
            category = %classification.category,
            provenance = classification.provenance.as_str(),
            "pipeline run complete"
        );

        PipelineOutput {
            blocks,
            category: classification.category,
            provenance: classification.provenance,
            warnings,
        }
    }
}

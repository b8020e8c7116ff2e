//! Shared block types for the segmentation pipeline.
//!
//! A document is partitioned into ordered, non-overlapping
//! [`ContentBlock`]s; each carries a verbatim substring of the
//! normalized body. [`MetadataBlock`] adds the eight-field metadata
//! record persisted downstream.

use serde::{Deserialize, Serialize};

use crate::category::Category;

/// A raw extracted document body as supplied by the file store.
///
/// Immutable once created; the pipeline only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDocument {
    pub body: String,
    pub filename: String,
    /// ISO 8601 timestamp string.
    pub uploaded_at: String,
}

impl RawDocument {
    pub fn new(body: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            filename: filename.into(),
            uploaded_at: String::new(),
        }
    }
}

/// Structural marker classes, in descending rule priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryKind {
    /// Chương — chapter grouping.
    Chapter,
    /// Điều — numbered article.
    Article,
    /// Khoản — numbered clause within an article.
    Clause,
    /// Điểm — lettered point within a clause.
    Point,
    /// Căn cứ / Theo — legal-basis citation preamble.
    Basis,
    /// QUYẾT ĐỊNH — the operative decision header.
    Decision,
    /// Special enumerations ("như sau:", "Quy trình").
    Special,
}

impl BoundaryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chapter => "chapter",
            Self::Article => "article",
            Self::Clause => "clause",
            Self::Point => "point",
            Self::Basis => "basis",
            Self::Decision => "decision",
            Self::Special => "special",
        }
    }
}

/// A detected structural boundary in the normalized body.
///
/// Boundaries are ordered by `start_offset` and never share an offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boundary {
    pub kind: BoundaryKind,
    /// Byte offset into the normalized body.
    pub start_offset: usize,
    /// Human-readable label, e.g. `Điều 8, Khoản 3`.
    pub label: String,
}

/// One structural block of the partitioned document.
///
/// Invariant: concatenating block contents in index order reproduces
/// the normalized body region with no gap and no overlap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub index: usize,
    pub boundary: Boundary,
    /// Verbatim substring of the normalized body.
    pub content: String,
}

/// A content block with its resolved metadata record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataBlock {
    pub index: usize,
    pub boundary: Boundary,
    pub content: String,
    /// Decision number, identical across all blocks of one document.
    pub doc_id: String,
    /// Issuing authority, may be empty.
    pub department: String,
    /// Always "markdown" for this pipeline.
    pub type_data: String,
    pub category: Category,
    /// ISO 8601 date, identical across all blocks of one document.
    pub date: String,
    /// Originating boundary label.
    pub source: String,
    /// Deterministic score in [0, 1].
    pub confidence: f32,
    /// Block text contains amendment vocabulary.
    pub modify: bool,
    /// Amendment is scoped to part of a cited article.
    pub partial_mod: bool,
    /// Referenced prior decision number, else empty.
    pub amend: String,
}

//! Segmentation and metadata pipeline for Vietnamese administrative
//! documents.
//!
//! A [`Pipeline`] takes one normalized document through boundary
//! detection, block building, header extraction, classification, and
//! confidence scoring, then renders the canonical markdown form.

pub mod config;
pub mod markdown;
pub mod normalize;
pub mod pipeline;

mod blocks;
mod classify;
mod confidence;
mod detect;
mod extract;

pub use classify::Provenance;
pub use config::{BoundaryRule, ConfigError, KeywordEntry, PipelineConfig};
pub use confidence::score;
pub use extract::{extract_amendments, extract_header, AmendmentFlags, DocHeader};
pub use markdown::{render_block, render_document};
pub use normalize::normalize;
pub use pipeline::{Pipeline, PipelineOutput, Warning};

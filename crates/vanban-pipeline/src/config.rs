//! Pipeline configuration.
//!
//! Everything that shapes pipeline behavior — the boundary rule table,
//! the category keyword table, thresholds, classifier budgets — is an
//! explicit, serde-loadable value. Compilation happens once at
//! pipeline construction; an invalid table is the only fatal error in
//! the whole system and it fires before any document is processed.

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use vanban_core::{BoundaryKind, Category};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("boundary rule table is empty")]
    EmptyRuleTable,
    #[error("invalid pattern {pattern:?} for {kind:?}: {source}")]
    InvalidPattern {
        kind: BoundaryKind,
        pattern: String,
        source: regex::Error,
    },
    #[error("invalid footer pattern {pattern:?}: {source}")]
    InvalidFooterPattern {
        pattern: String,
        source: regex::Error,
    },
    #[error("heuristic threshold {0} outside [0, 1]")]
    InvalidThreshold(f32),
    #[error("keyword table entry for {0} has no keywords")]
    EmptyKeywordEntry(Category),
    #[error("max_excerpt_chars must be non-zero")]
    ZeroExcerpt,
}

/// One data-defined boundary rule: a line-anchored pattern, the kind
/// of boundary it produces, and its priority (higher wins on ties).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryRule {
    pub kind: BoundaryKind,
    pub pattern: String,
    pub priority: u8,
}

/// Keyword list driving the heuristic classification fast path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub category: Category,
    pub keywords: Vec<String>,
}

/// Immutable pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Boundary grammar, matched line by line in priority order.
    pub rules: Vec<BoundaryRule>,
    /// Line pattern ending the scannable region (signature block).
    pub footer_pattern: String,
    /// Heuristic keyword table, in taxonomy priority order.
    pub keywords: Vec<KeywordEntry>,
    /// Minimum heuristic score to skip the external classifier.
    pub heuristic_threshold: f32,
    /// Category used when classification is coerced.
    pub fallback_category: Category,
    /// Upper bound on the excerpt sent to the external classifier.
    pub max_excerpt_chars: usize,
    /// External call timeout.
    pub classify_timeout_secs: u64,
    /// Backoff before the single retry.
    pub classify_retry_backoff_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            rules: default_rules(),
            footer_pattern: r"^(?:Nơi\s+nhận\s*:|KT\.\s*HIỆU TRƯỞNG|HIỆU TRƯỞNG\b)".into(),
            keywords: default_keywords(),
            heuristic_threshold: 0.75,
            fallback_category: Category::FALLBACK,
            max_excerpt_chars: 4000,
            classify_timeout_secs: 30,
            classify_retry_backoff_ms: 500,
        }
    }
}

fn default_rules() -> Vec<BoundaryRule> {
    let rule = |kind, pattern: &str, priority| BoundaryRule {
        kind,
        pattern: pattern.to_string(),
        priority,
    };
    vec![
        rule(BoundaryKind::Chapter, r"^Chương\s+([IVXLC]+|\d+)\b", 70),
        rule(BoundaryKind::Article, r"^Điều\s+(\d+)\b", 60),
        rule(BoundaryKind::Clause, r"^Khoản\s+(\d+)\b", 50),
        rule(BoundaryKind::Clause, r"^(\d+)\.\s+", 49),
        rule(BoundaryKind::Point, r"^Điểm\s+([a-zđ])\b", 41),
        rule(BoundaryKind::Point, r"^([a-zđ])\)\s+", 40),
        rule(BoundaryKind::Basis, r"^(?:Căn\s+cứ|Theo)\b", 30),
        rule(BoundaryKind::Decision, r"^QUYẾT\s+ĐỊNH\b", 29),
        rule(BoundaryKind::Special, r"^(.{0,120}?)\s*như\s+sau\s*:\s*$", 20),
        rule(BoundaryKind::Special, r"^(Quy\s*trình\b.*)$", 19),
    ]
}

fn default_keywords() -> Vec<KeywordEntry> {
    let entry = |category, keywords: &[&str]| KeywordEntry {
        category,
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
    };
    vec![
        entry(Category::Admissions, &["tuyển sinh", "xét tuyển", "dự tuyển"]),
        entry(
            Category::PostgraduateTraining,
            &["thạc sĩ", "tiến sĩ", "sau đại học", "thạc sỹ", "tiến sỹ"],
        ),
        entry(
            Category::Internship,
            &["thực tập", "tttn", "đồ án", "khóa luận", "khoá luận"],
        ),
        entry(
            Category::DistanceLearning,
            &["đào tạo từ xa", "e-learning", "trực tuyến", "qua mạng"],
        ),
        entry(
            Category::FinanceAndTuition,
            &["học phí", "tài chính", "miễn giảm", "quy định phí"],
        ),
        entry(
            Category::Examination,
            &["kỳ thi", "thi cử", "kiểm tra", "kết quả học tập"],
        ),
        entry(
            Category::HumanResources,
            &["cán bộ", "giảng viên", "cbvc", "nhân sự", "tuyển dụng"],
        ),
        entry(
            Category::StudentAffairs,
            &["công tác sinh viên", "học bổng", "khen thưởng", "kỷ luật", "rèn luyện"],
        ),
        entry(
            Category::AcademicAffairs,
            &["tín chỉ", "chương trình học", "kế hoạch giảng dạy", "chuẩn đầu ra", "giáo trình"],
        ),
        entry(
            Category::TrainingAndRegulations,
            &["quy chế", "quy định", "nội quy", "quy tắc"],
        ),
    ]
}

/// A boundary rule with its pattern compiled, sorted into priority
/// order inside [`CompiledConfig`].
#[derive(Debug)]
pub(crate) struct CompiledRule {
    pub kind: BoundaryKind,
    pub regex: Regex,
    pub priority: u8,
}

/// The validated, compiled form of [`PipelineConfig`].
#[derive(Debug)]
pub(crate) struct CompiledConfig {
    pub rules: Vec<CompiledRule>,
    pub footer: Regex,
    pub keywords: Vec<KeywordEntry>,
    pub heuristic_threshold: f32,
    pub fallback_category: Category,
    pub max_excerpt_chars: usize,
    pub classify_timeout_secs: u64,
    pub classify_retry_backoff_ms: u64,
}

impl PipelineConfig {
    pub(crate) fn compile(&self) -> Result<CompiledConfig, ConfigError> {
        if self.rules.is_empty() {
            return Err(ConfigError::EmptyRuleTable);
        }
        if !(0.0..=1.0).contains(&self.heuristic_threshold) {
            return Err(ConfigError::InvalidThreshold(self.heuristic_threshold));
        }
        if self.max_excerpt_chars == 0 {
            return Err(ConfigError::ZeroExcerpt);
        }
        for entry in &self.keywords {
            if entry.keywords.is_empty() {
                return Err(ConfigError::EmptyKeywordEntry(entry.category));
            }
        }

        let mut rules = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            let regex = Regex::new(&rule.pattern).map_err(|source| ConfigError::InvalidPattern {
                kind: rule.kind,
                pattern: rule.pattern.clone(),
                source,
            })?;
            rules.push(CompiledRule {
                kind: rule.kind,
                regex,
                priority: rule.priority,
            });
        }
        // Highest priority first; detection takes the first match.
        rules.sort_by(|a, b| b.priority.cmp(&a.priority));

        // Footer pattern is line-anchored against the whole body.
        let footer = Regex::new(&format!("(?m){}", self.footer_pattern)).map_err(|source| {
            ConfigError::InvalidFooterPattern {
                pattern: self.footer_pattern.clone(),
                source,
            }
        })?;

        Ok(CompiledConfig {
            rules,
            footer,
            keywords: self.keywords.clone(),
            heuristic_threshold: self.heuristic_threshold,
            fallback_category: self.fallback_category,
            max_excerpt_chars: self.max_excerpt_chars,
            classify_timeout_secs: self.classify_timeout_secs,
            classify_retry_backoff_ms: self.classify_retry_backoff_ms,
        })
    }
}

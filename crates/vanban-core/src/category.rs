//! The closed ten-value document taxonomy.
//!
//! Every document classifies into exactly one of these labels. Raw
//! classifier output that falls outside the set is coerced to the
//! designated fallback, never stored free-form.

use serde::{Deserialize, Serialize};

/// Fixed category taxonomy for university administrative documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    TrainingAndRegulations,
    AcademicAffairs,
    Admissions,
    FinanceAndTuition,
    Examination,
    PostgraduateTraining,
    Internship,
    StudentAffairs,
    HumanResources,
    DistanceLearning,
}

impl Category {
    /// All ten values, in taxonomy order.
    pub const ALL: [Category; 10] = [
        Category::TrainingAndRegulations,
        Category::AcademicAffairs,
        Category::Admissions,
        Category::FinanceAndTuition,
        Category::Examination,
        Category::PostgraduateTraining,
        Category::Internship,
        Category::StudentAffairs,
        Category::HumanResources,
        Category::DistanceLearning,
    ];

    /// Coercion target for unmapped classifier output.
    pub const FALLBACK: Category = Category::TrainingAndRegulations;

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TrainingAndRegulations => "training_and_regulations",
            Self::AcademicAffairs => "academic_affairs",
            Self::Admissions => "admissions",
            Self::FinanceAndTuition => "finance_and_tuition",
            Self::Examination => "examination",
            Self::PostgraduateTraining => "postgraduate_training",
            Self::Internship => "internship",
            Self::StudentAffairs => "student_affairs",
            Self::HumanResources => "human_resources",
            Self::DistanceLearning => "distance_learning",
        }
    }

    /// Parse a raw label, tolerating case and surrounding prose.
    ///
    /// Classifier responses sometimes wrap the label in extra text;
    /// the first taxonomy value found as a substring wins. Returns
    /// `None` when nothing in the closed set matches.
    pub fn from_label(raw: &str) -> Option<Category> {
        let lowered = raw.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| lowered.contains(c.as_str()))
    }

    /// Parse a raw label, coercing unmapped output to [`Self::FALLBACK`].
    pub fn from_label_or_fallback(raw: &str) -> Category {
        Category::from_label(raw).unwrap_or(Category::FALLBACK)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

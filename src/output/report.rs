//! Report structures wrapping a score breakdown with run metadata

use crate::processing::analyzer::ScoreBreakdown;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// A scored résumé plus where it came from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreReport {
    pub breakdown: ScoreBreakdown,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// When the report was generated
    pub generated_at: SystemTime,

    /// Version of the engine used
    pub engine_version: String,

    pub resume_file: String,
    pub job_file: String,

    /// Size of the corpus the similarity check ran against
    pub reference_documents: usize,

    pub required_education: Option<String>,
}

impl ScoreReport {
    pub fn new(
        breakdown: ScoreBreakdown,
        resume_file: impl Into<String>,
        job_file: impl Into<String>,
        reference_documents: usize,
    ) -> Self {
        Self {
            breakdown,
            metadata: ReportMetadata {
                generated_at: SystemTime::now(),
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                resume_file: resume_file.into(),
                job_file: job_file.into(),
                reference_documents,
                required_education: None,
            },
        }
    }

    pub fn with_required_education(mut self, required_education: &str) -> Self {
        let trimmed = required_education.trim();
        self.metadata.required_education = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    /// Lines worth showing first: triggered penalties, otherwise the feedback.
    pub fn highlights(&self) -> Vec<&str> {
        if self.breakdown.penalties.is_empty() {
            self.breakdown.feedback.iter().map(String::as_str).collect()
        } else {
            self.breakdown.penalties.iter().map(String::as_str).collect()
        }
    }
}

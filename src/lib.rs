//! cv-match library: scores résumés against job descriptions

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod intake;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{CvMatchError, Result};
pub use processing::analyzer::{calculate_ats_score, ScoreBreakdown, ScoringEngine, Verdict};
pub use processing::document::{JobRequirement, ParsedResume, RawDocument};
pub use processing::education::{validate_education, EducationValidation};
pub use processing::parser::parse_resume;
pub use processing::penalty::{PenaltyEvent, PenaltyReason};
pub use processing::projects::{validate_projects, ProjectVerification};
pub use processing::similarity::{check_plagiarism, SimilarityReport, SimilarityStatus};

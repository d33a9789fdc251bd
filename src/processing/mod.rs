//! Text processing and scoring module

pub mod analyzer;
pub mod ats_matcher;
pub mod document;
pub mod education;
pub mod parser;
pub mod penalty;
pub mod projects;
pub mod sections;
pub mod similarity;
pub mod text_processor;

/// Round to two decimal places
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

//! Degree/field alignment and grade plausibility checks

use crate::processing::ats_matcher::contains_term;
use crate::processing::penalty::{PenaltyEvent, PenaltyReason};
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Highest score the education category can reach
pub const EDUCATION_CAP: u32 = 30;

const EXACT_MATCH_POINTS: u32 = 15;
const UNSPECIFIED_REQUIREMENT_POINTS: u32 = 10;
const MISMATCH_POINTS: u32 = 5;

/// Scale assumed when a grade has no denominator
const DEFAULT_GRADE_SCALE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DegreeFamily {
    Bachelor,
    Master,
    Doctorate,
    Mba,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldOfStudy {
    ComputerScience,
    SoftwareEngineering,
    InformationTechnology,
    DataScience,
    Electronics,
    Mathematics,
    Business,
}

impl DegreeFamily {
    const ALL: [DegreeFamily; 4] = [
        DegreeFamily::Bachelor,
        DegreeFamily::Master,
        DegreeFamily::Doctorate,
        DegreeFamily::Mba,
    ];

    fn terms(&self) -> &'static [&'static str] {
        match self {
            DegreeFamily::Bachelor => &[
                "bachelor", "bachelors", "b.tech", "btech", "b.e.", "b.sc", "bsc", "b.s.", "b.a.",
                "undergraduate",
            ],
            DegreeFamily::Master => &[
                "master", "masters", "m.tech", "mtech", "m.sc", "msc", "m.s.", "m.e.", "postgraduate",
            ],
            DegreeFamily::Doctorate => &["phd", "ph.d", "doctorate", "doctoral"],
            DegreeFamily::Mba => &["mba", "m.b.a", "business administration"],
        }
    }
}

impl FieldOfStudy {
    const ALL: [FieldOfStudy; 7] = [
        FieldOfStudy::ComputerScience,
        FieldOfStudy::SoftwareEngineering,
        FieldOfStudy::InformationTechnology,
        FieldOfStudy::DataScience,
        FieldOfStudy::Electronics,
        FieldOfStudy::Mathematics,
        FieldOfStudy::Business,
    ];

    fn terms(&self) -> &'static [&'static str] {
        match self {
            FieldOfStudy::ComputerScience => &["computer science", "computer engineering", "cse", "computing"],
            FieldOfStudy::SoftwareEngineering => &["software engineering"],
            FieldOfStudy::InformationTechnology => &["information technology", "information systems"],
            FieldOfStudy::DataScience => &[
                "data science", "artificial intelligence", "machine learning", "statistics",
            ],
            FieldOfStudy::Electronics => &["electrical engineering", "electronics", "ece"],
            FieldOfStudy::Mathematics => &["mathematics", "applied mathematics"],
            FieldOfStudy::Business => &["business", "management", "finance"],
        }
    }
}

/// A "<value>[/<scale>]" grade claim.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeClaim {
    pub value: f64,
    pub scale: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationValidation {
    /// Degree plus field points minus grade penalties, in [0, 30]
    pub score: u32,
    pub degree_points: u32,
    pub field_points: u32,
    pub penalties: Vec<PenaltyEvent>,
}

impl EducationValidation {
    pub fn messages(&self) -> Vec<String> {
        self.penalties.iter().map(|p| p.message.clone()).collect()
    }
}

pub struct EducationValidator {
    grade_pattern: Regex,
}

impl EducationValidator {
    pub fn new() -> Self {
        let grade_pattern = Regex::new(
            r"(?i)\b(?:c?gpa|grade)s?\b\s*(?:[:=-]|of|is)?\s*(\d+(?:\.\d+)?)(?:\s*/\s*(\d+(?:\.\d+)?))?",
        )
        .expect("Invalid grade regex");

        Self { grade_pattern }
    }

    pub fn validate(&self, education_text: &str, required_education: &str) -> EducationValidation {
        let required = required_education.trim();

        let resume_degrees = find_families(education_text, &DegreeFamily::ALL, DegreeFamily::terms);
        let required_degrees = find_families(required, &DegreeFamily::ALL, DegreeFamily::terms);
        let degree_points = alignment_points(&resume_degrees, &required_degrees);

        let field_points = if required.is_empty() {
            0
        } else {
            let resume_fields = find_families(education_text, &FieldOfStudy::ALL, FieldOfStudy::terms);
            let required_fields = find_families(required, &FieldOfStudy::ALL, FieldOfStudy::terms);
            alignment_points(&resume_fields, &required_fields)
        };

        let penalties: Vec<PenaltyEvent> = self
            .extract_grades(education_text)
            .into_iter()
            .filter_map(grade_penalty)
            .collect();

        let deducted: f64 = penalties.iter().map(|p| p.points).sum();
        let raw = (degree_points + field_points).min(EDUCATION_CAP);
        let score = (raw as f64 - deducted).max(0.0).round() as u32;

        debug!(
            "Education: degree {} + field {} - penalties {} = {}",
            degree_points, field_points, deducted, score
        );

        EducationValidation {
            score,
            degree_points,
            field_points,
            penalties,
        }
    }

    /// Every grade mention following grade/GPA/CGPA, in text order
    pub fn extract_grades(&self, text: &str) -> Vec<GradeClaim> {
        self.grade_pattern
            .captures_iter(text)
            .filter_map(|cap| {
                let value = cap.get(1)?.as_str().parse::<f64>().ok()?;
                let scale = match cap.get(2) {
                    Some(scale) => scale.as_str().parse::<f64>().ok()?,
                    None => DEFAULT_GRADE_SCALE,
                };
                Some(GradeClaim { value, scale })
            })
            .collect()
    }
}

impl Default for EducationValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate education text with the default vocabulary.
pub fn validate_education(education_text: &str, required_education: &str) -> EducationValidation {
    EducationValidator::new().validate(education_text, required_education)
}

fn find_families<T: Ord + Copy>(text: &str, all: &[T], terms: fn(&T) -> &'static [&'static str]) -> BTreeSet<T> {
    all.iter()
        .copied()
        .filter(|family| terms(family).iter().any(|term| contains_term(text, term)))
        .collect()
}

fn alignment_points<T: Ord>(found: &BTreeSet<T>, required: &BTreeSet<T>) -> u32 {
    if found.is_empty() {
        0
    } else if required.is_empty() {
        UNSPECIFIED_REQUIREMENT_POINTS
    } else if !found.is_disjoint(required) {
        EXACT_MATCH_POINTS
    } else {
        MISMATCH_POINTS
    }
}

fn grade_penalty(grade: GradeClaim) -> Option<PenaltyEvent> {
    let GradeClaim { value, scale } = grade;
    if scale <= 0.0 {
        return None;
    }

    let shown = format!("{}/{}", value, scale);
    if value > scale {
        Some(PenaltyEvent::new(
            PenaltyReason::InvalidGrade,
            5.0,
            format!("Invalid CGPA: {} exceeds the grading scale", shown),
        ))
    } else if value == scale {
        Some(PenaltyEvent::new(
            PenaltyReason::PerfectGrade,
            2.0,
            format!("Perfect CGPA claimed: {}", shown),
        ))
    } else if value > 0.95 * scale {
        Some(PenaltyEvent::new(
            PenaltyReason::SuspiciousGrade,
            1.0,
            format!("Suspiciously high CGPA: {}", shown),
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_degree_and_field_match() {
        let result = validate_education(
            "EDUCATION\nBachelor of Technology in Computer Science, CGPA 8.1/10",
            "B.Tech in Computer Science or related field",
        );

        assert_eq!(result.degree_points, 15);
        assert_eq!(result.field_points, 15);
        assert_eq!(result.score, 30);
        assert!(result.penalties.is_empty());
    }

    #[test]
    fn test_unspecified_requirement() {
        let result = validate_education("MSc in Mathematics", "");
        assert_eq!(result.degree_points, 10);
        assert_eq!(result.field_points, 0);
        assert_eq!(result.score, 10);
    }

    #[test]
    fn test_mismatched_family() {
        let result = validate_education("Bachelor of Science in Statistics", "Master's degree in Computer Science");
        assert_eq!(result.degree_points, 5);
        assert_eq!(result.field_points, 5);
        assert_eq!(result.score, 10);
    }

    #[test]
    fn test_no_degrees_anywhere() {
        let result = validate_education("Self-taught", "Strong communication");
        assert_eq!(result.score, 0);
    }

    #[test]
    fn test_perfect_grade() {
        let result = validate_education("Bachelor in Computer Science, CGPA 10/10", "");
        assert_eq!(result.penalties.len(), 1);
        assert_eq!(result.penalties[0].reason, PenaltyReason::PerfectGrade);
        assert!(result.messages()[0].contains("Perfect CGPA claimed"));
        assert_eq!(result.score, 8);
    }

    #[test]
    fn test_invalid_grade() {
        let result = validate_education("Bachelor, Grade: 12/10", "");
        assert!(result.messages()[0].contains("Invalid CGPA"));
        assert_eq!(result.penalties[0].points, 5.0);
        assert_eq!(result.score, 5);
    }

    #[test]
    fn test_suspicious_grade_with_default_scale() {
        let validator = EducationValidator::new();
        assert_eq!(
            validator.extract_grades("CGPA of 9.7"),
            vec![GradeClaim { value: 9.7, scale: 10.0 }]
        );

        let result = validator.validate("Bachelor, CGPA of 9.7", "");
        assert_eq!(result.penalties[0].reason, PenaltyReason::SuspiciousGrade);
        assert_eq!(result.score, 9);
    }

    #[test]
    fn test_penalties_accumulate_and_floor_at_zero() {
        let result = validate_education("GPA 5/4, CGPA 11/10, grade 10/10", "");
        assert_eq!(result.penalties.len(), 3);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn test_plausible_grade_is_not_penalized() {
        let result = validate_education("Bachelor, GPA 3.4/4.0", "");
        assert!(result.penalties.is_empty());
    }
}

//! Penalty ledger entries

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyReason {
    InvalidGrade,
    PerfectGrade,
    SuspiciousGrade,
    UnverifiedProjects,
    Plagiarism,
    UnrealisticExperience,
    KeywordStuffing,
}

/// Where a deduction is charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyScope {
    /// Already folded into the education category score
    Education,
    /// Subtracted from the category total
    Global,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltyEvent {
    pub reason: PenaltyReason,
    pub points: f64,
    pub message: String,
}

impl PenaltyReason {
    pub fn tag(&self) -> &'static str {
        match self {
            PenaltyReason::InvalidGrade => "invalid_cgpa",
            PenaltyReason::PerfectGrade => "perfect_cgpa",
            PenaltyReason::SuspiciousGrade => "suspicious_cgpa",
            PenaltyReason::UnverifiedProjects => "unverified_projects",
            PenaltyReason::Plagiarism => "plagiarism",
            PenaltyReason::UnrealisticExperience => "unrealistic_experience",
            PenaltyReason::KeywordStuffing => "keyword_stuffing",
        }
    }

    pub fn scope(&self) -> PenaltyScope {
        match self {
            PenaltyReason::InvalidGrade | PenaltyReason::PerfectGrade | PenaltyReason::SuspiciousGrade => {
                PenaltyScope::Education
            }
            _ => PenaltyScope::Global,
        }
    }
}

impl PenaltyEvent {
    /// The message always ends with the deduction, e.g. "... (-5)".
    pub fn new(reason: PenaltyReason, points: f64, description: impl fmt::Display) -> Self {
        Self {
            reason,
            points,
            message: format!("{} (-{})", description, format_points(points)),
        }
    }

    pub fn scope(&self) -> PenaltyScope {
        self.reason.scope()
    }
}

impl fmt::Display for PenaltyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Whole numbers print without a fractional part.
fn format_points(points: f64) -> String {
    if points.fract() == 0.0 {
        format!("{}", points as i64)
    } else {
        format!("{:.2}", points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_carries_deduction() {
        let event = PenaltyEvent::new(PenaltyReason::KeywordStuffing, 5.0, "Keyword stuffing detected");
        assert_eq!(event.message, "Keyword stuffing detected (-5)");
        assert_eq!(event.to_string(), event.message);

        let event = PenaltyEvent::new(PenaltyReason::Plagiarism, 2.5, "Similar");
        assert_eq!(event.message, "Similar (-2.50)");
    }

    #[test]
    fn test_scopes() {
        assert_eq!(PenaltyReason::PerfectGrade.scope(), PenaltyScope::Education);
        assert_eq!(PenaltyReason::Plagiarism.scope(), PenaltyScope::Global);
        assert_eq!(PenaltyReason::UnverifiedProjects.tag(), "unverified_projects");
    }
}

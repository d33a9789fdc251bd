//! Cross-checks claimed skills against the projects section

use crate::processing::ats_matcher::contains_term;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectVerification {
    /// Fraction of claimed skills that the projects text actually uses, in [0, 1]
    pub verification_rate: f64,
    pub verified_skills: Vec<String>,
}

impl ProjectVerification {
    pub fn unverified() -> Self {
        Self {
            verification_rate: 0.0,
            verified_skills: Vec::new(),
        }
    }
}

pub fn validate_projects(projects_text: &str, skills: &[String]) -> ProjectVerification {
    if projects_text.trim().is_empty() || skills.is_empty() {
        return ProjectVerification::unverified();
    }

    let verified_skills: Vec<String> = skills
        .iter()
        .filter(|skill| contains_term(projects_text, skill))
        .cloned()
        .collect();

    ProjectVerification {
        verification_rate: verified_skills.len() as f64 / skills.len() as f64,
        verified_skills,
    }
}

//! Document structures shared by the scoring pipeline

use serde::{Deserialize, Serialize};

/// Plain text extracted from a résumé or job description file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    pub text: String,
    pub byte_len: usize,
    pub source: String,
}

/// Structured facts extracted from résumé text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedResume {
    /// Vocabulary order and casing, de-duplicated case-insensitively
    pub skills: Vec<String>,
    pub experience_years: u32,
    pub projects_text: String,
    pub education_text: String,
}

/// The target role a résumé is scored against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRequirement {
    pub description: String,
    pub required_education: Option<String>,
    /// Never below 1, so it is always safe to divide by
    pub required_experience_years: u32,
}

impl RawDocument {
    pub fn new(text: String, source: impl Into<String>) -> Self {
        let byte_len = text.len();
        Self {
            text,
            byte_len,
            source: source.into(),
        }
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

impl ParsedResume {
    pub fn has_projects(&self) -> bool {
        !self.projects_text.is_empty()
    }
}

impl JobRequirement {
    pub fn required_education_text(&self) -> &str {
        self.required_education.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_document_creation() {
        let doc = RawDocument::new("Jane Doe\nRésumé".to_string(), "resume.txt");

        assert_eq!(doc.byte_len, doc.text.len());
        assert_eq!(doc.char_count(), 15);
        assert_eq!(doc.word_count(), 3);
        assert_eq!(doc.source, "resume.txt");
    }

    #[test]
    fn test_required_education_defaults_to_empty() {
        let job = JobRequirement {
            description: "Backend role".to_string(),
            required_education: None,
            required_experience_years: 2,
        };
        assert_eq!(job.required_education_text(), "");
    }
}

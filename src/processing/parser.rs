//! Fact extraction: skills, years of experience and résumé sections

use crate::config::Config;
use crate::error::{CvMatchError, Result};
use crate::processing::ats_matcher::SkillMatcher;
use crate::processing::document::{JobRequirement, ParsedResume};
use crate::processing::sections::{
    HeadingSectionExtractor, SectionExtractor, EDUCATION_HEADINGS, PROJECT_HEADINGS,
};
use log::debug;
use regex::Regex;
use std::sync::Arc;

/// Shortest text that plausibly is a résumé
pub const MIN_RESUME_CHARS: usize = 100;

pub struct ResumeParser {
    skill_matcher: Arc<SkillMatcher>,
    section_extractor: Box<dyn SectionExtractor>,
    experience_patterns: Vec<Regex>,
    required_experience_pattern: Regex,
    experience_ceiling: u32,
    min_chars: usize,
}

impl ResumeParser {
    pub fn new(skill_matcher: Arc<SkillMatcher>) -> Self {
        let experience_patterns = vec![
            // "5 years experience", "5+ years of professional experience"
            Regex::new(r"(?i)(\d{1,3})\+?\s*(?:years?|yrs?)\b(?:\s+of)?(?:\s+[a-z-]+)?\s+experience")
                .expect("Invalid experience regex"),
            // "experience of 7 years", "Experience: 4 yrs"
            Regex::new(r"(?i)experience\s*(?:of|:|-)?\s*(?:about\s+|over\s+|more than\s+)?(\d{1,3})\+?\s*(?:years?|yrs?)\b")
                .expect("Invalid experience regex"),
            // "worked for 3 years"
            Regex::new(r"(?i)worked\s+(?:for\s+)?(?:about\s+|over\s+)?(\d{1,3})\+?\s*(?:years?|yrs?)\b")
                .expect("Invalid experience regex"),
        ];

        let required_experience_pattern = Regex::new(r"(?i)(\d{1,3})\+?\s*(?:years?|yrs?)\b")
            .expect("Invalid required experience regex");

        Self {
            skill_matcher,
            section_extractor: Box::new(HeadingSectionExtractor::new()),
            experience_patterns,
            required_experience_pattern,
            experience_ceiling: 50,
            min_chars: MIN_RESUME_CHARS,
        }
    }

    /// Build a parser from configuration, sharing an existing vocabulary
    pub fn from_config(config: &Config, skill_matcher: Arc<SkillMatcher>) -> Self {
        let mut parser = Self::new(skill_matcher);
        parser.experience_ceiling = config.scoring.experience_ceiling;
        parser.min_chars = config.scoring.min_resume_chars;
        parser
    }

    /// Swap the section heuristic for another implementation
    pub fn with_section_extractor(mut self, extractor: Box<dyn SectionExtractor>) -> Self {
        self.section_extractor = extractor;
        self
    }

    pub fn skill_matcher(&self) -> &SkillMatcher {
        &self.skill_matcher
    }

    pub fn parse_resume(&self, text: &str) -> Result<ParsedResume> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(CvMatchError::Parse("résumé text is empty".to_string()));
        }

        let char_count = trimmed.chars().count();
        if char_count < self.min_chars {
            return Err(CvMatchError::Parse(format!(
                "résumé text has {} characters, at least {} required",
                char_count, self.min_chars
            )));
        }

        let skills = self.skill_matcher.extract_skills(text);
        let experience_years = self.extract_experience_years(text);
        let projects_text = self.section_extractor.extract_section(text, PROJECT_HEADINGS);
        let education_text = self.section_extractor.extract_section(text, EDUCATION_HEADINGS);

        debug!(
            "Parsed résumé: {} skills, {} years, projects {} chars, education {} chars",
            skills.len(),
            experience_years,
            projects_text.len(),
            education_text.len()
        );

        Ok(ParsedResume {
            skills,
            experience_years,
            projects_text,
            education_text,
        })
    }

    /// Largest plausible "N years" figure across all experience phrasings, 0 if none.
    pub fn extract_experience_years(&self, text: &str) -> u32 {
        self.experience_patterns
            .iter()
            .flat_map(|pattern| pattern.captures_iter(text))
            .filter_map(|cap| cap.get(1)?.as_str().parse::<u32>().ok())
            .filter(|years| *years <= self.experience_ceiling)
            .max()
            .unwrap_or(0)
    }

    /// First "N years" in the description, `default` when absent, never below 1.
    pub fn required_experience_years(&self, job_description: &str, default: u32) -> u32 {
        self.required_experience_pattern
            .captures(job_description)
            .and_then(|cap| cap.get(1)?.as_str().parse::<u32>().ok())
            .unwrap_or(default)
            .max(1)
    }

    pub fn parse_job(
        &self,
        description: &str,
        required_education: Option<&str>,
        default_required_experience: u32,
    ) -> JobRequirement {
        JobRequirement {
            description: description.to_string(),
            required_education: required_education
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(str::to_string),
            required_experience_years: self
                .required_experience_years(description, default_required_experience),
        }
    }
}

impl Default for ResumeParser {
    fn default() -> Self {
        Self::new(Arc::new(SkillMatcher::default()))
    }
}

/// Parse résumé text with the built-in vocabulary and defaults.
pub fn parse_resume(text: &str) -> Result<ParsedResume> {
    ResumeParser::default().parse_resume(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "JOHN DOE\nBackend developer with 5 years experience building Python and Docker services.\n\nPROJECTS\nBuilt a scheduling API in Python.\n\nEDUCATION\nBachelor of Technology in Computer Science";

    #[test]
    fn test_parse_resume() {
        let parsed = parse_resume(RESUME).unwrap();

        assert_eq!(parsed.skills, vec!["Python".to_string(), "Docker".to_string()]);
        assert_eq!(parsed.experience_years, 5);
        assert!(parsed.projects_text.contains("scheduling API"));
        assert!(parsed.education_text.starts_with("EDUCATION"));
    }

    #[test]
    fn test_rejects_short_text() {
        assert!(matches!(parse_resume(""), Err(CvMatchError::Parse(_))));
        assert!(matches!(parse_resume("   \n  "), Err(CvMatchError::Parse(_))));
        assert!(matches!(parse_resume("Python developer, 3 years experience"), Err(CvMatchError::Parse(_))));
    }

    #[test]
    fn test_experience_takes_maximum_across_patterns() {
        let parser = ResumeParser::default();

        assert_eq!(parser.extract_experience_years("5 years experience"), 5);
        assert_eq!(parser.extract_experience_years("7+ years of professional experience"), 7);
        assert_eq!(parser.extract_experience_years("Experience of 4 years in QA"), 4);
        assert_eq!(parser.extract_experience_years("worked for 9 years at Acme"), 9);
        assert_eq!(
            parser.extract_experience_years("2 years experience in Java, worked for 6 years overall"),
            6
        );
        assert_eq!(parser.extract_experience_years("no numbers here"), 0);
    }

    #[test]
    fn test_experience_ignores_absurd_values() {
        let parser = ResumeParser::default();
        assert_eq!(
            parser.extract_experience_years("120 years experience, honestly 8 years of experience"),
            8
        );
    }

    #[test]
    fn test_required_experience() {
        let parser = ResumeParser::default();

        assert_eq!(parser.required_experience_years("We need 3 years experience with Python", 2), 3);
        assert_eq!(parser.required_experience_years("5+ yrs preferred, 2 years minimum", 2), 5);
        assert_eq!(parser.required_experience_years("No requirement stated", 2), 2);
        assert_eq!(parser.required_experience_years("0 years needed", 2), 1);
    }

    #[test]
    fn test_parse_job_drops_blank_education() {
        let parser = ResumeParser::default();
        let job = parser.parse_job("Looking for 4 years of Rust", Some("   "), 2);

        assert_eq!(job.required_experience_years, 4);
        assert!(job.required_education.is_none());
    }

    struct FixedSections;

    impl SectionExtractor for FixedSections {
        fn extract_section(&self, _text: &str, heading_keywords: &[&str]) -> String {
            heading_keywords[0].to_string()
        }
    }

    #[test]
    fn test_section_extractor_is_pluggable() {
        let parser = ResumeParser::default().with_section_extractor(Box::new(FixedSections));
        let parsed = parser.parse_resume(RESUME).unwrap();

        assert_eq!(parsed.projects_text, "project");
        assert_eq!(parsed.education_text, "education");
    }
}

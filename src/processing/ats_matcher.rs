//! Skill vocabulary and whole-word keyword matching

use crate::error::{CvMatchError, Result};
use aho_corasick::{AhoCorasick, MatchKind};
use std::collections::HashSet;

/// Controlled skill vocabulary backed by a case-insensitive Aho-Corasick automaton.
///
/// Vocabulary order is significant: extracted skills come back in vocabulary
/// order with vocabulary casing, regardless of where they appear in the text.
pub struct SkillMatcher {
    matcher: AhoCorasick,
    skills: Vec<String>,
}

impl SkillMatcher {
    /// Create a matcher over the built-in vocabulary
    pub fn new() -> Result<Self> {
        Self::with_custom_skills(Vec::new())
    }

    /// Create a matcher with extra skills appended after the built-in ones
    pub fn with_custom_skills(additional_skills: Vec<String>) -> Result<Self> {
        let mut skills: Vec<String> = Self::default_skill_database()
            .iter()
            .map(|s| s.to_string())
            .collect();
        skills.extend(additional_skills.into_iter().map(|s| s.trim().to_string()));

        // First occurrence of a lowercase form wins
        let mut seen = HashSet::new();
        skills.retain(|s| !s.is_empty() && seen.insert(s.to_lowercase()));

        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::Standard)
            .build(&skills)
            .map_err(|e| CvMatchError::Processing(format!("Failed to build skill matcher: {}", e)))?;

        Ok(Self { matcher, skills })
    }

    /// Skills present as whole words, in vocabulary order, de-duplicated.
    pub fn extract_skills(&self, text: &str) -> Vec<String> {
        let mut found = vec![false; self.skills.len()];

        // Overlapping search so "Java" does not hide "JavaScript" and vice versa
        for mat in self.matcher.find_overlapping_iter(text) {
            if is_word_boundary(text, mat.start(), mat.end()) {
                found[mat.pattern().as_usize()] = true;
            }
        }

        self.skills
            .iter()
            .zip(found)
            .filter_map(|(skill, hit)| hit.then(|| skill.clone()))
            .collect()
    }

    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }

    /// Default skill vocabulary
    fn default_skill_database() -> &'static [&'static str] {
        &[
            // Programming Languages
            "Python", "Java", "JavaScript", "TypeScript", "C++", "C#", "Rust", "Ruby",
            "PHP", "Kotlin", "Scala", "SQL", "HTML", "CSS",

            // Frameworks
            "React", "Angular", "Vue", "Node.js", "Next.js", "Django", "Flask",
            "FastAPI", "Spring Boot",

            // Databases
            "PostgreSQL", "MySQL", "MongoDB", "Redis", "SQLite", "Elasticsearch", "Cassandra",

            // Cloud/DevOps
            "AWS", "Azure", "GCP", "Docker", "Kubernetes", "Terraform", "Jenkins",
            "CI/CD", "Linux", "Ansible", "Microservices",

            // Data Science/ML
            "Machine Learning", "Deep Learning", "Data Science", "TensorFlow", "PyTorch",
            "Pandas", "NumPy", "Scikit-learn", "NLP",

            // Tooling and process
            "Git", "GraphQL", "Kafka", "Spark", "Jira", "Agile", "Scrum",
        ]
    }
}

impl Default for SkillMatcher {
    fn default() -> Self {
        Self::new().expect("built-in skill vocabulary must compile")
    }
}

/// Case-insensitive whole-word search for an arbitrary term.
pub fn contains_term(haystack: &str, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return false;
    }

    // ASCII lowering keeps byte offsets aligned with the original text
    let haystack_lower = haystack.to_ascii_lowercase();
    let term_lower = term.to_ascii_lowercase();

    haystack_lower
        .match_indices(&term_lower)
        .any(|(start, matched)| is_word_boundary(haystack, start, start + matched.len()))
}

/// Case-insensitive literal occurrence count, no word-boundary check.
pub fn count_occurrences(haystack: &str, term: &str) -> usize {
    let term = term.trim();
    if term.is_empty() {
        return 0;
    }

    haystack
        .to_lowercase()
        .matches(&term.to_lowercase())
        .count()
}

/// A match is a whole word when neither neighbour is alphanumeric.
fn is_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();

    !before.map_or(false, char::is_alphanumeric) && !after.map_or(false, char::is_alphanumeric)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_matcher_creation() {
        let matcher = SkillMatcher::new().unwrap();
        assert!(matcher.skill_count() >= 50);
    }

    #[test]
    fn test_extraction_keeps_vocabulary_order_and_casing() {
        let matcher = SkillMatcher::new().unwrap();
        let text = "Built services with docker, then moved the DOCKER images off python 2.";

        let skills = matcher.extract_skills(text);
        assert_eq!(skills, vec!["Python".to_string(), "Docker".to_string()]);
    }

    #[test]
    fn test_whole_word_matching() {
        let matcher = SkillMatcher::new().unwrap();

        let skills = matcher.extract_skills("Expert in JavaScript and Reactive design");
        assert!(skills.contains(&"JavaScript".to_string()));
        assert!(!skills.contains(&"Java".to_string()));
        assert!(!skills.contains(&"React".to_string()));

        let skills = matcher.extract_skills("Java, Node.js, C++ and CI/CD pipelines");
        assert_eq!(
            skills,
            vec!["Java".to_string(), "C++".to_string(), "Node.js".to_string(), "CI/CD".to_string()]
        );
    }

    #[test]
    fn test_custom_skills_are_deduplicated() {
        let matcher = SkillMatcher::with_custom_skills(vec![
            "python".to_string(),
            "Haskell".to_string(),
            "  ".to_string(),
        ])
        .unwrap();

        assert_eq!(matcher.skill_count(), SkillMatcher::new().unwrap().skill_count() + 1);
        assert_eq!(matcher.extract_skills("haskell and PYTHON"), vec!["Python", "Haskell"]);
    }

    #[test]
    fn test_contains_term() {
        assert!(contains_term("I used Python daily", "Python"));
        assert!(contains_term("(python)", "PYTHON"));
        assert!(!contains_term("I used Pythonic idioms", "Python"));
        assert!(!contains_term("anything", ""));
    }

    #[test]
    fn test_count_occurrences_is_literal() {
        assert_eq!(count_occurrences("Python python PYTHONIC", "python"), 3);
        assert_eq!(count_occurrences("nothing here", "Rust"), 0);
    }
}

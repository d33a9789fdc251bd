//! Section extraction from unstructured résumé text

/// Splits a labeled free-text block out of a document.
///
/// The scoring pipeline only depends on this trait, so a structured parser
/// can replace the heading heuristic without touching any scoring code.
pub trait SectionExtractor: Send + Sync {
    fn extract_section(&self, text: &str, heading_keywords: &[&str]) -> String;
}

/// Heading keywords for the projects block
pub const PROJECT_HEADINGS: &[&str] = &["project", "portfolio"];

/// Heading keywords for the education block
pub const EDUCATION_HEADINGS: &[&str] = &["education", "academic", "qualification"];

/// Line-based heading heuristic.
///
/// Capture starts at the first line containing a heading keyword and stops
/// at the next line that is entirely upper-case and shorter than
/// `max_heading_chars`. Title-case headings ("Education") therefore do not end
/// a section, and an all-caps line of body text does; both are known
/// limitations of the heuristic.
#[derive(Debug, Clone)]
pub struct HeadingSectionExtractor {
    max_heading_chars: usize,
}

impl HeadingSectionExtractor {
    pub fn new() -> Self {
        Self {
            max_heading_chars: 50,
        }
    }

    fn looks_like_heading(&self, line: &str) -> bool {
        let trimmed = line.trim();
        trimmed.chars().count() < self.max_heading_chars
            && trimmed.chars().any(char::is_alphabetic)
            && !trimmed.chars().any(char::is_lowercase)
    }
}

impl Default for HeadingSectionExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionExtractor for HeadingSectionExtractor {
    fn extract_section(&self, text: &str, heading_keywords: &[&str]) -> String {
        let keywords: Vec<String> = heading_keywords.iter().map(|k| k.to_lowercase()).collect();
        let mut captured: Vec<&str> = Vec::new();
        let mut capturing = false;

        for line in text.lines() {
            let line_lower = line.to_lowercase();

            if keywords.iter().any(|k| line_lower.contains(k.as_str())) {
                capturing = true;
            } else if capturing && self.looks_like_heading(line) {
                break;
            }

            if capturing {
                captured.push(line);
            }
        }

        captured.join("\n").trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "JANE DOE\nSoftware Engineer\n\nPROJECTS\nInventory tracker in Python\nChat bot using Docker\n\nEDUCATION\nB.Tech in Computer Science, CGPA 8.5/10\n\nCERTIFICATIONS\nAWS Associate";

    #[test]
    fn test_extracts_until_next_heading() {
        let extractor = HeadingSectionExtractor::new();

        let projects = extractor.extract_section(RESUME, PROJECT_HEADINGS);
        assert_eq!(projects, "PROJECTS\nInventory tracker in Python\nChat bot using Docker");

        let education = extractor.extract_section(RESUME, EDUCATION_HEADINGS);
        assert_eq!(education, "EDUCATION\nB.Tech in Computer Science, CGPA 8.5/10");
    }

    #[test]
    fn test_missing_heading_yields_empty() {
        let extractor = HeadingSectionExtractor::new();
        assert_eq!(extractor.extract_section("Just a summary line\nAnother line", PROJECT_HEADINGS), "");
    }

    #[test]
    fn test_single_line_document() {
        let extractor = HeadingSectionExtractor::new();
        let text = "Projects: built a compiler in Rust and a web scraper";

        assert_eq!(extractor.extract_section(text, PROJECT_HEADINGS), text);
        assert_eq!(extractor.extract_section(text, EDUCATION_HEADINGS), "");
    }

    #[test]
    fn test_title_case_heading_does_not_stop_capture() {
        let extractor = HeadingSectionExtractor::new();
        let text = "Projects\nA tool\nEducation\nBSc Physics";

        // Over-capture: only all-caps lines count as new headings
        assert_eq!(extractor.extract_section(text, PROJECT_HEADINGS), text);
    }
}

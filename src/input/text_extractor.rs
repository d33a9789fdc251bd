//! Text extraction from various file formats

use crate::error::{CvMatchError, Result};
use pulldown_cmark::{html, Parser};
use regex::Regex;
use std::path::Path;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;

        pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
            CvMatchError::PdfExtraction(format!(
                "Failed to extract text from PDF '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        Ok(fs::read_to_string(path).await?)
    }
}

/// Renders Markdown and strips the markup, one block per line.
pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await?;
        self.markdown_to_text(&markdown_content)
    }
}

impl MarkdownExtractor {
    pub fn markdown_to_text(&self, markdown: &str) -> Result<String> {
        let mut html_output = String::new();
        html::push_html(&mut html_output, Parser::new(markdown));
        self.html_to_text(&html_output)
    }

    fn html_to_text(&self, html: &str) -> Result<String> {
        let text = html
            .replace("<br>", "\n")
            .replace("</p>", "\n\n")
            .replace("&nbsp;", " ")
            .replace("&amp;", "&")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'");

        let tags = Regex::new(r"<[^>]*>")
            .map_err(|e| CvMatchError::Processing(format!("Invalid tag pattern: {}", e)))?;
        let clean_text = tags.replace_all(&text, "");

        let lines: Vec<&str> = clean_text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_headings_become_plain_lines() {
        let text = MarkdownExtractor
            .markdown_to_text("# Jane Doe\n\n## PROJECTS\n\n- **Inventory** tracker in *Python*\n")
            .unwrap();

        assert_eq!(text, "Jane Doe\nPROJECTS\nInventory tracker in Python");
    }
}

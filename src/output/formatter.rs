//! Output formatters for console, JSON and Markdown reports

use crate::config::OutputFormat;
use crate::error::{CvMatchError, Result};
use crate::output::report::ScoreReport;
use crate::processing::analyzer::Verdict;
use crate::processing::similarity::SimilarityStatus;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for formatting score reports
pub trait OutputFormatter {
    fn format_report(&self, report: &ScoreReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with optional colors and a detailed mode
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for API integration and structured data
pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let (prefix, color) = match level {
            1 => ("█", Color::Blue),
            2 => ("▓", Color::Green),
            _ => ("▒", Color::Yellow),
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_verdict_badge(&self, verdict: Verdict) -> String {
        let color = match verdict {
            Verdict::ExcellentMatch => Color::Green,
            Verdict::GoodMatch => Color::Yellow,
            Verdict::NeedsImprovement => Color::Red,
        };

        if self.use_colors {
            format!("[{}]", verdict.label().to_uppercase().color(color).bold())
        } else {
            format!("[{}]", verdict.label().to_uppercase())
        }
    }

    fn format_category(&self, name: &str, score: f64, cap: f64) -> String {
        let color = if cap > 0.0 && score / cap >= 0.7 {
            Color::Green
        } else if score > 0.0 {
            Color::Yellow
        } else {
            Color::Red
        };
        format!(
            "  {:<11} {} / {}\n",
            name,
            self.colorize(&format!("{:>6.2}", score), color),
            cap
        )
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &ScoreReport) -> Result<String> {
        let breakdown = &report.breakdown;
        let mut output = String::new();

        output.push_str(&self.format_header("RÉSUMÉ MATCH SCORE", 1));
        output.push_str(&format!(
            "Generated: {}\n",
            chrono::DateTime::<chrono::Utc>::from(report.metadata.generated_at)
                .format("%Y-%m-%d %H:%M:%S UTC")
        ));

        output.push_str(&format!(
            "\nFinal Score: {:.2} {}\n",
            breakdown.final_score,
            self.format_verdict_badge(breakdown.verdict)
        ));
        output.push_str(&format!(
            "Verdict: {}\n",
            self.colorize(breakdown.verdict.label(), Color::Cyan)
        ));
        if let Some(first) = report.highlights().first() {
            output.push_str(&format!("Key note: {}\n", first));
        }

        output.push_str(&self.format_header("Score Breakdown", 2));
        let weights = &breakdown.weights;
        output.push_str(&self.format_category("Skills", breakdown.skills_score, weights.skills));
        output.push_str(&self.format_category("Experience", breakdown.experience_score, weights.experience));
        output.push_str(&self.format_category("Projects", breakdown.projects_score, weights.projects));
        output.push_str(&self.format_category("Education", breakdown.education_score, weights.education));
        if breakdown.global_deductions() > 0.0 {
            output.push_str(&format!(
                "  {:<11} {}\n",
                "Penalties",
                self.colorize(&format!("{:>6.2}", -breakdown.global_deductions()), Color::Red)
            ));
        }

        output.push_str(&self.format_header("Feedback", 2));
        for line in &breakdown.feedback {
            output.push_str(&format!("  • {}\n", line));
        }

        if !breakdown.penalties.is_empty() {
            output.push_str(&self.format_header("Penalties", 2));
            for line in &breakdown.penalties {
                output.push_str(&format!("  • {}\n", self.colorize(line, Color::Red)));
            }
        }

        output.push_str(&self.format_header("Similarity Check", 2));
        match &breakdown.similarity_status {
            SimilarityStatus::Computed { .. } => output.push_str(&format!(
                "  {:.2}% ({})\n",
                breakdown.similarity_score, breakdown.similarity_status
            )),
            status => output.push_str(&format!(
                "  {}\n",
                self.colorize(&status.to_string(), Color::BrightBlack)
            )),
        }

        if self.detailed {
            output.push_str(&self.format_header("Details", 3));
            output.push_str(&format!("Skills found: {}\n", join_or_none(&breakdown.skills)));
            output.push_str(&format!("Matched skills: {}\n", join_or_none(&breakdown.matched_skills)));
            output.push_str(&format!(
                "Not in job description: {}\n",
                join_or_none(&breakdown.missing_skills())
            ));
            output.push_str(&format!(
                "Verified in projects: {}\n",
                join_or_none(&breakdown.verified_skills)
            ));
            output.push_str(&format!(
                "Experience: {} years (required {})\n",
                breakdown.experience_years, breakdown.required_experience_years
            ));
            output.push_str(&format!("Résumé: {}\n", report.metadata.resume_file));
            output.push_str(&format!("Job description: {}\n", report.metadata.job_file));
        }

        output.push_str(&format!(
            "\n{} Generated by cv-match v{} | {} reference documents\n",
            self.colorize("ℹ", Color::Blue),
            report.metadata.engine_version,
            report.metadata.reference_documents
        ));

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &ScoreReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &ScoreReport) -> Result<String> {
        let breakdown = &report.breakdown;
        let mut output = String::new();

        output.push_str("# Résumé Match Report\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {}\n",
                chrono::DateTime::<chrono::Utc>::from(report.metadata.generated_at)
                    .format("%Y-%m-%d %H:%M:%S UTC")
            ));
            output.push_str(&format!(
                "**Résumé:** `{}` | **Job:** `{}`\n\n",
                file_name(&report.metadata.resume_file),
                file_name(&report.metadata.job_file)
            ));
        }

        output.push_str("## Summary\n\n");
        output.push_str(&format!(
            "**Final Score:** {:.2} / 100 {}\n\n",
            breakdown.final_score,
            Self::markdown_badge(breakdown.verdict)
        ));
        output.push_str(&format!("**Verdict:** {}\n\n", breakdown.verdict));

        output.push_str("### Score Breakdown\n\n");
        output.push_str("| Category | Score | Max |\n");
        output.push_str("|----------|-------|-----|\n");
        let weights = &breakdown.weights;
        for (name, score, cap) in [
            ("Skills", breakdown.skills_score, weights.skills),
            ("Experience", breakdown.experience_score, weights.experience),
            ("Projects", breakdown.projects_score, weights.projects),
            ("Education", breakdown.education_score, weights.education),
        ] {
            output.push_str(&format!("| {} | {:.2} | {} |\n", name, score, cap));
        }
        output.push_str(&format!(
            "| Penalties | -{:.2} | |\n\n",
            breakdown.global_deductions()
        ));

        output.push_str("## Feedback\n\n");
        for line in &breakdown.feedback {
            output.push_str(&format!("- {}\n", line));
        }
        output.push('\n');

        if !breakdown.penalties.is_empty() {
            output.push_str("## Penalties\n\n");
            for line in &breakdown.penalties {
                output.push_str(&format!("- {}\n", line));
            }
            output.push('\n');
        }

        output.push_str("## Skills\n\n");
        output.push_str(&format!("**Found:** {}\n\n", code_list(&breakdown.skills)));
        output.push_str(&format!("**Matched:** {}\n\n", code_list(&breakdown.matched_skills)));
        output.push_str(&format!(
            "**Verified in projects:** {}\n\n",
            code_list(&breakdown.verified_skills)
        ));

        output.push_str("## Similarity Check\n\n");
        output.push_str(&format!(
            "{:.2}% ({})\n\n",
            breakdown.similarity_score, breakdown.similarity_status
        ));

        if self.include_metadata {
            output.push_str("---\n\n");
            output.push_str(&format!(
                "*Generated by cv-match v{}*\n",
                report.metadata.engine_version
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl MarkdownFormatter {
    fn markdown_badge(verdict: Verdict) -> &'static str {
        match verdict {
            Verdict::ExcellentMatch => "🟢",
            Verdict::GoodMatch => "🟡",
            Verdict::NeedsImprovement => "🔴",
        }
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true, true)
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn generate_report(&self, report: &ScoreReport, format: OutputFormat) -> Result<String> {
        let formatter: &dyn OutputFormatter = match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
        };
        debug_assert_eq!(formatter.supports_format(), format);
        formatter.format_report(report)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content).map_err(|e| {
        CvMatchError::OutputFormatting(format!(
            "Failed to write report to {}: {}",
            file_path.display(),
            e
        ))
    })
}

pub fn suggest_filename(format: OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
    };

    format!("{}_score{}.{}", base_name, timestamp_suffix, extension)
}

fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

fn join_or_none<S: AsRef<str>>(items: &[S]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(", ")
    }
}

fn code_list(items: &[String]) -> String {
    if items.is_empty() {
        "_none_".to_string()
    } else {
        format!("`{}`", items.join("`, `"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::processing::analyzer::{calculate_ats_score, ScoringEngine};

    const RESUME: &str = "JANE SMITH\nBackend developer with 5 years experience shipping Python services packaged with Docker.\n\nPROJECTS\nInventory tracker written in Python.\n";
    const JOB: &str = "We need 3 years experience with Python for our platform team in Berlin.";

    fn sample_report() -> ScoreReport {
        let breakdown = calculate_ats_score(RESUME, JOB, "", &[]).unwrap();
        ScoreReport::new(breakdown, "cv/jane.txt", "jobs/backend.txt", 0)
    }

    fn reweighted_report() -> ScoreReport {
        let mut config = Config::default();
        config.scoring.weights.skills = 30.0;
        config.scoring.weights.projects = 20.0;
        let engine = ScoringEngine::new(&config, Vec::new()).unwrap();
        let breakdown = engine.calculate_ats_score(RESUME, JOB, "").unwrap();
        ScoreReport::new(breakdown, "cv/jane.txt", "jobs/backend.txt", 0)
    }

    #[test]
    fn test_console_without_colors() {
        let output = ConsoleFormatter::new(false, true)
            .format_report(&sample_report())
            .unwrap();

        assert!(output.contains("Final Score: 45.00 [NEEDS IMPROVEMENT]"));
        assert!(output.contains("no reference data"));
        assert!(output.contains("Matched skills: Python"));
        assert!(output.contains("Not in job description: Docker"));
        assert!(output.contains("Key note: Matched 1 of 2 skills: Python"));
        assert!(output.contains("20.00 / 40"));
    }

    #[test]
    fn test_caps_follow_configured_weights() {
        let report = reweighted_report();
        assert_eq!(report.breakdown.projects_score, 10.0);
        assert_eq!(report.breakdown.skills_score, 15.0);

        let markdown = MarkdownFormatter::new(false).format_report(&report).unwrap();
        assert!(markdown.contains("| Skills | 15.00 | 30 |"));
        assert!(markdown.contains("| Projects | 10.00 | 20 |"));

        let console = ConsoleFormatter::new(false, false).format_report(&report).unwrap();
        assert!(console.contains("15.00 / 30"));
        assert!(console.contains("10.00 / 20"));
        assert!(!console.contains("/ 40"));
    }

    #[test]
    fn test_json_round_trips_breakdown() {
        let report = sample_report();
        let json = JsonFormatter::new(false).format_report(&report).unwrap();
        let parsed: ScoreReport = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.breakdown, report.breakdown);
        assert_eq!(parsed.metadata.resume_file, "cv/jane.txt");
    }

    #[test]
    fn test_markdown_sections() {
        let output = MarkdownFormatter::new(true).format_report(&sample_report()).unwrap();

        assert!(output.contains("**Résumé:** `jane.txt` | **Job:** `backend.txt`"));
        assert!(output.contains("| Skills | 20.00 | 40 |"));
        assert!(output.contains("**Matched:** `Python`"));
    }

    #[test]
    fn test_suggest_filename() {
        assert_eq!(suggest_filename(OutputFormat::Json, "cv/jane.pdf", false), "jane_score.json");
        assert_eq!(suggest_filename(OutputFormat::Markdown, "jane.txt", false), "jane_score.md");
    }

    #[test]
    fn test_save_report_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("out.md");

        save_report_to_file("# hi", &path).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "# hi");
    }
}

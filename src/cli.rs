//! CLI interface for cv-match

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cv-match")]
#[command(about = "Score how well a résumé matches a job description")]
#[command(long_about = "Score résumés against job descriptions using skill matching, claim validation and duplicate detection against a reference corpus")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a résumé against a job description
    Score {
        /// Path to résumé file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (TXT, MD)
        #[arg(short, long)]
        job: PathBuf,

        /// Required education, e.g. "B.Tech in Computer Science"
        #[arg(short, long)]
        education: Option<String>,

        /// Reference document or directory for the similarity check (repeatable)
        #[arg(long = "reference")]
        references: Vec<PathBuf>,

        /// Output format: console, json, markdown (defaults to the configured one)
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Output detailed breakdown
        #[arg(short, long)]
        detailed: bool,
    },

    /// Print the facts extracted from a résumé
    Parse {
        /// Path to résumé file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,
    },

    /// Show or manage configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Check the configuration and list every problem found
    Validate,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            format
        )),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_repeated_references() {
        let cli = Cli::parse_from([
            "cv-match", "score", "-r", "cv.pdf", "-j", "job.txt", "--reference", "a.txt",
            "--reference", "corpus/",
        ]);

        match cli.command {
            Commands::Score { references, education, .. } => {
                assert_eq!(references, vec![PathBuf::from("a.txt"), PathBuf::from("corpus/")]);
                assert!(education.is_none());
            }
            _ => panic!("expected score command"),
        }
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(parse_output_format("MD"), Ok(OutputFormat::Markdown));
        assert!(parse_output_format("html").is_err());
    }

    #[test]
    fn test_file_extension_validation() {
        assert!(validate_file_extension(Path::new("cv.PDF"), &["pdf", "txt"]).is_ok());
        assert!(validate_file_extension(Path::new("cv.docx"), &["pdf", "txt"]).is_err());
        assert!(validate_file_extension(Path::new("cv"), &["pdf"]).is_err());
    }
}

//! cv-match: résumé to job description scoring

use anyhow::{bail, Context, Result};
use clap::Parser;
use cv_match::cli::{self, Cli, Commands, ConfigAction};
use cv_match::config::Config;
use cv_match::input::InputManager;
use cv_match::output::{save_report_to_file, suggest_filename, ReportGenerator, ScoreReport};
use cv_match::processing::analyzer::ScoringEngine;
use log::{error, info};
use std::path::{Path, PathBuf};
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    if let Err(e) = run(cli).await {
        error!("Command failed: {:#}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        // Config commands must work even when the file on disk is broken
        Commands::Config { action } => run_config(action, cli.config.as_deref()),

        Commands::Score {
            resume,
            job,
            education,
            references,
            output,
            save,
            detailed,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let options = ScoreOptions {
                education: education.unwrap_or_default(),
                references,
                output,
                save,
                detailed,
            };
            run_score(&config, &resume, &job, options).await
        }

        Commands::Parse { resume } => {
            let config = load_config(cli.config.as_deref())?;
            run_parse(&config, &resume).await
        }
    }
}

struct ScoreOptions {
    education: String,
    references: Vec<PathBuf>,
    output: Option<String>,
    save: Option<PathBuf>,
    detailed: bool,
}

async fn run_score(config: &Config, resume: &Path, job: &Path, options: ScoreOptions) -> Result<()> {
    cli::validate_file_extension(resume, &["pdf", "txt", "md"])
        .map_err(anyhow::Error::msg)
        .context("Résumé file")?;
    cli::validate_file_extension(job, &["txt", "md"])
        .map_err(anyhow::Error::msg)
        .context("Job description file")?;

    let format = match &options.output {
        Some(format) => cli::parse_output_format(format).map_err(anyhow::Error::msg)?,
        None => config.output.format,
    };

    let mut input_manager = InputManager::new();
    let resume_doc = input_manager
        .extract_document(resume)
        .await
        .with_context(|| format!("Failed to read résumé {}", resume.display()))?;
    let job_doc = input_manager
        .extract_document(job)
        .await
        .with_context(|| format!("Failed to read job description {}", job.display()))?;

    let corpus: Vec<String> = input_manager
        .load_corpus(&options.references)
        .await
        .context("Failed to load reference corpus")?
        .into_iter()
        .map(|doc| doc.text)
        .collect();

    info!(
        "Scoring {} ({} chars) against {} ({} chars)",
        resume.display(),
        resume_doc.char_count(),
        job.display(),
        job_doc.char_count()
    );

    let engine = ScoringEngine::new(config, corpus)?;
    let breakdown = engine.calculate_ats_score(&resume_doc.text, &job_doc.text, &options.education)?;

    let report = ScoreReport::new(
        breakdown,
        resume.display().to_string(),
        job.display().to_string(),
        engine.reference_documents(),
    )
    .with_required_education(&options.education);

    let generator = ReportGenerator::with_options(
        config.output.color_output && options.save.is_none(),
        options.detailed || config.output.detailed,
        true,
        true,
    );
    let rendered = generator.generate_report(&report, format)?;

    match options.save {
        Some(path) => {
            // A directory gets a generated file name
            let path = if path.is_dir() {
                path.join(suggest_filename(format, &resume.to_string_lossy(), true))
            } else {
                path
            };
            save_report_to_file(&rendered, &path)?;
            println!("Report saved to {}", path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

async fn run_parse(config: &Config, resume: &Path) -> Result<()> {
    let mut input_manager = InputManager::new();
    let document = input_manager
        .extract_document(resume)
        .await
        .with_context(|| format!("Failed to read résumé {}", resume.display()))?;

    let engine = ScoringEngine::new(config, Vec::new())?;
    let parsed = engine.parse_resume(&document.text)?;

    println!("Résumé: {} ({} words)", document.source, document.word_count());
    println!("Skills: {}", parsed.skills.join(", "));
    println!("Experience: {} years", parsed.experience_years);
    println!("\nProjects section:\n{}", section_or_none(&parsed.projects_text));
    println!("\nEducation section:\n{}", section_or_none(&parsed.education_text));

    Ok(())
}

fn run_config(action: Option<ConfigAction>, path: Option<&Path>) -> Result<()> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(Config::config_path);

    match action {
        Some(ConfigAction::Show) | None => {
            let config = load_config(Some(&path))?;
            println!("Configuration file: {}\n", path.display());
            println!("{}", toml::to_string_pretty(&config)?);
        }

        Some(ConfigAction::Reset) => {
            Config::default().save_to(&path)?;
            println!("Configuration reset to defaults at {}", path.display());
        }

        Some(ConfigAction::Validate) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let config: Config = toml::from_str(&content).context("Failed to parse configuration")?;

            if let Err(errors) = config.validate() {
                for problem in &errors {
                    println!("  ✗ {}", problem);
                }
                bail!("{} configuration problem(s) found", errors.len());
            }
            println!("Configuration is valid: {}", path.display());
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) if path.exists() => Config::load_from(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        Some(path) => {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
        None => Config::load().context("Failed to load configuration"),
    }
}

fn section_or_none(section: &str) -> &str {
    if section.is_empty() {
        "(not found)"
    } else {
        section
    }
}

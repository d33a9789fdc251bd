//! Configuration management for the scoring engine

use crate::error::{CvMatchError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub scoring: ScoringConfig,
    pub similarity: SimilarityConfig,
    pub vocabulary: VocabularyConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoringConfig {
    pub min_resume_chars: usize,
    pub min_job_description_chars: usize,
    pub default_required_experience: u32,
    /// Single experience matches above this are discarded as absurd.
    pub experience_ceiling: u32,
    pub weights: CategoryWeights,
    pub penalties: PenaltyConfig,
}

/// Category caps; they must add up to 100.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CategoryWeights {
    pub skills: f64,
    pub experience: f64,
    pub projects: f64,
    pub education: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PenaltyConfig {
    pub unverified_projects_threshold: f64,
    pub unverified_projects_points: f64,
    pub unrealistic_experience_years: u32,
    pub unrealistic_experience_points: f64,
    pub keyword_stuffing_occurrences: usize,
    pub keyword_stuffing_skills_checked: usize,
    pub keyword_stuffing_points: f64,
    /// Evaluated highest threshold first, only one tier fires.
    pub plagiarism_tiers: Vec<PlagiarismTier>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlagiarismTier {
    /// Similarity percentage that must be exceeded.
    pub threshold: f64,
    pub points: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimilarityConfig {
    pub max_features: usize,
    pub max_ngram: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct VocabularyConfig {
    pub additional_skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            similarity: SimilarityConfig::default(),
            vocabulary: VocabularyConfig::default(),
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
            },
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_resume_chars: 100,
            min_job_description_chars: 50,
            default_required_experience: 2,
            experience_ceiling: 50,
            weights: CategoryWeights {
                skills: 40.0,
                experience: 20.0,
                projects: 10.0,
                education: 30.0,
            },
            penalties: PenaltyConfig::default(),
        }
    }
}

impl Default for PenaltyConfig {
    fn default() -> Self {
        Self {
            unverified_projects_threshold: 0.3,
            unverified_projects_points: 3.0,
            unrealistic_experience_years: 20,
            unrealistic_experience_points: 10.0,
            keyword_stuffing_occurrences: 15,
            keyword_stuffing_skills_checked: 5,
            keyword_stuffing_points: 5.0,
            plagiarism_tiers: vec![
                PlagiarismTier { threshold: 80.0, points: 20.0 },
                PlagiarismTier { threshold: 60.0, points: 10.0 },
                PlagiarismTier { threshold: 40.0, points: 5.0 },
            ],
        }
    }
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            max_features: 5000,
            max_ngram: 2,
        }
    }
}

impl CategoryWeights {
    pub fn total(&self) -> f64 {
        self.skills + self.experience + self.projects + self.education
    }
}

impl Config {
    /// Load from the default location, writing defaults on first run.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    /// Load and validate a configuration file at an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| CvMatchError::Configuration(format!("Failed to parse config: {}", e)))?;

        config
            .validate()
            .map_err(|errors| CvMatchError::Configuration(errors.join("; ")))?;

        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| CvMatchError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("cv-match")
            .join("config.toml")
    }

    /// Validate the configuration.
    /// Returns all validation errors at once (not just the first).
    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let scoring = &self.scoring;
        let weights = &scoring.weights;

        for (name, value) in [
            ("skills", weights.skills),
            ("experience", weights.experience),
            ("projects", weights.projects),
            ("education", weights.education),
        ] {
            if value < 0.0 {
                errors.push(format!("scoring.weights.{}: must be non-negative", name));
            }
        }

        if (weights.total() - 100.0).abs() > 1e-9 {
            errors.push(format!(
                "scoring.weights: must sum to 100 (got {})",
                weights.total()
            ));
        }

        if scoring.experience_ceiling == 0 {
            errors.push("scoring.experience_ceiling: must be at least 1".to_string());
        }

        let penalties = &scoring.penalties;
        for (i, tier) in penalties.plagiarism_tiers.iter().enumerate() {
            if tier.threshold <= 0.0 || tier.threshold > 100.0 {
                errors.push(format!(
                    "scoring.penalties.plagiarism_tiers[{}].threshold: must be in (0, 100] (got {})",
                    i, tier.threshold
                ));
            }
            if tier.points < 0.0 {
                errors.push(format!(
                    "scoring.penalties.plagiarism_tiers[{}].points: must be non-negative",
                    i
                ));
            }
        }

        if !(0.0..=1.0).contains(&penalties.unverified_projects_threshold) {
            errors.push(
                "scoring.penalties.unverified_projects_threshold: must be between 0 and 1".to_string(),
            );
        }

        for (name, value) in [
            ("unverified_projects_points", penalties.unverified_projects_points),
            ("unrealistic_experience_points", penalties.unrealistic_experience_points),
            ("keyword_stuffing_points", penalties.keyword_stuffing_points),
        ] {
            if value < 0.0 {
                errors.push(format!("scoring.penalties.{}: must be non-negative", name));
            }
        }

        if self.similarity.max_features == 0 {
            errors.push("similarity.max_features: must be at least 1".to_string());
        }

        if !(1..=3).contains(&self.similarity.max_ngram) {
            errors.push(format!(
                "similarity.max_ngram: must be between 1 and 3 (got {})",
                self.similarity.max_ngram
            ));
        }

        for (i, skill) in self.vocabulary.additional_skills.iter().enumerate() {
            if skill.trim().is_empty() {
                errors.push(format!("vocabulary.additional_skills[{}]: must not be empty", i));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

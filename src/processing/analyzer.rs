//! Scoring engine combining fact extraction, claim validation and similarity checks

use crate::config::{CategoryWeights, Config, ScoringConfig};
use crate::error::{CvMatchError, Result};
use crate::processing::ats_matcher::{contains_term, count_occurrences, SkillMatcher};
use crate::processing::document::{JobRequirement, ParsedResume};
use crate::processing::education::{EducationValidation, EducationValidator, EDUCATION_CAP};
use crate::processing::parser::ResumeParser;
use crate::processing::penalty::{PenaltyEvent, PenaltyReason, PenaltyScope};
use crate::processing::projects::{validate_projects, ProjectVerification};
use crate::processing::round2;
use crate::processing::similarity::{SimilarityDetector, SimilarityReport, SimilarityStatus};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Coordinates every stage of a scoring call.
///
/// The vocabulary and the reference corpus are loaded once at construction
/// and only read afterwards, so one engine can be shared between threads.
pub struct ScoringEngine {
    scoring: ScoringConfig,
    parser: ResumeParser,
    education: EducationValidator,
    similarity: SimilarityDetector,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    ExcellentMatch,
    GoodMatch,
    NeedsImprovement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Category total minus global penalties, clamped to [0, 100]
    pub final_score: f64,

    pub skills_score: f64,
    pub experience_score: f64,
    pub projects_score: f64,
    /// Already reduced by grade penalties
    pub education_score: f64,
    /// Caps the category scores were computed against
    pub weights: CategoryWeights,

    pub similarity_score: f64,
    pub similarity_status: SimilarityStatus,

    pub skills: Vec<String>,
    pub matched_skills: Vec<String>,
    pub verified_skills: Vec<String>,
    pub experience_years: u32,
    pub required_experience_years: u32,

    /// One line per category
    pub feedback: Vec<String>,
    /// One line per triggered penalty, deduction included
    pub penalties: Vec<String>,
    pub penalty_events: Vec<PenaltyEvent>,

    pub verdict: Verdict,
}

// Pipeline stages: Parsed -> Verified -> Penalized -> Clamped -> ScoreBreakdown

struct Parsed {
    resume: ParsedResume,
    job: JobRequirement,
}

struct Verified {
    parsed: Parsed,
    matched_skills: Vec<String>,
    projects: ProjectVerification,
    education: EducationValidation,
    similarity: SimilarityReport,
}

#[derive(Debug, Clone, Copy, Default)]
struct CategoryScores {
    skills: f64,
    experience: f64,
    projects: f64,
    education: f64,
}

struct Penalized {
    verified: Verified,
    categories: CategoryScores,
    feedback: Vec<String>,
    penalties: Vec<PenaltyEvent>,
}

struct Clamped {
    penalized: Penalized,
    final_score: f64,
}

impl Verdict {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Verdict::ExcellentMatch
        } else if score >= 60.0 {
            Verdict::GoodMatch
        } else {
            Verdict::NeedsImprovement
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::ExcellentMatch => "Excellent Match",
            Verdict::GoodMatch => "Good Match",
            Verdict::NeedsImprovement => "Needs Improvement",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl CategoryScores {
    fn total(&self) -> f64 {
        self.skills + self.experience + self.projects + self.education
    }
}

impl ScoreBreakdown {
    /// Sum of the four category scores before global penalties
    pub fn category_total(&self) -> f64 {
        round2(self.skills_score + self.experience_score + self.projects_score + self.education_score)
    }

    /// Points subtracted from the category total
    pub fn global_deductions(&self) -> f64 {
        self.penalty_events
            .iter()
            .filter(|p| p.scope() == PenaltyScope::Global)
            .map(|p| p.points)
            .sum()
    }

    pub fn missing_skills(&self) -> Vec<&str> {
        self.skills
            .iter()
            .filter(|s| !self.matched_skills.contains(s))
            .map(String::as_str)
            .collect()
    }
}

impl ScoringEngine {
    /// Build an engine from configuration and a reference corpus.
    pub fn new(config: &Config, reference_corpus: Vec<String>) -> Result<Self> {
        config
            .validate()
            .map_err(|errors| CvMatchError::Configuration(errors.join("; ")))?;

        let skill_matcher = Arc::new(SkillMatcher::with_custom_skills(
            config.vocabulary.additional_skills.clone(),
        )?);

        info!(
            "Scoring engine ready: {} vocabulary skills, {} reference documents",
            skill_matcher.skill_count(),
            reference_corpus.len()
        );

        Ok(Self {
            scoring: config.scoring.clone(),
            parser: ResumeParser::from_config(config, skill_matcher),
            education: EducationValidator::new(),
            similarity: SimilarityDetector::new(reference_corpus, &config.similarity),
        })
    }

    /// Default configuration, no reference corpus
    pub fn with_defaults() -> Result<Self> {
        Self::new(&Config::default(), Vec::new())
    }

    pub fn reference_documents(&self) -> usize {
        self.similarity.corpus_size()
    }

    pub fn skill_count(&self) -> usize {
        self.parser.skill_matcher().skill_count()
    }

    pub fn parse_resume(&self, resume_text: &str) -> Result<ParsedResume> {
        self.parser.parse_resume(resume_text)
    }

    pub fn calculate_ats_score(
        &self,
        resume_text: &str,
        job_description: &str,
        required_education: &str,
    ) -> Result<ScoreBreakdown> {
        self.validate_inputs(resume_text, job_description)?;

        let parsed = self.parse(resume_text, job_description, required_education)?;
        debug!("Stage parsed: {} résumé skills", parsed.resume.skills.len());

        let verified = self.verify(parsed, resume_text);
        debug!(
            "Stage verified: {} matched skills, projects rate {:.2}, similarity {:.2}%",
            verified.matched_skills.len(),
            verified.projects.verification_rate,
            verified.similarity.similarity
        );

        let penalized = self.penalize(verified, resume_text);
        debug!(
            "Stage penalized: categories {:.2}, {} penalties",
            penalized.categories.total(),
            penalized.penalties.len()
        );

        let clamped = Self::clamp(penalized);
        let breakdown = Self::finish(clamped, self.scoring.weights);

        info!(
            "Final score {:.2} ({})",
            breakdown.final_score, breakdown.verdict
        );

        Ok(breakdown)
    }

    /// Runs before any parsing is attempted.
    fn validate_inputs(&self, resume_text: &str, job_description: &str) -> Result<()> {
        check_length("résumé", resume_text, self.scoring.min_resume_chars)?;
        check_length("job description", job_description, self.scoring.min_job_description_chars)
    }

    fn parse(&self, resume_text: &str, job_description: &str, required_education: &str) -> Result<Parsed> {
        let resume = self.parser.parse_resume(resume_text)?;
        let job = self.parser.parse_job(
            job_description,
            Some(required_education),
            self.scoring.default_required_experience,
        );

        Ok(Parsed { resume, job })
    }

    fn verify(&self, parsed: Parsed, resume_text: &str) -> Verified {
        let matched_skills: Vec<String> = parsed
            .resume
            .skills
            .iter()
            .filter(|skill| contains_term(&parsed.job.description, skill))
            .cloned()
            .collect();

        let projects = validate_projects(&parsed.resume.projects_text, &parsed.resume.skills);
        let education = self
            .education
            .validate(&parsed.resume.education_text, parsed.job.required_education_text());
        let similarity = self.similarity.check_plagiarism(resume_text);

        Verified {
            parsed,
            matched_skills,
            projects,
            education,
            similarity,
        }
    }

    fn penalize(&self, verified: Verified, resume_text: &str) -> Penalized {
        let weights = &self.scoring.weights;
        let rules = &self.scoring.penalties;
        let resume = &verified.parsed.resume;
        let job = &verified.parsed.job;

        let mut feedback = Vec::with_capacity(4);
        let mut penalties = Vec::new();
        let mut categories = CategoryScores::default();

        // Skills
        if resume.skills.is_empty() {
            feedback.push("No skills detected in the résumé".to_string());
        } else if verified.matched_skills.is_empty() {
            feedback.push("No skills detected that match the job description".to_string());
        } else {
            let ratio = verified.matched_skills.len() as f64 / resume.skills.len() as f64;
            categories.skills = ratio * weights.skills;
            feedback.push(format!(
                "Matched {} of {} skills: {}",
                verified.matched_skills.len(),
                resume.skills.len(),
                verified.matched_skills.join(", ")
            ));
        }

        // Experience
        let years = resume.experience_years;
        let required = job.required_experience_years.max(1);
        if years == 0 {
            feedback.push("No experience detected".to_string());
        } else if years >= required {
            categories.experience = weights.experience;
            feedback.push(format!(
                "Experience requirement met: {} years (required {})",
                years, required
            ));
        } else {
            categories.experience =
                (years as f64 / required as f64 * weights.experience).min(weights.experience);
            feedback.push(format!(
                "Partial experience credit: {} of {} required years",
                years, required
            ));
        }

        // Projects
        let rate = verified.projects.verification_rate;
        categories.projects = rate * weights.projects;
        if resume.has_projects() {
            feedback.push(format!(
                "{} of {} skills verified in projects",
                verified.projects.verified_skills.len(),
                resume.skills.len()
            ));
        } else {
            feedback.push("No projects section found".to_string());
        }
        if rate <= rules.unverified_projects_threshold {
            penalties.push(PenaltyEvent::new(
                PenaltyReason::UnverifiedProjects,
                rules.unverified_projects_points,
                "Skills not verified in projects",
            ));
        }

        // Education, grade penalties already folded in
        categories.education =
            verified.education.score as f64 / EDUCATION_CAP as f64 * weights.education;
        feedback.push(format!(
            "Education score: {}/{}",
            verified.education.score, EDUCATION_CAP
        ));
        penalties.extend(verified.education.penalties.iter().cloned());

        // Global
        let similarity = verified.similarity.similarity;
        let mut tiers = rules.plagiarism_tiers.clone();
        tiers.sort_by(|a, b| b.threshold.total_cmp(&a.threshold));
        if let Some(tier) = tiers.iter().find(|tier| similarity > tier.threshold) {
            penalties.push(PenaltyEvent::new(
                PenaltyReason::Plagiarism,
                tier.points,
                format!("High similarity to a reference document: {:.2}%", similarity),
            ));
        }

        if years > rules.unrealistic_experience_years {
            penalties.push(PenaltyEvent::new(
                PenaltyReason::UnrealisticExperience,
                rules.unrealistic_experience_points,
                format!("Unrealistic experience claim: {} years", years),
            ));
        }

        let stuffed = resume
            .skills
            .iter()
            .take(rules.keyword_stuffing_skills_checked)
            .map(|skill| (skill, count_occurrences(resume_text, skill)))
            .find(|(_, count)| *count > rules.keyword_stuffing_occurrences);
        if let Some((skill, count)) = stuffed {
            penalties.push(PenaltyEvent::new(
                PenaltyReason::KeywordStuffing,
                rules.keyword_stuffing_points,
                format!("Keyword stuffing detected: '{}' appears {} times", skill, count),
            ));
        }

        Penalized {
            verified,
            categories,
            feedback,
            penalties,
        }
    }

    fn clamp(penalized: Penalized) -> Clamped {
        let deductions: f64 = penalized
            .penalties
            .iter()
            .filter(|p| p.scope() == PenaltyScope::Global)
            .map(|p| p.points)
            .sum();

        let final_score = round2((penalized.categories.total() - deductions).clamp(0.0, 100.0));

        Clamped {
            penalized,
            final_score,
        }
    }

    fn finish(clamped: Clamped, weights: CategoryWeights) -> ScoreBreakdown {
        let Clamped {
            penalized,
            final_score,
        } = clamped;
        let Penalized {
            verified,
            categories,
            feedback,
            penalties,
        } = penalized;
        let Verified {
            parsed,
            matched_skills,
            projects,
            similarity,
            ..
        } = verified;

        ScoreBreakdown {
            final_score,
            skills_score: round2(categories.skills),
            experience_score: round2(categories.experience),
            projects_score: round2(categories.projects),
            education_score: round2(categories.education),
            weights,
            similarity_score: similarity.similarity,
            similarity_status: similarity.status,
            skills: parsed.resume.skills,
            matched_skills,
            verified_skills: projects.verified_skills,
            experience_years: parsed.resume.experience_years,
            required_experience_years: parsed.job.required_experience_years,
            feedback,
            penalties: penalties.iter().map(|p| p.message.clone()).collect(),
            penalty_events: penalties,
            verdict: Verdict::from_score(final_score),
        }
    }
}

fn check_length(what: &str, text: &str, min_chars: usize) -> Result<()> {
    let chars = text.trim().chars().count();
    if chars == 0 {
        return Err(CvMatchError::Validation(format!("{} text is missing", what)));
    }
    if chars < min_chars {
        return Err(CvMatchError::Validation(format!(
            "{} text is too short: {} characters, at least {} required",
            what, chars, min_chars
        )));
    }
    Ok(())
}

/// Score with default configuration against an explicit reference corpus.
pub fn calculate_ats_score(
    resume_text: &str,
    job_description: &str,
    required_education: &str,
    reference_corpus: &[String],
) -> Result<ScoreBreakdown> {
    ScoringEngine::new(&Config::default(), reference_corpus.to_vec())?.calculate_ats_score(
        resume_text,
        job_description,
        required_education,
    )
}

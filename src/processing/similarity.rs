//! TF-IDF duplicate detection against a small reference corpus

use crate::config::SimilarityConfig;
use crate::processing::round2;
use crate::processing::text_processor::TextProcessor;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SimilarityStatus {
    Computed { documents: usize },
    /// Empty corpus: a no-op, not a failure
    NoReferenceData,
    /// Vectorization failed; the score is 0 and scoring carries on
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityReport {
    /// Highest cosine similarity to any reference, as a percentage in [0, 100]
    pub similarity: f64,
    pub status: SimilarityStatus,
}

impl fmt::Display for SimilarityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimilarityStatus::Computed { documents } => {
                write!(f, "compared against {} reference documents", documents)
            }
            SimilarityStatus::NoReferenceData => write!(f, "no reference data"),
            SimilarityStatus::Unavailable(reason) => write!(f, "similarity unavailable: {}", reason),
        }
    }
}

impl SimilarityReport {
    fn empty(status: SimilarityStatus) -> Self {
        Self {
            similarity: 0.0,
            status,
        }
    }

    pub fn is_computed(&self) -> bool {
        matches!(self.status, SimilarityStatus::Computed { .. })
    }
}

/// Holds the reference corpus as shared read-only state.
pub struct SimilarityDetector {
    corpus: Arc<[String]>,
    processor: TextProcessor,
    max_features: usize,
}

type TermWeights = BTreeMap<String, f64>;

impl SimilarityDetector {
    pub fn new(corpus: Vec<String>, config: &SimilarityConfig) -> Self {
        Self {
            corpus: corpus.into(),
            processor: TextProcessor::new(config.max_ngram),
            max_features: config.max_features.max(1),
        }
    }

    pub fn corpus_size(&self) -> usize {
        self.corpus.len()
    }

    pub fn check_plagiarism(&self, text: &str) -> SimilarityReport {
        self.check_against(text, &self.corpus)
    }

    /// Max cosine similarity between `text` and any document of `corpus`
    pub fn check_against(&self, text: &str, corpus: &[String]) -> SimilarityReport {
        if corpus.is_empty() {
            return SimilarityReport::empty(SimilarityStatus::NoReferenceData);
        }

        let documents: Vec<Vec<String>> = std::iter::once(text)
            .chain(corpus.iter().map(String::as_str))
            .map(|doc| self.processor.terms(doc))
            .collect();

        let vectors = match self.vectorize(&documents) {
            Ok(vectors) => vectors,
            Err(reason) => {
                warn!("Similarity check skipped: {}", reason);
                return SimilarityReport::empty(SimilarityStatus::Unavailable(reason));
            }
        };

        let (resume, references) = vectors.split_at(1);
        let best = references
            .iter()
            .map(|reference| cosine(&resume[0], reference))
            .fold(0.0_f64, f64::max);

        let similarity = round2((best * 100.0).clamp(0.0, 100.0));
        debug!("Max similarity {:.2}% over {} references", similarity, corpus.len());

        SimilarityReport {
            similarity,
            status: SimilarityStatus::Computed {
                documents: corpus.len(),
            },
        }
    }

    /// L2-normalised TF-IDF vectors (smoothed idf), one per document
    fn vectorize(&self, documents: &[Vec<String>]) -> Result<Vec<TermWeights>, String> {
        let counts: Vec<BTreeMap<&str, usize>> = documents
            .iter()
            .map(|terms| {
                let mut tf = BTreeMap::new();
                for term in terms {
                    *tf.entry(term.as_str()).or_insert(0) += 1;
                }
                tf
            })
            .collect();

        let mut corpus_frequency: BTreeMap<&str, usize> = BTreeMap::new();
        let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
        for tf in &counts {
            for (term, count) in tf {
                *corpus_frequency.entry(*term).or_insert(0) += count;
                *document_frequency.entry(*term).or_insert(0) += 1;
            }
        }

        if corpus_frequency.is_empty() {
            return Err("empty vocabulary; documents contain only stop words".to_string());
        }

        let vocabulary = self.limit_vocabulary(&corpus_frequency);
        let n = documents.len() as f64;

        let vectors = counts
            .iter()
            .map(|tf| {
                let mut weights: TermWeights = tf
                    .iter()
                    .filter(|(term, _)| vocabulary.contains(*term))
                    .map(|(term, count)| {
                        let df = document_frequency[term] as f64;
                        let idf = ((1.0 + n) / (1.0 + df)).ln() + 1.0;
                        (term.to_string(), *count as f64 * idf)
                    })
                    .collect();

                let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
                if norm > 0.0 {
                    weights.values_mut().for_each(|w| *w /= norm);
                }
                weights
            })
            .collect();

        Ok(vectors)
    }

    /// Most frequent terms across the corpus, ties broken alphabetically
    fn limit_vocabulary<'a>(&self, corpus_frequency: &BTreeMap<&'a str, usize>) -> BTreeSet<&'a str> {
        let mut ranked: Vec<(&'a str, usize)> =
            corpus_frequency.iter().map(|(term, count)| (*term, *count)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        ranked
            .into_iter()
            .take(self.max_features)
            .map(|(term, _)| term)
            .collect()
    }
}

impl Default for SimilarityDetector {
    fn default() -> Self {
        Self::new(Vec::new(), &SimilarityConfig::default())
    }
}

/// Check `text` against an explicitly supplied corpus with default settings.
pub fn check_plagiarism(text: &str, reference_corpus: &[String]) -> SimilarityReport {
    SimilarityDetector::default().check_against(text, reference_corpus)
}

fn cosine(a: &TermWeights, b: &TermWeights) -> f64 {
    a.iter()
        .filter_map(|(term, weight)| b.get(term).map(|other| weight * other))
        .sum()
}

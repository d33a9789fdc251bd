//! Intake collaborators: where finished scores are recorded and quotas enforced
//!
//! The scoring engine never calls these itself. A caller scores a résumé,
//! then hands the immutable breakdown to a `SubmissionStore`, which must
//! count each submission at most once even under concurrent retries.

use crate::error::{CvMatchError, Result};
use crate::processing::analyzer::ScoreBreakdown;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

/// Uploads allowed per participant
pub const DEFAULT_UPLOAD_LIMIT: u32 = 5;

pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordOutcome {
    Recorded { remaining: u32 },
    /// Same submission id seen before; nothing was counted
    AlreadyRecorded,
    QuotaExceeded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based
    pub rank: usize,
    pub participant: String,
    pub best_score: f64,
}

pub trait SubmissionStore: Send + Sync {
    fn record(
        &self,
        participant: &str,
        submission_id: &str,
        breakdown: &ScoreBreakdown,
    ) -> Result<RecordOutcome>;
}

pub trait QuotaService: Send + Sync {
    fn remaining(&self, participant: &str) -> Result<u32>;
}

#[derive(Debug, Default)]
struct ParticipantRecord {
    scores: BTreeMap<String, f64>,
}

impl ParticipantRecord {
    fn best(&self) -> Option<f64> {
        self.scores.values().copied().reduce(f64::max)
    }
}

/// Thread-safe in-memory store and quota service.
#[derive(Debug)]
pub struct InMemoryIntake {
    upload_limit: u32,
    participants: Mutex<HashMap<String, ParticipantRecord>>,
}

impl InMemoryIntake {
    pub fn new(upload_limit: u32) -> Self {
        Self {
            upload_limit,
            participants: Mutex::new(HashMap::new()),
        }
    }

    pub fn upload_limit(&self) -> u32 {
        self.upload_limit
    }

    pub fn best_score(&self, participant: &str) -> Result<Option<f64>> {
        Ok(self.lock()?.get(participant).and_then(ParticipantRecord::best))
    }

    pub fn submission_count(&self, participant: &str) -> Result<usize> {
        Ok(self.lock()?.get(participant).map_or(0, |p| p.scores.len()))
    }

    /// Top `limit` participants by best score, highest first, ties by name
    pub fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>> {
        let participants = self.lock()?;
        let mut board: Vec<(&String, f64)> = participants
            .iter()
            .filter_map(|(name, record)| record.best().map(|best| (name, best)))
            .collect();
        board.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        Ok(board
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(i, (name, best))| LeaderboardEntry {
                rank: i + 1,
                participant: name.clone(),
                best_score: best,
            })
            .collect())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, ParticipantRecord>>> {
        self.participants
            .lock()
            .map_err(|_| CvMatchError::Processing("intake state lock poisoned".to_string()))
    }
}

impl Default for InMemoryIntake {
    fn default() -> Self {
        Self::new(DEFAULT_UPLOAD_LIMIT)
    }
}

impl SubmissionStore for InMemoryIntake {
    fn record(
        &self,
        participant: &str,
        submission_id: &str,
        breakdown: &ScoreBreakdown,
    ) -> Result<RecordOutcome> {
        let mut participants = self.lock()?;
        let record = participants.entry(participant.to_string()).or_default();

        if record.scores.contains_key(submission_id) {
            debug!("Submission {} for {} already recorded", submission_id, participant);
            return Ok(RecordOutcome::AlreadyRecorded);
        }

        let used = record.scores.len() as u32;
        if used >= self.upload_limit {
            return Ok(RecordOutcome::QuotaExceeded);
        }

        record
            .scores
            .insert(submission_id.to_string(), breakdown.final_score);

        Ok(RecordOutcome::Recorded {
            remaining: self.upload_limit - used - 1,
        })
    }
}

impl QuotaService for InMemoryIntake {
    fn remaining(&self, participant: &str) -> Result<u32> {
        let used = self.submission_count(participant)? as u32;
        Ok(self.upload_limit.saturating_sub(used))
    }
}

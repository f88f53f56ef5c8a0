use std::collections::BTreeMap;

use thiserror::Error;

use crate::models::{FeedbackData, FeedbackRecord, HumanProfile};
use crate::services::storage::FeedbackBackend;

/// Errors that can occur with feedback persistence
#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Feedback store lock poisoned")]
    LockPoisoned,
}

/// Accepted and rejected match judgments, plus the skill weights derived from them
///
/// The in-memory copy is the source of truth; every mutation is written
/// through to the backend before it returns. A failed write rolls the
/// mutation back and reports the error.
pub struct FeedbackStore {
    backend: Box<dyn FeedbackBackend>,
    data: FeedbackData,
}

impl FeedbackStore {
    /// Load the store from its backend, starting empty if nothing was saved
    pub fn open(backend: Box<dyn FeedbackBackend>) -> Result<Self, FeedbackError> {
        let data = match backend.load()? {
            Some(mut data) => {
                data.normalize_polarity();
                tracing::info!(
                    positive = data.positive_matches.len(),
                    negative = data.negative_matches.len(),
                    skills = data.skill_weights.len(),
                    "Loaded feedback from {}",
                    backend.describe()
                );
                data
            }
            None => {
                tracing::info!("No saved feedback in {}, starting empty", backend.describe());
                FeedbackData::default()
            }
        };

        Ok(Self { backend, data })
    }

    /// Record a judgment on a (human, AI) pair
    ///
    /// The record is timestamped, appended, skill weights are recomputed
    /// against `current_humans`, and the whole store is persisted.
    pub fn record(
        &mut self,
        human: &str,
        ai: &str,
        positive: bool,
        reason: Option<String>,
        current_humans: &[HumanProfile],
    ) -> Result<FeedbackRecord, FeedbackError> {
        let record = FeedbackRecord::new(human, ai, positive, reason);
        let previous_weights = self.data.skill_weights.clone();

        if positive {
            self.data.positive_matches.push(record.clone());
        } else {
            self.data.negative_matches.push(record.clone());
        }
        self.data.recompute_skill_weights(current_humans);

        if let Err(e) = self.backend.save(&self.data) {
            if positive {
                self.data.positive_matches.pop();
            } else {
                self.data.negative_matches.pop();
            }
            self.data.skill_weights = previous_weights;
            tracing::error!("Failed to persist feedback for {} + {}: {}", human, ai, e);
            return Err(e);
        }

        tracing::info!(
            human,
            ai,
            positive,
            total = self.data.total(),
            "Feedback recorded"
        );
        Ok(record)
    }

    /// Recompute skill weights from positive judgments on `current_humans` and persist
    pub fn recompute_skill_weights(&mut self, current_humans: &[HumanProfile]) -> Result<(), FeedbackError> {
        let previous_weights = self.data.skill_weights.clone();
        self.data.recompute_skill_weights(current_humans);

        if let Err(e) = self.backend.save(&self.data) {
            self.data.skill_weights = previous_weights;
            return Err(e);
        }
        Ok(())
    }

    /// Drop every judgment and skill weight
    pub fn clear(&mut self) -> Result<(), FeedbackError> {
        let previous = std::mem::take(&mut self.data);

        if let Err(e) = self.backend.save(&self.data) {
            self.data = previous;
            return Err(e);
        }

        tracing::info!("Feedback cleared");
        Ok(())
    }

    pub fn data(&self) -> &FeedbackData {
        &self.data
    }

    /// Copy of the current state for a matching run
    pub fn snapshot(&self) -> FeedbackData {
        self.data.clone()
    }

    pub fn positive_count(&self) -> usize {
        self.data.positive_matches.len()
    }

    pub fn negative_count(&self) -> usize {
        self.data.negative_matches.len()
    }

    pub fn skill_weights(&self) -> &BTreeMap<String, f64> {
        &self.data.skill_weights
    }

    /// Up to `limit` judgments of either polarity, newest first
    pub fn recent(&self, limit: usize) -> Vec<FeedbackRecord> {
        let mut all: Vec<FeedbackRecord> = self
            .data
            .positive_matches
            .iter()
            .chain(&self.data.negative_matches)
            .cloned()
            .collect();
        all.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        all.truncate(limit);
        all
    }
}

impl std::fmt::Debug for FeedbackStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedbackStore")
            .field("backend", &self.backend.describe())
            .field("positive", &self.positive_count())
            .field("negative", &self.negative_count())
            .finish()
    }
}

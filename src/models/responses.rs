use serde::{Deserialize, Serialize};

use crate::models::domain::{FeedbackRecord, MatchResult, SkillSet};

/// Response for the find matches endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindMatchesResponse {
    pub matches: Vec<MatchResult>,
    pub total_results: usize,
    /// Profiles left out of the run because a required field was empty
    pub dropped_profiles: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weights_warning: Option<String>,
}

/// Response after recording feedback
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitFeedbackResponse {
    pub success: bool,
    pub record: FeedbackRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillWeightEntry {
    pub skill: String,
    pub weight: f64,
}

/// Aggregate view of accumulated feedback
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackSummaryResponse {
    pub total_feedback: usize,
    pub positive_matches: usize,
    pub negative_matches: usize,
    /// Heaviest first
    pub skill_weights: Vec<SkillWeightEntry>,
    /// Newest first
    pub recent: Vec<FeedbackRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractResponse {
    pub extracted: SkillSet,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub embedding_model: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

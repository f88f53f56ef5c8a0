// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AIProfile, FeedbackData, FeedbackRecord, HumanProfile, MatchResult, MatchWeights, SkillSet,
    DOMAINS_CATEGORY,
};
pub use requests::{
    AIProfileForm, ExtractRequest, FindMatchesRequest, HumanProfileForm, ProfileKind,
    SubmitFeedbackRequest,
};
pub use responses::{
    ErrorResponse, ExtractResponse, FeedbackSummaryResponse, FindMatchesResponse, HealthResponse,
    SkillWeightEntry, SubmitFeedbackResponse,
};

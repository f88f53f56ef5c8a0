use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::extractor::parse_term_list;
use crate::models::domain::{AIProfile, HumanProfile, MatchWeights};

/// Request to score every human against every AI agent
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindMatchesRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "humanProfiles")]
    pub human_profiles: Vec<HumanProfile>,
    #[validate(length(min = 1))]
    #[serde(alias = "aiProfiles")]
    pub ai_profiles: Vec<AIProfile>,
    #[validate(nested)]
    #[serde(default)]
    pub weights: Option<MatchWeights>,
}

/// Request to record a judgment on a match
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitFeedbackRequest {
    #[validate(length(min = 1))]
    pub human: String,
    #[validate(length(min = 1))]
    pub ai: String,
    pub positive: bool,
    #[serde(default)]
    pub reason: Option<String>,
    /// Profiles to derive skill weights from; defaults to the last matched batch
    #[serde(default, alias = "humanProfiles")]
    pub human_profiles: Option<Vec<HumanProfile>>,
}

impl SubmitFeedbackRequest {
    /// Reason with blank input treated as absent
    pub fn reason(&self) -> Option<String> {
        self.reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string)
    }
}

/// Human expert form with comma-separated skills
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HumanProfileForm {
    pub name: String,
    pub bio: String,
    pub skills: String,
}

impl HumanProfileForm {
    pub fn into_profile(self) -> HumanProfile {
        HumanProfile::new(self.name.trim(), self.bio.trim(), parse_term_list(&self.skills))
    }
}

/// AI agent form with comma-separated capabilities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AIProfileForm {
    pub name: String,
    pub description: String,
    pub capabilities: String,
}

impl AIProfileForm {
    pub fn into_profile(self) -> AIProfile {
        AIProfile::new(
            self.name.trim(),
            self.description.trim(),
            parse_term_list(&self.capabilities),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    Human,
    Ai,
}

/// Request to spot skills or capabilities in free text
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ExtractRequest {
    #[validate(length(min = 1))]
    pub text: String,
    pub kind: ProfileKind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SkillSet;

    #[test]
    fn test_find_matches_request_accepts_camel_case() {
        let json = r#"{
            "humanProfiles": [{"name": "Alice", "bio": "ML engineer", "skills": ["python"]}],
            "aiProfiles": [{"name": "Bot1", "description": "regression", "capabilities": ["python"]}]
        }"#;

        let req: FindMatchesRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.human_profiles.len(), 1);
        assert!(req.weights.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_find_matches_request_rejects_empty_batch() {
        let req = FindMatchesRequest {
            human_profiles: vec![],
            ai_profiles: vec![],
            weights: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_human_form_parsing() {
        let form = HumanProfileForm {
            name: " Alice ".to_string(),
            bio: "ML engineer".to_string(),
            skills: "python,  machine learning, ,sql".to_string(),
        };

        let profile = form.into_profile();
        assert_eq!(profile.name, "Alice");
        assert_eq!(
            profile.skills,
            SkillSet::FlatList(vec![
                "python".to_string(),
                "machine learning".to_string(),
                "sql".to_string()
            ])
        );
    }

    #[test]
    fn test_blank_reason_is_absent() {
        let req = SubmitFeedbackRequest {
            human: "Alice".to_string(),
            ai: "Bot1".to_string(),
            positive: true,
            reason: Some("   ".to_string()),
            human_profiles: None,
        };
        assert!(req.reason().is_none());
    }
}

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{AIProfile, HumanProfile};

#[derive(Debug, Error)]
pub enum SampleDataError {
    #[error("Sample data not found at {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid sample data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Seed profiles for demos, in the same shape as a matching request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleData {
    #[serde(default)]
    pub human_profiles: Vec<HumanProfile>,
    #[serde(default)]
    pub ai_profiles: Vec<AIProfile>,
}

impl SampleData {
    pub fn load(path: &Path) -> Result<Self, SampleDataError> {
        if !path.exists() {
            return Err(SampleDataError::NotFound(path.display().to_string()));
        }

        let json = fs::read_to_string(path)?;
        let data: SampleData = serde_json::from_str(&json)?;

        tracing::debug!(
            humans = data.human_profiles.len(),
            ais = data.ai_profiles.len(),
            "Loaded sample data from {}",
            path.display()
        );
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SkillSet;

    #[test]
    fn test_load_sample_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.json");
        fs::write(
            &path,
            r#"{
                "human_profiles": [
                    {"name": "Alice", "bio": "ML engineer", "skills": ["python", "ml"]}
                ],
                "ai_profiles": [
                    {"name": "Scribe", "description": "Summarizes text",
                     "capabilities": {"tasks": ["summarize"], "domains": ["legal"]}}
                ]
            }"#,
        )
        .unwrap();

        let data = SampleData::load(&path).unwrap();
        assert_eq!(data.human_profiles[0].name, "Alice");
        assert!(matches!(data.ai_profiles[0].capabilities, SkillSet::Categorized(_)));
    }

    #[test]
    fn test_missing_sample_file() {
        let result = SampleData::load(Path::new("/nonexistent/sample.json"));
        assert!(matches!(result, Err(SampleDataError::NotFound(_))));
    }

    #[test]
    fn test_bundled_sample_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/sample_data.json");
        let data = SampleData::load(&path).unwrap();
        assert!(!data.human_profiles.is_empty());
        assert!(!data.ai_profiles.is_empty());
        assert!(data.human_profiles.iter().all(|h| h.is_complete()));
        assert!(data.ai_profiles.iter().all(|a| a.is_complete()));
    }
}

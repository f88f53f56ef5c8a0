use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::models::FeedbackData;
use crate::services::feedback::FeedbackError;

/// Durable home of the feedback record
pub trait FeedbackBackend: Send + Sync {
    /// Previously saved state, or `None` when nothing has been saved yet
    fn load(&self) -> Result<Option<FeedbackData>, FeedbackError>;

    /// Replace the saved state
    fn save(&self, data: &FeedbackData) -> Result<(), FeedbackError>;

    fn describe(&self) -> String;
}

/// Pretty-printed JSON file at a fixed path
///
/// Writes go to a sibling temp file that is then renamed over the target.
/// There is no cross-process locking: two processes writing at once race,
/// and the last rename wins.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl FeedbackBackend for JsonFileBackend {
    fn load(&self) -> Result<Option<FeedbackData>, FeedbackError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&self.path)?;
        let data: FeedbackData = serde_json::from_str(&json)?;
        Ok(Some(data))
    }

    fn save(&self, data: &FeedbackData) -> Result<(), FeedbackError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(data)?;
        let temp = self.temp_path();
        fs::write(&temp, json)?;
        fs::rename(&temp, &self.path)?;

        tracing::trace!("Feedback saved to {}", self.path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        format!("json file {}", self.path.display())
    }
}

/// Volatile backend; state lives only as long as the process
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    saved: Mutex<Option<FeedbackData>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing state, as if it had been saved earlier
    pub fn with_data(data: FeedbackData) -> Self {
        Self {
            saved: Mutex::new(Some(data)),
        }
    }
}

impl FeedbackBackend for InMemoryBackend {
    fn load(&self) -> Result<Option<FeedbackData>, FeedbackError> {
        let saved = self.saved.lock().map_err(|_| FeedbackError::LockPoisoned)?;
        Ok(saved.clone())
    }

    fn save(&self, data: &FeedbackData) -> Result<(), FeedbackError> {
        let mut saved = self.saved.lock().map_err(|_| FeedbackError::LockPoisoned)?;
        *saved = Some(data.clone());
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FeedbackRecord;

    #[test]
    fn test_missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("absent.json"));
        assert!(backend.load().unwrap().is_none());
    }

    #[test]
    fn test_save_writes_three_top_level_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("match_feedback.json");
        let backend = JsonFileBackend::new(&path);

        let mut data = FeedbackData::default();
        data.positive_matches
            .push(FeedbackRecord::new("Alice", "Bot1", true, Some("great".to_string())));
        data.skill_weights.insert("python".to_string(), 1.0);
        backend.save(&data).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value["positive_matches"].is_array());
        assert!(value["negative_matches"].is_array());
        assert_eq!(value["skill_weights"]["python"], 1.0);
        assert!(raw.contains("\n  \"positive_matches\""));
        assert!(!backend.temp_path().exists());

        let loaded = backend.load().unwrap().unwrap();
        assert_eq!(loaded, data);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let backend = JsonFileBackend::new(&path);
        assert!(matches!(backend.load(), Err(FeedbackError::Serialization(_))));
    }

    #[test]
    fn test_loads_file_without_polarity_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.json");
        fs::write(
            &path,
            r#"{
  "positive_matches": [
    {"human": "Alice", "ai": "Bot1", "timestamp": "2024-05-01T09:30:00.000001", "reason": null}
  ],
  "negative_matches": [],
  "skill_weights": {"python": 0.5, "ml": 0.5}
}"#,
        )
        .unwrap();

        let data = JsonFileBackend::new(&path).load().unwrap().unwrap();
        assert_eq!(data.positive_matches.len(), 1);
        assert_eq!(data.skill_weights.len(), 2);
    }

    #[test]
    fn test_in_memory_backend() {
        let backend = InMemoryBackend::new();
        assert!(backend.load().unwrap().is_none());

        let data = FeedbackData::default();
        backend.save(&data).unwrap();
        assert_eq!(backend.load().unwrap(), Some(data));
    }
}

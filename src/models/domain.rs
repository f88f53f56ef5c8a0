use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use validator::Validate;

/// Category consulted for domain alignment on categorized skill sets
pub const DOMAINS_CATEGORY: &str = "domains";

/// Declared skills or capabilities of a profile
///
/// Profiles either list their terms directly or group them by category
/// (e.g. `{"technical": [...], "domains": [...]}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SkillSet {
    FlatList(Vec<String>),
    Categorized(BTreeMap<String, Vec<String>>),
}

impl SkillSet {
    /// Union of every term, regardless of category
    pub fn flatten(&self) -> BTreeSet<String> {
        match self {
            SkillSet::FlatList(terms) => terms.iter().cloned().collect(),
            SkillSet::Categorized(categories) => categories.values().flatten().cloned().collect(),
        }
    }

    /// Terms used for domain alignment
    ///
    /// A flat list is its own domain set; a categorized set contributes only
    /// its `domains` category (empty when absent).
    pub fn domain_terms(&self) -> BTreeSet<String> {
        match self {
            SkillSet::FlatList(terms) => terms.iter().cloned().collect(),
            SkillSet::Categorized(categories) => categories
                .get(DOMAINS_CATEGORY)
                .map(|terms| terms.iter().cloned().collect())
                .unwrap_or_default(),
        }
    }

    /// Declared terms of a flat list, in order. Categorized sets yield `None`.
    pub fn flat_terms(&self) -> Option<&[String]> {
        match self {
            SkillSet::FlatList(terms) => Some(terms),
            SkillSet::Categorized(_) => None,
        }
    }

    /// Space-joined terms appended to the profile text before embedding
    pub fn embedding_terms(&self) -> String {
        match self {
            SkillSet::FlatList(terms) => terms.join(" "),
            SkillSet::Categorized(_) => self.flatten().into_iter().collect::<Vec<_>>().join(" "),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            SkillSet::FlatList(terms) => terms.is_empty(),
            SkillSet::Categorized(categories) => categories.values().all(|terms| terms.is_empty()),
        }
    }
}

impl Default for SkillSet {
    fn default() -> Self {
        SkillSet::FlatList(Vec::new())
    }
}

impl From<Vec<String>> for SkillSet {
    fn from(terms: Vec<String>) -> Self {
        SkillSet::FlatList(terms)
    }
}

/// Human expert profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanProfile {
    pub name: String,
    pub bio: String,
    pub skills: SkillSet,
}

impl HumanProfile {
    pub fn new(name: impl Into<String>, bio: impl Into<String>, skills: impl Into<SkillSet>) -> Self {
        Self {
            name: name.into(),
            bio: bio.into(),
            skills: skills.into(),
        }
    }

    /// Text fed to the embedding model: bio followed by the skill terms
    pub fn embedding_text(&self) -> String {
        format!("{} {}", self.bio, self.skills.embedding_terms())
    }

    /// Whether every required field is present and non-empty
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.bio.trim().is_empty() && !self.skills.is_empty()
    }
}

/// AI agent profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AIProfile {
    pub name: String,
    pub description: String,
    pub capabilities: SkillSet,
}

impl AIProfile {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        capabilities: impl Into<SkillSet>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            capabilities: capabilities.into(),
        }
    }

    /// Text fed to the embedding model: description followed by the capability terms
    pub fn embedding_text(&self) -> String {
        format!("{} {}", self.description, self.capabilities.embedding_terms())
    }

    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.description.trim().is_empty()
            && !self.capabilities.is_empty()
    }
}

/// Relative importance of each score component
///
/// The weights are not required to sum to 1; callers may surface a warning
/// but scoring proceeds either way.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct MatchWeights {
    #[validate(range(min = 0.0, max = 1.0))]
    pub skill_similarity: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub complementarity: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub domain_alignment: f64,
}

impl MatchWeights {
    pub fn sum(&self) -> f64 {
        self.skill_similarity + self.complementarity + self.domain_alignment
    }

    pub fn is_normalized(&self) -> bool {
        (self.sum() - 1.0).abs() < 1e-9
    }
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            skill_similarity: 0.4,
            complementarity: 0.4,
            domain_alignment: 0.2,
        }
    }
}

/// Scored (human, AI) pair produced by one matching run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub human: String,
    pub ai: String,
    pub total_score: f64,
    pub skill_similarity: f64,
    pub complementarity: f64,
    pub domain_alignment: f64,
    pub feedback_adjustment: f64,
    pub explanation: String,
}

/// A single accepted or rejected match judgment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub human: String,
    pub ai: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub positive: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

impl FeedbackRecord {
    pub fn new(human: impl Into<String>, ai: impl Into<String>, positive: bool, reason: Option<String>) -> Self {
        Self {
            human: human.into(),
            ai: ai.into(),
            timestamp: Utc::now(),
            positive,
            reason,
        }
    }

    /// Whether this judgment concerns the given pair
    pub fn is_for(&self, human: &str, ai: &str) -> bool {
        self.human == human && self.ai == ai
    }
}

/// Accepts RFC 3339 timestamps as well as naive ISO-8601 ones, read as UTC
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(serde::de::Error::custom)
}

/// Everything the feedback store persists
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackData {
    #[serde(default)]
    pub positive_matches: Vec<FeedbackRecord>,
    #[serde(default)]
    pub negative_matches: Vec<FeedbackRecord>,
    #[serde(default)]
    pub skill_weights: BTreeMap<String, f64>,
}

impl FeedbackData {
    pub fn is_empty(&self) -> bool {
        self.positive_matches.is_empty()
            && self.negative_matches.is_empty()
            && self.skill_weights.is_empty()
    }

    pub fn total(&self) -> usize {
        self.positive_matches.len() + self.negative_matches.len()
    }

    /// Align each record's `positive` flag with the list that holds it
    pub fn normalize_polarity(&mut self) {
        for record in &mut self.positive_matches {
            record.positive = true;
        }
        for record in &mut self.negative_matches {
            record.positive = false;
        }
    }

    /// Rebuild skill weights from positive judgments on the given profiles
    ///
    /// Each positive record adds one occurrence for every flat-listed skill of
    /// the matching human; the tallies are then normalized by their sum.
    /// Records naming a human absent from `profiles` contribute nothing, and
    /// skills that were not tallied keep whatever weight they already had.
    pub fn recompute_skill_weights(&mut self, profiles: &[HumanProfile]) {
        let mut counts: BTreeMap<&str, u32> = BTreeMap::new();

        for record in &self.positive_matches {
            let Some(profile) = profiles.iter().find(|p| p.name == record.human) else {
                continue;
            };
            if let Some(skills) = profile.skills.flat_terms() {
                for skill in skills {
                    *counts.entry(skill.as_str()).or_insert(0) += 1;
                }
            }
        }

        let total: u32 = counts.values().sum();
        if total == 0 {
            return;
        }

        for (skill, count) in counts {
            self.skill_weights
                .insert(skill.to_string(), f64::from(count) / f64::from(total));
        }
    }
}

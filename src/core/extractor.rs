use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use crate::models::SkillSet;

/// Known technical skills, grouped by family
const TECHNICAL_SKILLS: &[(&str, &[&str])] = &[
    ("programming", &["python", "java", "javascript", "c++", "ruby", "go", "rust"]),
    ("ai_ml", &["machine learning", "deep learning", "neural networks", "nlp", "computer vision"]),
    ("data", &["data analysis", "data science", "big data", "sql", "nosql"]),
    ("cloud", &["aws", "azure", "gcp", "cloud computing", "devops"]),
    ("web", &["web development", "frontend", "backend", "full stack"]),
];

const DOMAIN_KEYWORDS: &[&str] = &[
    "healthcare", "finance", "education", "retail", "manufacturing", "cloud", "web", "ai", "ml",
];

const TOOL_KEYWORDS: &[&str] = &["tensorflow", "pytorch", "docker", "kubernetes", "figma", "adobe xd"];

const TECHNIQUE_KEYWORDS: &[&str] = &[
    "regression", "classification", "clustering", "simulation", "optimization",
];

static SOFT_SKILLS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"leadership|communication|teamwork|problem-solving|creativity|adaptability|time management|collaboration",
    )
    .expect("soft skill pattern is valid")
});

static TASK_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"can ([a-z ]+)", r"able to ([a-z ]+)", r"capable of ([a-z ]+)"]
        .iter()
        .map(|p| Regex::new(p).expect("task pattern is valid"))
        .collect()
});

static LIMITATION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"cannot ([a-z ]+)", r"unable to ([a-z ]+)", r"limited in ([a-z ]+)"]
        .iter()
        .map(|p| Regex::new(p).expect("limitation pattern is valid"))
        .collect()
});

/// Split comma-separated form input into trimmed, non-empty terms
pub fn parse_term_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_string)
        .collect()
}

/// Keyword spotting over free-text profile descriptions
///
/// Matching is plain case-insensitive substring search, so short keywords
/// such as `go` or `ai` also fire inside longer words.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkillExtractor;

impl SkillExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Categorized skills of a human expert: technical, soft_skills, domains, tools
    pub fn extract_skills(&self, text: &str) -> SkillSet {
        let text = text.to_lowercase();

        let technical: Vec<String> = TECHNICAL_SKILLS
            .iter()
            .flat_map(|(_, skills)| skills.iter())
            .filter(|skill| text.contains(*skill))
            .map(|skill| skill.to_string())
            .collect();

        let soft_skills: Vec<String> = SOFT_SKILLS
            .find_iter(&text)
            .map(|m| m.as_str().to_string())
            .collect();

        let mut categories = BTreeMap::new();
        categories.insert("technical".to_string(), technical);
        categories.insert("soft_skills".to_string(), soft_skills);
        categories.insert("domains".to_string(), keywords_in(&text, DOMAIN_KEYWORDS));
        categories.insert("tools".to_string(), keywords_in(&text, TOOL_KEYWORDS));
        SkillSet::Categorized(categories)
    }

    /// Categorized capabilities of an AI agent: tasks, domains, techniques, limitations
    pub fn extract_ai_capabilities(&self, text: &str) -> SkillSet {
        let text = text.to_lowercase();

        let mut categories = BTreeMap::new();
        categories.insert("tasks".to_string(), captures_in(&text, &TASK_PATTERNS));
        categories.insert("domains".to_string(), keywords_in(&text, DOMAIN_KEYWORDS));
        categories.insert("techniques".to_string(), keywords_in(&text, TECHNIQUE_KEYWORDS));
        categories.insert(
            "limitations".to_string(),
            captures_in(&text, &LIMITATION_PATTERNS),
        );
        SkillSet::Categorized(categories)
    }
}

fn keywords_in(text: &str, keywords: &[&str]) -> Vec<String> {
    keywords
        .iter()
        .filter(|keyword| text.contains(*keyword))
        .map(|keyword| keyword.to_string())
        .collect()
}

fn captures_in(text: &str, patterns: &[Regex]) -> Vec<String> {
    patterns
        .iter()
        .flat_map(|pattern| pattern.captures_iter(text))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(set: &SkillSet, name: &str) -> Vec<String> {
        match set {
            SkillSet::Categorized(categories) => categories.get(name).cloned().unwrap_or_default(),
            SkillSet::FlatList(_) => panic!("expected categorized skills"),
        }
    }

    #[test]
    fn test_parse_term_list() {
        assert_eq!(
            parse_term_list(" python , machine learning,,  "),
            vec!["python".to_string(), "machine learning".to_string()]
        );
        assert!(parse_term_list("").is_empty());
    }

    #[test]
    fn test_extract_skills() {
        let extractor = SkillExtractor::new();
        let skills = extractor.extract_skills(
            "Data scientist in Healthcare using Python, SQL and PyTorch. Strong leadership and teamwork.",
        );

        let technical = category(&skills, "technical");
        assert!(technical.contains(&"python".to_string()));
        assert!(technical.contains(&"sql".to_string()));
        assert_eq!(category(&skills, "soft_skills"), vec!["leadership", "teamwork"]);
        assert!(category(&skills, "domains").contains(&"healthcare".to_string()));
        assert_eq!(category(&skills, "tools"), vec!["pytorch"]);
    }

    #[test]
    fn test_extract_skills_keeps_empty_categories() {
        let skills = SkillExtractor::new().extract_skills("");
        match skills {
            SkillSet::Categorized(categories) => {
                assert_eq!(categories.len(), 4);
                assert!(categories.values().all(|v| v.is_empty()));
            }
            SkillSet::FlatList(_) => panic!("expected categorized skills"),
        }
    }

    #[test]
    fn test_extract_ai_capabilities() {
        let extractor = SkillExtractor::new();
        let caps = extractor.extract_ai_capabilities(
            "This agent can forecast demand in retail. It is able to run regression models. It is limited in image generation.",
        );

        assert_eq!(
            category(&caps, "tasks"),
            vec!["forecast demand in retail", "run regression models"]
        );
        assert_eq!(category(&caps, "techniques"), vec!["regression"]);
        assert_eq!(category(&caps, "limitations"), vec!["image generation"]);
        assert!(category(&caps, "domains").contains(&"retail".to_string()));
    }
}

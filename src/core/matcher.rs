use std::sync::Arc;

use crate::core::{
    embedding::{Embedder, EmbeddingError},
    scoring::{feedback_adjustment, ScoreBreakdown},
    similarity::{complementarity, cosine_similarity, domain_alignment},
};
use crate::models::{AIProfile, FeedbackData, HumanProfile, MatchResult, MatchWeights};

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Embed every profile once
/// 2. Score every human × AI pair (similarity, complementarity, domain alignment)
/// 3. Apply the feedback adjustment and weighted composite
/// 4. Rank each human's matches
#[derive(Clone)]
pub struct Matcher {
    embedder: Arc<dyn Embedder>,
}

impl Matcher {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    pub fn model_name(&self) -> &str {
        self.embedder.model_name()
    }

    /// Score every human against every AI agent
    ///
    /// Each human's results are sorted by total score, highest first; ties
    /// keep the order of `ais`. The returned list is those per-human blocks
    /// concatenated in the order of `humans`, not one global ranking.
    ///
    /// # Arguments
    /// * `humans` - Human expert profiles, assumed complete and uniquely named
    /// * `ais` - AI agent profiles, same assumptions
    /// * `weights` - Component weights for the composite score
    /// * `feedback` - Snapshot of accumulated feedback for this run
    pub fn find_matches(
        &self,
        humans: &[HumanProfile],
        ais: &[AIProfile],
        weights: &MatchWeights,
        feedback: &FeedbackData,
    ) -> Result<Vec<MatchResult>, EmbeddingError> {
        // Stage 1: one embedding per profile, outside the pairwise loop
        let human_embeddings = humans
            .iter()
            .map(|h| self.embedder.embed(&h.embedding_text()))
            .collect::<Result<Vec<_>, _>>()?;
        let ai_embeddings = ais
            .iter()
            .map(|a| self.embedder.embed(&a.embedding_text()))
            .collect::<Result<Vec<_>, _>>()?;

        let mut matches = Vec::with_capacity(humans.len() * ais.len());

        for (human, human_embedding) in humans.iter().zip(&human_embeddings) {
            // Stages 2 & 3: score the full row for this human
            let mut human_matches: Vec<MatchResult> = ais
                .iter()
                .zip(&ai_embeddings)
                .map(|(ai, ai_embedding)| {
                    let breakdown = ScoreBreakdown {
                        skill_similarity: cosine_similarity(human_embedding, ai_embedding),
                        complementarity: complementarity(&human.skills, &ai.capabilities),
                        domain_alignment: domain_alignment(&human.skills, &ai.capabilities),
                        feedback_adjustment: feedback_adjustment(feedback, human, ai),
                    };

                    MatchResult {
                        human: human.name.clone(),
                        ai: ai.name.clone(),
                        total_score: breakdown.total(weights),
                        skill_similarity: breakdown.skill_similarity,
                        complementarity: breakdown.complementarity,
                        domain_alignment: breakdown.domain_alignment,
                        feedback_adjustment: breakdown.feedback_adjustment,
                        explanation: breakdown.explanation(),
                    }
                })
                .collect();

            // Stage 4: stable sort by score (descending)
            human_matches.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));

            matches.extend(human_matches);
        }

        tracing::debug!(
            humans = humans.len(),
            ais = ais.len(),
            results = matches.len(),
            "Matching run complete"
        );

        Ok(matches)
    }
}

impl std::fmt::Debug for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matcher")
            .field("model", &self.embedder.model_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::embedding::HashingEmbedder;
    use crate::models::FeedbackRecord;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn human(name: &str, bio: &str, skills: &[&str]) -> HumanProfile {
        HumanProfile::new(name, bio, skills.iter().map(|s| s.to_string()).collect::<Vec<_>>())
    }

    fn ai(name: &str, description: &str, caps: &[&str]) -> AIProfile {
        AIProfile::new(name, description, caps.iter().map(|s| s.to_string()).collect::<Vec<_>>())
    }

    fn matcher() -> Matcher {
        Matcher::new(Arc::new(HashingEmbedder::default()))
    }

    #[test]
    fn test_full_cross_product() {
        let humans = vec![
            human("Alice", "ML engineer", &["python"]),
            human("Bob", "Designer", &["figma"]),
        ];
        let ais = vec![
            ai("Bot1", "regression", &["python"]),
            ai("Bot2", "layout", &["figma"]),
            ai("Bot3", "translation", &["nlp"]),
        ];

        let results = matcher()
            .find_matches(&humans, &ais, &MatchWeights::default(), &FeedbackData::default())
            .unwrap();

        assert_eq!(results.len(), 6);
        assert!(results[..3].iter().all(|m| m.human == "Alice"));
        assert!(results[3..].iter().all(|m| m.human == "Bob"));
    }

    #[test]
    fn test_matches_sorted_per_human() {
        let humans = vec![human("Alice", "python developer", &["python", "sql"])];
        let ais = vec![
            ai("Painter", "watercolor artist", &["painting"]),
            ai("Coder", "python developer", &["python", "sql"]),
        ];

        let results = matcher()
            .find_matches(&humans, &ais, &MatchWeights::default(), &FeedbackData::default())
            .unwrap();

        assert_eq!(results.len(), 2);
        assert!(results[0].total_score >= results[1].total_score);
    }

    #[test]
    fn test_ties_keep_ai_order() {
        let humans = vec![human("Alice", "bio", &["x"])];
        let ais = vec![
            ai("First", "same", &["y"]),
            ai("Second", "same", &["y"]),
            ai("Third", "same", &["y"]),
        ];

        let results = matcher()
            .find_matches(&humans, &ais, &MatchWeights::default(), &FeedbackData::default())
            .unwrap();

        let order: Vec<_> = results.iter().map(|m| m.ai.as_str()).collect();
        assert_eq!(order, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_negative_feedback_demotes_pair() {
        let humans = vec![human("Alice", "bio", &["x"])];
        let ais = vec![ai("Bot1", "same", &["y"]), ai("Bot2", "same", &["y"])];

        let mut feedback = FeedbackData::default();
        feedback
            .negative_matches
            .push(FeedbackRecord::new("Alice", "Bot1", false, None));

        let results = matcher()
            .find_matches(&humans, &ais, &MatchWeights::default(), &feedback)
            .unwrap();

        assert_eq!(results[0].ai, "Bot2");
        assert_eq!(results[1].ai, "Bot1");
        assert!((results[1].feedback_adjustment + 0.1).abs() < 1e-12);
        assert!(results[1].explanation.ends_with("Negative historical feedback"));
    }

    struct CountingEmbedder {
        calls: AtomicUsize,
    }

    impl Embedder for CountingEmbedder {
        fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            HashingEmbedder::new(8).embed(text)
        }

        fn dimensions(&self) -> usize {
            8
        }

        fn model_name(&self) -> &str {
            "counting"
        }
    }

    #[test]
    fn test_embeds_each_profile_once() {
        let embedder = Arc::new(CountingEmbedder {
            calls: AtomicUsize::new(0),
        });
        let matcher = Matcher::new(embedder.clone());

        let humans = vec![human("A", "a", &["a"]), human("B", "b", &["b"])];
        let ais = vec![ai("X", "x", &["x"]), ai("Y", "y", &["y"]), ai("Z", "z", &["z"])];

        matcher
            .find_matches(&humans, &ais, &MatchWeights::default(), &FeedbackData::default())
            .unwrap();

        assert_eq!(embedder.calls.load(Ordering::SeqCst), 5);
    }

    /// Emits NaN for any text mentioning "corrupt"
    struct NanEmbedder;

    impl Embedder for NanEmbedder {
        fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
            if text.contains("corrupt") {
                Ok(vec![f32::NAN; 8])
            } else {
                HashingEmbedder::new(8).embed(text)
            }
        }

        fn dimensions(&self) -> usize {
            8
        }

        fn model_name(&self) -> &str {
            "nan"
        }
    }

    #[test]
    fn test_nan_score_keeps_total_order() {
        let matcher = Matcher::new(Arc::new(NanEmbedder));
        let humans = vec![human("Alice", "python developer", &["python"])];
        let ais = vec![
            ai("Low", "watercolor", &["python", "painting"]),
            ai("Broken", "corrupt", &["y"]),
            ai("High", "python developer", &["rust"]),
            ai("Mid", "python", &["python"]),
        ];

        let results = matcher
            .find_matches(&humans, &ais, &MatchWeights::default(), &FeedbackData::default())
            .unwrap();

        assert_eq!(results.len(), 4);
        let finite: Vec<f64> = results
            .iter()
            .map(|m| m.total_score)
            .filter(|s| !s.is_nan())
            .collect();
        assert_eq!(finite.len(), 3);
        assert!(finite.windows(2).all(|w| w[0] >= w[1]));
    }

    struct BrokenEmbedder;

    impl Embedder for BrokenEmbedder {
        fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
            Err(EmbeddingError::Inference("boom".to_string()))
        }

        fn dimensions(&self) -> usize {
            0
        }

        fn model_name(&self) -> &str {
            "broken"
        }
    }

    #[test]
    fn test_embedding_failure_propagates() {
        let matcher = Matcher::new(Arc::new(BrokenEmbedder));
        let result = matcher.find_matches(
            &[human("A", "a", &["a"])],
            &[ai("X", "x", &["x"])],
            &MatchWeights::default(),
            &FeedbackData::default(),
        );
        assert!(matches!(result, Err(EmbeddingError::Inference(_))));
    }
}

use std::collections::BTreeSet;

use crate::models::SkillSet;

/// Cosine similarity between two embeddings, in [-1, 1]
///
/// Vectors of different length, or where either vector is all zeros,
/// score 0 instead of dividing by zero.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}

/// |A ∩ B| / |A ∪ B|, or `None` when both sets are empty
#[inline]
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> Option<f64> {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        return None;
    }
    Some(intersection as f64 / union as f64)
}

/// How much the two skill sets cover different ground, in [0, 1]
///
/// Categorized sets are flattened first. Two empty sets score 0.
pub fn complementarity(human_skills: &SkillSet, ai_capabilities: &SkillSet) -> f64 {
    jaccard(&human_skills.flatten(), &ai_capabilities.flatten())
        .map(|similarity| 1.0 - similarity)
        .unwrap_or(0.0)
}

/// Overlap between the declared domains of both sides, in [0, 1]
pub fn domain_alignment(human_skills: &SkillSet, ai_capabilities: &SkillSet) -> f64 {
    let human_domains = human_skills.domain_terms();
    let ai_domains = ai_capabilities.domain_terms();

    let intersection = human_domains.intersection(&ai_domains).count();
    let union = human_domains.union(&ai_domains).count();

    intersection as f64 / union.max(1) as f64
}

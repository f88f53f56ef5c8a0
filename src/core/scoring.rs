use crate::models::{AIProfile, FeedbackData, HumanProfile, MatchWeights};

/// Adjustment per direct judgment on the same pair
pub const PAIR_FEEDBACK_STEP: f64 = 0.1;
/// Scale applied to each learned skill weight
pub const SKILL_WEIGHT_FACTOR: f64 = 0.05;

const HIGH_THRESHOLD: f64 = 0.7;
const MODERATE_THRESHOLD: f64 = 0.4;

/// Component scores for a single (human, AI) pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub skill_similarity: f64,
    pub complementarity: f64,
    pub domain_alignment: f64,
    pub feedback_adjustment: f64,
}

impl ScoreBreakdown {
    /// Weighted composite, amplified or damped by the feedback adjustment
    ///
    /// score = (w_sim * sim + w_comp * comp + w_dom * dom) * (1 + adjustment)
    ///
    /// The multiplier is not clamped: enough negative feedback drives it
    /// below zero.
    pub fn total(&self, weights: &MatchWeights) -> f64 {
        let base = weights.skill_similarity * self.skill_similarity
            + weights.complementarity * self.complementarity
            + weights.domain_alignment * self.domain_alignment;

        base * (1.0 + self.feedback_adjustment)
    }

    pub fn explanation(&self) -> String {
        generate_explanation(
            self.skill_similarity,
            self.complementarity,
            self.domain_alignment,
            self.feedback_adjustment,
        )
    }
}

/// Score correction learned from past judgments
///
/// Every positive record for this exact pair adds 0.1 and every negative one
/// subtracts 0.1, without a cap. Each flat-listed skill of the human with a
/// learned weight then adds `weight * 0.05`.
pub fn feedback_adjustment(feedback: &FeedbackData, human: &HumanProfile, ai: &AIProfile) -> f64 {
    let mut adjustment = 0.0;

    for record in &feedback.positive_matches {
        if record.is_for(&human.name, &ai.name) {
            adjustment += PAIR_FEEDBACK_STEP;
        }
    }

    for record in &feedback.negative_matches {
        if record.is_for(&human.name, &ai.name) {
            adjustment -= PAIR_FEEDBACK_STEP;
        }
    }

    if let Some(skills) = human.skills.flat_terms() {
        for skill in skills {
            if let Some(weight) = feedback.skill_weights.get(skill) {
                adjustment += weight * SKILL_WEIGHT_FACTOR;
            }
        }
    }

    adjustment
}

/// Human-readable summary of why a pair scored the way it did
pub fn generate_explanation(
    skill_similarity: f64,
    complementarity: f64,
    domain_alignment: f64,
    feedback_adjustment: f64,
) -> String {
    let mut clauses = Vec::with_capacity(4);

    clauses.push(if skill_similarity > HIGH_THRESHOLD {
        "High skill similarity"
    } else if skill_similarity > MODERATE_THRESHOLD {
        "Moderate skill similarity"
    } else {
        "Low skill similarity"
    });

    clauses.push(if complementarity > HIGH_THRESHOLD {
        "Highly complementary skills"
    } else if complementarity > MODERATE_THRESHOLD {
        "Moderately complementary skills"
    } else {
        "Low skill complementarity"
    });

    clauses.push(if domain_alignment > HIGH_THRESHOLD {
        "Strong domain alignment"
    } else if domain_alignment > MODERATE_THRESHOLD {
        "Moderate domain alignment"
    } else {
        "Low domain alignment"
    });

    if feedback_adjustment > 0.0 {
        clauses.push("Positive historical feedback");
    } else if feedback_adjustment < 0.0 {
        clauses.push("Negative historical feedback");
    }

    clauses.join(". ")
}

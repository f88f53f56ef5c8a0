// Core algorithm exports
pub mod embedding;
pub mod extractor;
pub mod matcher;
pub mod scoring;
pub mod similarity;

pub use embedding::{build_embedder, CachedEmbedder, Embedder, EmbeddingError, EmbeddingProvider, HashingEmbedder};
pub use extractor::{parse_term_list, SkillExtractor};
pub use matcher::Matcher;
pub use scoring::{feedback_adjustment, generate_explanation, ScoreBreakdown};
pub use similarity::{complementarity, cosine_similarity, domain_alignment, jaccard};

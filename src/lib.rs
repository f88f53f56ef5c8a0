//! IntelliBridge - explainable matching of human experts with AI agents
//!
//! Every human is scored against every AI agent using semantic similarity of
//! their profile texts, complementarity of their skill sets and alignment of
//! their domains. Accumulated user feedback nudges scores for known pairs and
//! for skills that keep appearing in accepted matches.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{Embedder, HashingEmbedder, Matcher, SkillExtractor};
pub use models::{AIProfile, FeedbackData, HumanProfile, MatchResult, MatchWeights, SkillSet};
pub use services::{FeedbackStore, InMemoryBackend, JsonFileBackend};

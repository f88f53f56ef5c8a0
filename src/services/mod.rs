// Service exports
pub mod feedback;
pub mod sample;
pub mod storage;

pub use feedback::{FeedbackError, FeedbackStore};
pub use sample::{SampleData, SampleDataError};
pub use storage::{FeedbackBackend, InMemoryBackend, JsonFileBackend};

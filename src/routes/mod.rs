// Route exports
pub mod feedback;
pub mod matches;
pub mod profiles;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use actix_web::{http::StatusCode, web, HttpResponse};

use crate::core::Matcher;
use crate::models::{ErrorResponse, HumanProfile, MatchWeights};
use crate::services::FeedbackStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub matcher: Matcher,
    pub feedback: Arc<Mutex<FeedbackStore>>,
    /// Human batch of the most recent matching run, used for skill weighting
    pub current_humans: Arc<Mutex<Vec<HumanProfile>>>,
    pub default_weights: MatchWeights,
    pub sample_path: PathBuf,
}

impl AppState {
    pub fn new(
        matcher: Matcher,
        feedback: FeedbackStore,
        default_weights: MatchWeights,
        sample_path: PathBuf,
    ) -> Self {
        Self {
            matcher,
            feedback: Arc::new(Mutex::new(feedback)),
            current_humans: Arc::new(Mutex::new(Vec::new())),
            default_weights,
            sample_path,
        }
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure)
            .configure(feedback::configure)
            .configure(profiles::configure),
    );
}

pub(crate) fn error_response(status: StatusCode, error: &str, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code: status.as_u16(),
    })
}

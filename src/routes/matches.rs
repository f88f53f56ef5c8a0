use std::collections::HashSet;

use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{FindMatchesRequest, FindMatchesResponse, HealthResponse, MatchWeights};
use crate::routes::{error_response, AppState};
use crate::services::{FeedbackError, SampleData, SampleDataError};

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/find", web::post().to(find_matches))
        .route("/sample", web::get().to(sample_data));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        embedding_model: state.matcher.model_name().to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Find matches endpoint
///
/// POST /api/v1/matches/find
///
/// Request body:
/// ```json
/// {
///   "human_profiles": [{"name": "Alice", "bio": "...", "skills": ["python"]}],
///   "ai_profiles": [{"name": "Bot1", "description": "...", "capabilities": ["nlp"]}],
///   "weights": {"skill_similarity": 0.4, "complementarity": 0.4, "domain_alignment": 0.2}
/// }
/// ```
async fn find_matches(
    state: web::Data<AppState>,
    req: web::Json<FindMatchesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for find_matches request: {:?}", errors);
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    let req = req.into_inner();
    let weights = req.weights.unwrap_or(state.default_weights);

    // Incomplete profiles never reach the matcher
    let submitted = req.human_profiles.len() + req.ai_profiles.len();
    let humans: Vec<_> = req.human_profiles.into_iter().filter(|h| h.is_complete()).collect();
    let ais: Vec<_> = req.ai_profiles.into_iter().filter(|a| a.is_complete()).collect();
    let dropped_profiles = submitted - humans.len() - ais.len();
    if dropped_profiles > 0 {
        tracing::warn!("Dropped {} incomplete profiles from matching batch", dropped_profiles);
    }

    if let Some(name) = first_duplicate(humans.iter().map(|h| h.name.as_str())) {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Duplicate profile",
            format!("Human profile name '{}' appears more than once", name),
        );
    }
    if let Some(name) = first_duplicate(ais.iter().map(|a| a.name.as_str())) {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Duplicate profile",
            format!("AI profile name '{}' appears more than once", name),
        );
    }

    tracing::info!(
        "Matching {} humans against {} AI agents",
        humans.len(),
        ais.len()
    );

    // Snapshot the feedback off the worker; a write may hold the store lock
    let store = state.feedback.clone();
    let matcher = state.matcher.clone();
    let batch = humans.clone();
    let result = web::block(move || {
        let feedback = store.lock().map_err(|_| FeedbackError::LockPoisoned)?.snapshot();
        Ok::<_, FeedbackError>(matcher.find_matches(&batch, &ais, &weights, &feedback))
    })
    .await;

    let matches = match result {
        Ok(Ok(Ok(matches))) => matches,
        Ok(Ok(Err(e))) => {
            tracing::error!("Matching failed: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Matching failed", e.to_string());
        }
        Ok(Err(e)) => {
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Feedback unavailable", e.to_string());
        }
        Err(e) => {
            tracing::error!("Matching task failed: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Matching failed", e.to_string());
        }
    };

    if !humans.is_empty() {
        match state.current_humans.lock() {
            Ok(mut current) => *current = humans,
            Err(_) => {
                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Matching batch unavailable",
                    "Current profile batch lock poisoned",
                )
            }
        }
    }

    let response = FindMatchesResponse {
        total_results: matches.len(),
        matches,
        dropped_profiles,
        weights_warning: weights_warning(&weights),
    };

    HttpResponse::Ok().json(response)
}

/// Seed profiles endpoint
///
/// GET /api/v1/sample
async fn sample_data(state: web::Data<AppState>) -> impl Responder {
    match SampleData::load(&state.sample_path) {
        Ok(data) => HttpResponse::Ok().json(data),
        Err(e @ SampleDataError::NotFound(_)) => {
            error_response(StatusCode::NOT_FOUND, "Sample data not found", e.to_string())
        }
        Err(e) => {
            tracing::error!("Failed to load sample data: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Invalid sample data", e.to_string())
        }
    }
}

fn first_duplicate<'a>(mut names: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut seen = HashSet::new();
    names.find(|name| !seen.insert(*name))
}

fn weights_warning(weights: &MatchWeights) -> Option<String> {
    if weights.is_normalized() {
        None
    } else {
        Some(format!(
            "Weights sum to {:.2} instead of 1.0; scores are not normalized",
            weights.sum()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_duplicate() {
        assert_eq!(first_duplicate(["a", "b", "a"].into_iter()), Some("a"));
        assert_eq!(first_duplicate(["a", "b"].into_iter()), None);
    }

    #[test]
    fn test_weights_warning() {
        assert!(weights_warning(&MatchWeights::default()).is_none());

        let heavy = MatchWeights {
            skill_similarity: 1.0,
            complementarity: 1.0,
            domain_alignment: 0.0,
        };
        let warning = weights_warning(&heavy).unwrap();
        assert!(warning.contains("2.00"));
    }
}

use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{
    FeedbackSummaryResponse, SkillWeightEntry, SubmitFeedbackRequest, SubmitFeedbackResponse,
};
use crate::routes::{error_response, AppState};
use crate::services::{FeedbackError, FeedbackStore};

/// Judgments listed in the summary
const RECENT_FEEDBACK_LIMIT: usize = 5;

/// Configure all feedback routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/feedback")
            .route(web::post().to(submit_feedback))
            .route(web::get().to(feedback_summary))
            .route(web::delete().to(clear_feedback)),
    );
}

/// Record feedback endpoint
///
/// POST /api/v1/feedback
///
/// Request body:
/// ```json
/// {
///   "human": "Alice",
///   "ai": "Bot1",
///   "positive": true,
///   "reason": "optional"
/// }
/// ```
async fn submit_feedback(
    state: web::Data<AppState>,
    req: web::Json<SubmitFeedbackRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    let reason = req.reason();
    let req = req.into_inner();

    let profiles = match req.human_profiles {
        Some(profiles) => profiles,
        None => match state.current_humans.lock() {
            Ok(current) => current.clone(),
            Err(_) => {
                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Matching batch unavailable",
                    "Current profile batch lock poisoned",
                )
            }
        },
    };

    let store = state.feedback.clone();
    let result = web::block(move || {
        let mut store = store.lock().map_err(|_| FeedbackError::LockPoisoned)?;
        store.record(&req.human, &req.ai, req.positive, reason, &profiles)
    })
    .await;

    match result {
        Ok(Ok(record)) => HttpResponse::Ok().json(SubmitFeedbackResponse {
            success: true,
            record,
        }),
        Ok(Err(e)) => error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to record feedback", e.to_string()),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to record feedback", e.to_string()),
    }
}

/// Feedback summary endpoint
///
/// GET /api/v1/feedback
async fn feedback_summary(state: web::Data<AppState>) -> impl Responder {
    // The store lock may be held by a write in progress, so wait for it off the worker
    let store = state.feedback.clone();
    let result = web::block(move || {
        let store = store.lock().map_err(|_| FeedbackError::LockPoisoned)?;
        Ok::<_, FeedbackError>(summarize(&store))
    })
    .await;

    match result {
        Ok(Ok(summary)) => HttpResponse::Ok().json(summary),
        Ok(Err(e)) => error_response(StatusCode::INTERNAL_SERVER_ERROR, "Feedback unavailable", e.to_string()),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, "Feedback unavailable", e.to_string()),
    }
}

fn summarize(store: &FeedbackStore) -> FeedbackSummaryResponse {
    let mut skill_weights: Vec<SkillWeightEntry> = store
        .skill_weights()
        .iter()
        .map(|(skill, weight)| SkillWeightEntry {
            skill: skill.clone(),
            weight: *weight,
        })
        .collect();
    skill_weights.sort_by(|a, b| b.weight.total_cmp(&a.weight));

    FeedbackSummaryResponse {
        total_feedback: store.data().total(),
        positive_matches: store.positive_count(),
        negative_matches: store.negative_count(),
        skill_weights,
        recent: store.recent(RECENT_FEEDBACK_LIMIT),
    }
}

/// Clear feedback endpoint
///
/// DELETE /api/v1/feedback
async fn clear_feedback(state: web::Data<AppState>) -> impl Responder {
    let store = state.feedback.clone();
    let result = web::block(move || {
        let mut store = store.lock().map_err(|_| FeedbackError::LockPoisoned)?;
        store.clear()
    })
    .await;

    match result {
        Ok(Ok(())) => HttpResponse::Ok().json(serde_json::json!({ "success": true })),
        Ok(Err(e)) => error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to clear feedback", e.to_string()),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to clear feedback", e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::InMemoryBackend;

    #[test]
    fn test_summary_orders_weights_heaviest_first() {
        let mut store = FeedbackStore::open(Box::new(InMemoryBackend::new())).unwrap();
        let batch = vec![
            crate::models::HumanProfile::new("Alice", "bio", vec!["python".to_string(), "ml".to_string()]),
            crate::models::HumanProfile::new("Bob", "bio", vec!["python".to_string()]),
        ];
        store.record("Alice", "Bot1", true, None, &batch).unwrap();
        store.record("Bob", "Bot1", true, None, &batch).unwrap();

        let summary = summarize(&store);

        assert_eq!(summary.total_feedback, 2);
        let skills: Vec<_> = summary.skill_weights.iter().map(|e| e.skill.as_str()).collect();
        assert_eq!(skills, vec!["python", "ml"]);
        assert_eq!(summary.recent.len(), 2);
    }
}

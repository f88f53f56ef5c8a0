use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;

use crate::core::SkillExtractor;
use crate::models::{AIProfileForm, ExtractRequest, ExtractResponse, HumanProfileForm, ProfileKind};
use crate::routes::error_response;

/// Configure profile form routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/profiles/human", web::post().to(create_human_profile))
        .route("/profiles/ai", web::post().to(create_ai_profile))
        .route("/profiles/extract", web::post().to(extract_skills));
}

/// Normalize a human expert form
///
/// POST /api/v1/profiles/human
async fn create_human_profile(form: web::Json<HumanProfileForm>) -> impl Responder {
    let profile = form.into_inner().into_profile();
    if !profile.is_complete() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Incomplete profile",
            "Name, bio and at least one skill are required",
        );
    }
    HttpResponse::Ok().json(profile)
}

/// Normalize an AI agent form
///
/// POST /api/v1/profiles/ai
async fn create_ai_profile(form: web::Json<AIProfileForm>) -> impl Responder {
    let profile = form.into_inner().into_profile();
    if !profile.is_complete() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Incomplete profile",
            "Name, description and at least one capability are required",
        );
    }
    HttpResponse::Ok().json(profile)
}

/// Spot skills or capabilities in free text
///
/// POST /api/v1/profiles/extract
async fn extract_skills(req: web::Json<ExtractRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    let extractor = SkillExtractor::new();
    let extracted = match req.kind {
        ProfileKind::Human => extractor.extract_skills(&req.text),
        ProfileKind::Ai => extractor.extract_ai_capabilities(&req.text),
    };

    HttpResponse::Ok().json(ExtractResponse { extracted })
}

use axum::{extract::State, Json};
use validator::Validate;

use crate::dto::ai_dto::{
    LessonRequest, LessonResponse, PlanResponse, QuizRequest, QuizResponse, VideoRequest,
    VideoResponse,
};
use crate::error::{Error, Result};
use crate::AppState;

#[axum::debug_handler]
pub async fn generate_plan(State(state): State<AppState>) -> Result<Json<PlanResponse>> {
    let scrape = state.workspace.load_scrape().await?.ok_or_else(|| {
        Error::BadRequest("No scraped data found. Run scraper first.".to_string())
    })?;

    let plan = state.planner.generate_outline(&scrape).await?;
    state.workspace.save_plan(&plan).await?;

    Ok(Json(PlanResponse {
        status: "planned".to_string(),
        plan,
    }))
}

#[axum::debug_handler]
pub async fn generate_lesson(
    State(state): State<AppState>,
    Json(req): Json<LessonRequest>,
) -> Result<Json<LessonResponse>> {
    req.validate()?;
    let scrape = state
        .workspace
        .load_scrape()
        .await?
        .ok_or_else(|| Error::BadRequest("No source data found".to_string()))?;

    tracing::info!(lesson = %req.lesson_title, module = %req.module_title, "Generating lesson");
    let content = state
        .planner
        .generate_lesson(&req.lesson_title, &req.module_title, &scrape.text_content)
        .await?;

    Ok(Json(LessonResponse {
        status: "generated".to_string(),
        content,
    }))
}

#[axum::debug_handler]
pub async fn generate_quiz(
    State(state): State<AppState>,
    Json(req): Json<QuizRequest>,
) -> Result<Json<QuizResponse>> {
    req.validate()?;
    let questions = state.planner.generate_quiz(&req.lesson_content).await?;
    if questions.is_empty() {
        tracing::warn!("Quiz generation produced no usable questions");
    }
    Ok(Json(QuizResponse {
        status: "generated".to_string(),
        questions,
    }))
}

#[axum::debug_handler]
pub async fn create_lesson_video(
    State(state): State<AppState>,
    Json(req): Json<VideoRequest>,
) -> Result<Json<VideoResponse>> {
    req.validate()?;
    let video_url = state.video.create(&req.title, &req.text_content).await?;
    Ok(Json(VideoResponse {
        status: "created".to_string(),
        video_url,
    }))
}

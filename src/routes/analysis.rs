use axum::{extract::State, response::Json};
use validator::Validate;

use crate::dto::quiz_dto::AnalyzeQuizRequest;
use crate::error::Result;
use crate::extractors::AppJson;
use crate::models::analysis::QuizAnalysis;
use crate::routes::quiz::check_questions;
use crate::AppState;

#[axum::debug_handler]
pub async fn analyze_quiz(
    State(state): State<AppState>,
    AppJson(payload): AppJson<AnalyzeQuizRequest>,
) -> Result<Json<QuizAnalysis>> {
    payload.validate()?;
    check_questions(&payload.questions)?;
    let analysis = state
        .analysis_service
        .analyze(&payload.topic, &payload.questions, &payload.answers)
        .await
        .map_err(|e| {
            tracing::warn!(topic = %payload.topic, kind = e.kind(), error = %e, "Quiz analysis failed");
            e
        })?;
    Ok(Json(analysis))
}

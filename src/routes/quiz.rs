use axum::{extract::State, response::Json};
use validator::Validate;

use crate::dto::quiz_dto::{
    CategoriesResponse, CategorySummary, GenerateQuizRequest, GenerateQuizResponse, Range,
    ScoreQuizRequest,
};
use crate::error::{Error, Result};
use crate::extractors::AppJson;
use crate::models::question::QuizQuestion;
use crate::models::quiz_config::{
    Category, DEFAULT_QUESTION_COUNT, MAX_QUESTION_COUNT, MAX_TIMER_MINUTES, MIN_QUESTION_COUNT,
    MIN_TIMER_MINUTES,
};
use crate::services::question_validator::validate_question;
use crate::services::scoring_service::{score_attempt, ScoreReport};
use crate::AppState;

#[axum::debug_handler]
pub async fn list_categories() -> Json<CategoriesResponse> {
    let categories = Category::ALL
        .iter()
        .map(|c| CategorySummary {
            label: c.label().to_string(),
            slug: c.slug().to_string(),
            description: c.description().to_string(),
        })
        .collect();

    Json(CategoriesResponse {
        categories,
        timer_minutes: Range {
            min: MIN_TIMER_MINUTES,
            max: MAX_TIMER_MINUTES,
        },
        question_count: Range {
            min: MIN_QUESTION_COUNT,
            max: MAX_QUESTION_COUNT,
        },
        default_question_count: DEFAULT_QUESTION_COUNT,
    })
}

#[axum::debug_handler]
pub async fn generate_quiz(
    State(state): State<AppState>,
    AppJson(payload): AppJson<GenerateQuizRequest>,
) -> Result<Json<GenerateQuizResponse>> {
    payload.validate()?;
    let category: Category = payload
        .category
        .parse()
        .map_err(|e: crate::models::quiz_config::UnknownCategory| Error::BadRequest(e.to_string()))?;

    let questions = state
        .generation_service
        .generate(category, payload.question_count)
        .await
        .map_err(|e| {
            tracing::warn!(%category, kind = e.kind(), error = %e, "Quiz generation failed");
            e
        })?;

    Ok(Json(GenerateQuizResponse { questions }))
}

#[axum::debug_handler]
pub async fn score_quiz(AppJson(payload): AppJson<ScoreQuizRequest>) -> Result<Json<ScoreReport>> {
    payload.validate()?;
    check_questions(&payload.questions)?;
    Ok(Json(score_attempt(&payload.questions, &payload.answers)))
}

/// Client-supplied questions must satisfy the same rules as generated ones.
pub(crate) fn check_questions(questions: &[QuizQuestion]) -> Result<()> {
    for (index, question) in questions.iter().enumerate() {
        validate_question(index, question).map_err(|e| Error::BadRequest(e.to_string()))?;
    }
    Ok(())
}

use crate::models::answer::UserAnswer;
use crate::models::question::QuizQuestion;
use crate::models::quiz_config::DEFAULT_QUESTION_COUNT;
use serde::{Deserialize, Serialize};
use validator::Validate;

fn default_question_count() -> u32 {
    DEFAULT_QUESTION_COUNT
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuizRequest {
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    #[serde(default = "default_question_count")]
    #[validate(range(min = 5, max = 20, message = "questionCount must be between 5 and 20"))]
    pub question_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateQuizResponse {
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScoreQuizRequest {
    #[validate(length(min = 1, message = "At least one question is required"))]
    pub questions: Vec<QuizQuestion>,
    #[serde(default)]
    pub answers: Vec<UserAnswer>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnalyzeQuizRequest {
    #[validate(length(min = 1, message = "Topic is required"))]
    pub topic: String,
    #[validate(length(min = 1, message = "At least one question is required"))]
    pub questions: Vec<QuizQuestion>,
    #[serde(default)]
    pub answers: Vec<UserAnswer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub label: String,
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Range {
    pub min: u32,
    pub max: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoriesResponse {
    pub categories: Vec<CategorySummary>,
    pub timer_minutes: Range,
    pub question_count: Range,
    pub default_question_count: u32,
}

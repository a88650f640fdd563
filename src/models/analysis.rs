use serde::{Deserialize, Serialize};

/// Narrative feedback on a finished attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnalysis {
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub total_questions: u32,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub feedback: String,
}

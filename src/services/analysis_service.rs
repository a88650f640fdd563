use crate::error::{Error, Result};
use crate::models::analysis::QuizAnalysis;
use crate::models::answer::UserAnswer;
use crate::models::question::QuizQuestion;
use crate::services::completion_client::{ChatMessage, ChatRequest, CompletionClient};
use crate::services::scoring_service::{score_attempt, ScoreReport};
use crate::utils::fence::strip_code_fence;
use std::sync::Arc;

const SYSTEM_PROMPT: &str = "You are a supportive tutor reviewing a learner's quiz attempt. \
Reply with a single JSON object only, without markdown fences or commentary.";

#[derive(Clone)]
pub struct AnalysisService {
    client: Arc<dyn CompletionClient>,
    model: String,
}

impl AnalysisService {
    pub fn new(client: Arc<dyn CompletionClient>, model: String) -> Self {
        Self { client, model }
    }

    /// Asks the model for strengths, weaknesses and study suggestions.
    ///
    /// `score` and `totalQuestions` in the result always come from local
    /// scoring, never from the model.
    pub async fn analyze(
        &self,
        topic: &str,
        questions: &[QuizQuestion],
        answers: &[UserAnswer],
    ) -> Result<QuizAnalysis> {
        let report = score_attempt(questions, answers);
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(analysis_prompt(topic, &report)),
            ],
            temperature: Some(0.4),
        };

        tracing::info!(topic, correct = report.correct_count, total = report.total_questions, "Requesting quiz analysis");
        let raw = self.client.complete(request).await?;
        let mut analysis: QuizAnalysis = serde_json::from_str(strip_code_fence(&raw))
            .map_err(|e| Error::Generation(format!("Analysis reply is not valid JSON: {}", e)))?;

        analysis.score = report.correct_count;
        analysis.total_questions = report.total_questions;
        Ok(analysis)
    }
}

fn analysis_prompt(topic: &str, report: &ScoreReport) -> String {
    let attempt: Vec<serde_json::Value> = report
        .review
        .iter()
        .map(|r| {
            serde_json::json!({
                "question": r.question,
                "selected": r.selected_option.as_ref().map(|o| o.text.as_str()),
                "correct": r.correct_option.as_ref().map(|o| o.text.as_str()),
                "isCorrect": r.is_correct,
            })
        })
        .collect();

    format!(
        "Analyze this quiz performance for topic \"{topic}\". The learner answered {correct} of {total} \
questions correctly. Unanswered questions have \"selected\": null. Attempt: {attempt}. \
Return ONLY valid JSON in this exact format: \
{{\"score\": number, \"totalQuestions\": number, \"strengths\": [\"text\"], \"weaknesses\": [\"text\"], \
\"suggestions\": [\"text\"], \"feedback\": \"motivational text\"}}",
        topic = topic,
        correct = report.correct_count,
        total = report.total_questions,
        attempt = serde_json::Value::Array(attempt),
    )
}

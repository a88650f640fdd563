use crate::models::answer::UserAnswer;
use crate::models::question::{QuizOption, QuizQuestion};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PerformanceTier {
    Excellent,
    Good,
    NeedsPractice,
}

impl PerformanceTier {
    pub fn for_percentage(percentage: u32) -> Self {
        match percentage {
            80..=u32::MAX => PerformanceTier::Excellent,
            60..=79 => PerformanceTier::Good,
            _ => PerformanceTier::NeedsPractice,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PerformanceTier::Excellent => "Excellent",
            PerformanceTier::Good => "Good",
            PerformanceTier::NeedsPractice => "Needs Practice",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionReview {
    pub question_index: usize,
    pub question: String,
    pub selected_option_index: Option<usize>,
    pub selected_option: Option<QuizOption>,
    pub correct_option_index: Option<usize>,
    pub correct_option: Option<QuizOption>,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    pub correct_count: u32,
    pub answered_count: u32,
    pub total_questions: u32,
    pub percentage: u32,
    pub performance: PerformanceTier,
    pub review: Vec<QuestionReview>,
}

/// Scores a finished attempt.
///
/// Unanswered questions count against the percentage. Only the first answer
/// recorded for a question index is considered; answers pointing outside the
/// question list are ignored.
pub fn score_attempt(questions: &[QuizQuestion], answers: &[UserAnswer]) -> ScoreReport {
    let review: Vec<QuestionReview> = questions
        .iter()
        .enumerate()
        .map(|(question_index, question)| {
            let selected_option_index = answers
                .iter()
                .find(|a| a.question_index == question_index)
                .map(|a| a.selected_option_index);
            let selected_option = selected_option_index.and_then(|i| question.option(i)).cloned();
            let correct_option_index = question.correct_option_index();
            let correct_option = correct_option_index.and_then(|i| question.option(i)).cloned();
            let is_correct = selected_option.as_ref().map_or(false, |o| o.is_correct);

            QuestionReview {
                question_index,
                question: question.question.clone(),
                selected_option_index,
                selected_option,
                correct_option_index,
                correct_option,
                is_correct,
            }
        })
        .collect();

    let total_questions = questions.len() as u32;
    let correct_count = review.iter().filter(|r| r.is_correct).count() as u32;
    let answered_count = review
        .iter()
        .filter(|r| r.selected_option_index.is_some())
        .count() as u32;
    let percentage = round_percentage(correct_count, total_questions);

    ScoreReport {
        correct_count,
        answered_count,
        total_questions,
        percentage,
        performance: PerformanceTier::for_percentage(percentage),
        review,
    }
}

/// `round(correct / total * 100)` with halves rounded up, in integers.
fn round_percentage(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let scaled = u64::from(correct) * 100;
    let total = u64::from(total);
    ((scaled * 2 + total) / (total * 2)) as u32
}

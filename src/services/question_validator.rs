use crate::models::question::{QuizOption, QuizQuestion, OPTIONS_PER_QUESTION};
use serde_json::{Map, Value as JsonValue};

const OPTION_LETTERS: [&str; OPTIONS_PER_QUESTION] = ["A", "B", "C", "D"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuestionValidationError {
    #[error("response has no `questions` array")]
    MissingQuestions,

    #[error("question {index}: expected an object")]
    NotAnObject { index: usize },

    #[error("question {index}: `question` must be non-empty text")]
    MissingQuestionText { index: usize },

    #[error("question {index}: `options` must be an array")]
    MissingOptions { index: usize },

    #[error("question {index}: expected exactly 4 options, found {found}")]
    WrongOptionCount { index: usize, found: usize },

    #[error("question {index}, option {option}: `text` must be non-empty text")]
    MissingOptionText { index: usize, option: usize },

    #[error("question {index}, option {option}: `isCorrect` must be a boolean")]
    MissingCorrectFlag { index: usize, option: usize },

    #[error("question {index}: expected exactly one correct option, found {found}")]
    WrongCorrectCount { index: usize, found: usize },
}

/// Validates a parsed model reply and converts it into questions.
///
/// The batch is all-or-nothing: the first violation rejects every question.
/// Questions written in the lettered form (`options` keyed `A`..`D` plus a
/// `correctAnswer` letter) are normalized before the checks run.
pub fn validate_batch(raw: &JsonValue) -> Result<Vec<QuizQuestion>, QuestionValidationError> {
    let items = raw
        .get("questions")
        .and_then(|q| q.as_array())
        .ok_or(QuestionValidationError::MissingQuestions)?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| validate_item(index, item))
        .collect()
}

/// Re-checks an already typed question against the same rules.
pub fn validate_question(index: usize, question: &QuizQuestion) -> Result<(), QuestionValidationError> {
    if question.question.trim().is_empty() {
        return Err(QuestionValidationError::MissingQuestionText { index });
    }
    if question.options.len() != OPTIONS_PER_QUESTION {
        return Err(QuestionValidationError::WrongOptionCount {
            index,
            found: question.options.len(),
        });
    }
    if let Some(option) = question.options.iter().position(|o| o.text.trim().is_empty()) {
        return Err(QuestionValidationError::MissingOptionText { index, option });
    }
    let found = question.options.iter().filter(|o| o.is_correct).count();
    if found != 1 {
        return Err(QuestionValidationError::WrongCorrectCount { index, found });
    }
    Ok(())
}

fn validate_item(index: usize, item: &JsonValue) -> Result<QuizQuestion, QuestionValidationError> {
    let obj = item
        .as_object()
        .ok_or(QuestionValidationError::NotAnObject { index })?;

    let question = obj
        .get("question")
        .and_then(|q| q.as_str())
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or(QuestionValidationError::MissingQuestionText { index })?
        .to_string();

    let options = match obj.get("options") {
        Some(JsonValue::Array(entries)) => parse_option_array(index, entries)?,
        Some(JsonValue::Object(lettered)) => parse_lettered_options(index, lettered, obj)?,
        _ => return Err(QuestionValidationError::MissingOptions { index }),
    };

    let parsed = QuizQuestion { question, options };
    validate_question(index, &parsed)?;
    Ok(parsed)
}

fn parse_option_array(
    index: usize,
    entries: &[JsonValue],
) -> Result<Vec<QuizOption>, QuestionValidationError> {
    if entries.len() != OPTIONS_PER_QUESTION {
        return Err(QuestionValidationError::WrongOptionCount {
            index,
            found: entries.len(),
        });
    }

    entries
        .iter()
        .enumerate()
        .map(|(option, entry)| -> Result<QuizOption, QuestionValidationError> {
            let text = entry
                .get("text")
                .and_then(|t| t.as_str())
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .ok_or(QuestionValidationError::MissingOptionText { index, option })?;
            let is_correct = entry
                .get("isCorrect")
                .and_then(|c| c.as_bool())
                .ok_or(QuestionValidationError::MissingCorrectFlag { index, option })?;
            Ok(QuizOption {
                text: text.to_string(),
                is_correct,
            })
        })
        .collect()
}

fn parse_lettered_options(
    index: usize,
    lettered: &Map<String, JsonValue>,
    question: &Map<String, JsonValue>,
) -> Result<Vec<QuizOption>, QuestionValidationError> {
    if lettered.len() != OPTIONS_PER_QUESTION {
        return Err(QuestionValidationError::WrongOptionCount {
            index,
            found: lettered.len(),
        });
    }

    let correct_letter = question
        .get("correctAnswer")
        .and_then(|c| c.as_str())
        .map(|c| c.trim().to_ascii_uppercase());

    OPTION_LETTERS
        .iter()
        .enumerate()
        .map(|(option, letter)| -> Result<QuizOption, QuestionValidationError> {
            let text = lettered
                .get(*letter)
                .and_then(|t| t.as_str())
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .ok_or(QuestionValidationError::MissingOptionText { index, option })?;
            Ok(QuizOption {
                text: text.to_string(),
                is_correct: correct_letter.as_deref() == Some(*letter),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn option(text: &str, correct: bool) -> JsonValue {
        json!({ "text": text, "isCorrect": correct })
    }

    fn good_question(n: usize) -> JsonValue {
        json!({
            "question": format!("Question {}", n),
            "options": [
                option("a", false),
                option("b", true),
                option("c", false),
                option("d", false),
            ]
        })
    }

    #[test]
    fn accepts_single_correct_option_per_question() {
        let raw = json!({ "questions": [good_question(1), good_question(2)] });
        let questions = validate_batch(&raw).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[1].correct_option_index(), Some(1));
    }

    #[test]
    fn rejects_missing_questions_array() {
        assert_eq!(
            validate_batch(&json!({ "items": [] })),
            Err(QuestionValidationError::MissingQuestions)
        );
    }

    #[test]
    fn rejects_zero_correct_options_with_index() {
        let mut bad = good_question(2);
        bad["options"][1]["isCorrect"] = json!(false);
        let raw = json!({ "questions": [good_question(1), bad] });
        assert_eq!(
            validate_batch(&raw),
            Err(QuestionValidationError::WrongCorrectCount { index: 1, found: 0 })
        );
    }

    #[test]
    fn rejects_two_correct_options_and_whole_batch() {
        let mut bad = good_question(1);
        bad["options"][3]["isCorrect"] = json!(true);
        let raw = json!({ "questions": [bad, good_question(2)] });
        assert_eq!(
            validate_batch(&raw),
            Err(QuestionValidationError::WrongCorrectCount { index: 0, found: 2 })
        );
    }

    #[test]
    fn rejects_wrong_option_count() {
        let raw = json!({
            "questions": [{
                "question": "Too few",
                "options": [option("a", true), option("b", false), option("c", false)]
            }]
        });
        assert_eq!(
            validate_batch(&raw),
            Err(QuestionValidationError::WrongOptionCount { index: 0, found: 3 })
        );
    }

    #[test]
    fn rejects_missing_flag_naming_option() {
        let mut bad = good_question(1);
        bad["options"][2] = json!({ "text": "c" });
        let raw = json!({ "questions": [bad] });
        assert_eq!(
            validate_batch(&raw),
            Err(QuestionValidationError::MissingCorrectFlag { index: 0, option: 2 })
        );
    }

    #[test]
    fn rejects_blank_question_text() {
        let mut bad = good_question(1);
        bad["question"] = json!("   ");
        let raw = json!({ "questions": [bad] });
        assert_eq!(
            validate_batch(&raw),
            Err(QuestionValidationError::MissingQuestionText { index: 0 })
        );
    }

    #[test]
    fn normalizes_lettered_options() {
        let raw = json!({
            "questions": [{
                "question": "What does HDL stand for?",
                "options": {
                    "A": "Hardware Description Language",
                    "B": "High Density Logic",
                    "C": "Hard Drive Layout",
                    "D": "Hybrid Digital Loop"
                },
                "correctAnswer": "a"
            }]
        });
        let questions = validate_batch(&raw).unwrap();
        assert_eq!(questions[0].correct_option_index(), Some(0));
        assert_eq!(questions[0].options[3].text, "Hybrid Digital Loop");
    }

    #[test]
    fn lettered_options_without_answer_are_rejected() {
        let raw = json!({
            "questions": [{
                "question": "q",
                "options": { "A": "1", "B": "2", "C": "3", "D": "4" }
            }]
        });
        assert_eq!(
            validate_batch(&raw),
            Err(QuestionValidationError::WrongCorrectCount { index: 0, found: 0 })
        );
    }
}

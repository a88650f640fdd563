use crate::error::{Error, Result};
use crate::models::question::QuizQuestion;
use crate::models::quiz_config::{Category, MAX_QUESTION_COUNT, MIN_QUESTION_COUNT};
use crate::services::completion_client::{ChatMessage, ChatRequest, CompletionClient};
use crate::services::question_validator::validate_batch;
use crate::utils::fence::strip_code_fence;
use serde_json::Value as JsonValue;
use std::sync::Arc;

const SYSTEM_PROMPT: &str = "You are an exam author for electronics and hardware-design students. \
You write precise multiple-choice questions and you reply with a single JSON object only. \
Never wrap the JSON in markdown fences and never add commentary before or after it.";

#[derive(Clone)]
pub struct GenerationService {
    client: Arc<dyn CompletionClient>,
    model: String,
}

impl GenerationService {
    pub fn new(client: Arc<dyn CompletionClient>, model: String) -> Self {
        Self { client, model }
    }

    /// Asks the model for `count` fresh questions about `category`.
    ///
    /// One upstream call per invocation; nothing is cached or retried.
    pub async fn generate(&self, category: Category, count: u32) -> Result<Vec<QuizQuestion>> {
        check_question_count(count)?;

        tracing::info!(%category, count, "Requesting quiz questions");
        let request = self.build_request(category, count);
        let raw = self.client.complete(request).await?;

        let questions = parse_questions(&raw, count as usize)?;
        tracing::info!(%category, count = questions.len(), "Quiz questions generated");
        Ok(questions)
    }

    pub fn build_request(&self, category: Category, count: u32) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(question_prompt(category, count)),
            ],
            temperature: Some(0.7),
        }
    }
}

pub fn check_question_count(count: u32) -> Result<()> {
    if !(MIN_QUESTION_COUNT..=MAX_QUESTION_COUNT).contains(&count) {
        return Err(Error::BadRequest(format!(
            "questionCount must be between {} and {}, got {}",
            MIN_QUESTION_COUNT, MAX_QUESTION_COUNT, count
        )));
    }
    Ok(())
}

fn question_prompt(category: Category, count: u32) -> String {
    let schema = serde_json::json!({
        "questions": [{
            "question": "text",
            "options": [
                { "text": "option text", "isCorrect": false },
                { "text": "option text", "isCorrect": true },
                { "text": "option text", "isCorrect": false },
                { "text": "option text", "isCorrect": false }
            ]
        }]
    });

    format!(
        "Generate exactly {count} multiple-choice quiz questions about {label} ({description}). \
Each question must have exactly 4 options and exactly one option with \"isCorrect\": true. \
Vary the position of the correct option between questions. \
Respond ONLY with valid JSON in this exact format: {schema}",
        count = count,
        label = category.label(),
        description = category.description(),
        schema = schema,
    )
}

/// Turns a raw model reply into exactly `expected` validated questions.
///
/// Extra questions beyond `expected` are dropped after the whole batch has
/// validated; a short batch is an error.
pub fn parse_questions(raw: &str, expected: usize) -> Result<Vec<QuizQuestion>> {
    let cleaned = strip_code_fence(raw);
    let value: JsonValue = serde_json::from_str(cleaned).map_err(|e| {
        tracing::warn!(error = %e, "Model reply is not valid JSON");
        Error::Generation(format!("Model reply is not valid JSON: {}", e))
    })?;

    let mut questions = validate_batch(&value).map_err(|e| {
        tracing::warn!(error = %e, "Model reply failed question validation");
        Error::Generation(format!("Model reply failed validation: {}", e))
    })?;

    if questions.len() < expected {
        return Err(Error::Generation(format!(
            "Model returned {} questions, expected {}",
            questions.len(),
            expected
        )));
    }
    questions.truncate(expected);
    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::completion_client::MockCompletionClient;
    use serde_json::json;

    fn reply_with(count: usize) -> String {
        let questions: Vec<JsonValue> = (0..count)
            .map(|i| {
                json!({
                    "question": format!("Q{}", i),
                    "options": [
                        { "text": "a", "isCorrect": i % 4 == 0 },
                        { "text": "b", "isCorrect": i % 4 == 1 },
                        { "text": "c", "isCorrect": i % 4 == 2 },
                        { "text": "d", "isCorrect": i % 4 == 3 }
                    ]
                })
            })
            .collect();
        json!({ "questions": questions }).to_string()
    }

    fn service(mock: MockCompletionClient) -> GenerationService {
        GenerationService::new(Arc::new(mock), "test-model".into())
    }

    #[test]
    fn prompt_states_count_and_option_rules() {
        let svc = service(MockCompletionClient::new());
        let req = svc.build_request(Category::Verilog, 7);
        assert_eq!(req.model, "test-model");
        assert_eq!(req.messages.len(), 2);
        let user = &req.messages[1].content;
        assert!(user.contains("exactly 7"));
        assert!(user.contains("exactly 4 options"));
        assert!(user.contains("Verilog"));
        assert!(req.messages[0].content.contains("JSON"));
    }

    #[test]
    fn fenced_reply_parses_like_plain_reply() {
        let plain = reply_with(5);
        let fenced = format!("```json\n{}\n```", plain);
        assert_eq!(
            parse_questions(&plain, 5).unwrap(),
            parse_questions(&fenced, 5).unwrap()
        );
    }

    #[test]
    fn non_json_reply_is_generation_error() {
        let err = parse_questions("Sure! Here are your questions.", 5).unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
    }

    #[test]
    fn short_batch_is_rejected_and_long_batch_trimmed() {
        assert!(matches!(
            parse_questions(&reply_with(4), 5),
            Err(Error::Generation(_))
        ));
        assert_eq!(parse_questions(&reply_with(8), 5).unwrap().len(), 5);
    }

    #[test]
    fn invalid_question_names_index() {
        let mut value: JsonValue = serde_json::from_str(&reply_with(5)).unwrap();
        value["questions"][3]["options"][0]["isCorrect"] = json!(true);
        value["questions"][3]["options"][3]["isCorrect"] = json!(true);
        let err = parse_questions(&value.to_string(), 5).unwrap_err();
        match err {
            Error::Generation(msg) => assert!(msg.contains("question 3"), "{}", msg),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn out_of_range_count_never_reaches_upstream() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete().never();
        let svc = service(mock);
        assert!(matches!(
            svc.generate(Category::Vlsi, 4).await,
            Err(Error::BadRequest(_))
        ));
        assert!(matches!(
            svc.generate(Category::Vlsi, 21).await,
            Err(Error::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn every_supported_count_yields_that_many_questions() {
        for count in MIN_QUESTION_COUNT..=MAX_QUESTION_COUNT {
            let mut mock = MockCompletionClient::new();
            mock.expect_complete()
                .times(1)
                .returning(move |_| Ok(reply_with(count as usize)));
            let questions = service(mock)
                .generate(Category::DigitalElectronics, count)
                .await
                .unwrap();
            assert_eq!(questions.len(), count as usize);
            assert!(questions.iter().all(|q| q.options.len() == 4));
        }
    }

    #[tokio::test]
    async fn upstream_errors_pass_through() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete().times(1).returning(|_| {
            Err(Error::Upstream {
                status: 500,
                body: "boom".into(),
            })
        });
        let err = service(mock).generate(Category::Vlsi, 5).await.unwrap_err();
        assert!(matches!(err, Error::Upstream { status: 500, .. }));
    }

    #[tokio::test]
    async fn repeated_calls_always_hit_upstream() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete()
            .times(2)
            .returning(|_| Ok(reply_with(5)));
        let svc = service(mock);
        svc.generate(Category::Vlsi, 5).await.unwrap();
        svc.generate(Category::Vlsi, 5).await.unwrap();
    }
}

use crate::config::Config;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

/// Longest slice of an upstream error body kept in errors and logs.
const BODY_EXCERPT_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Single-turn chat completion against the external model API.
///
/// Implementations return the raw text of the first choice; interpreting it
/// is the caller's job.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: ChatRequest) -> Result<String>;
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Clone)]
pub struct OpenRouterClient {
    client: Client,
    api_key: Option<String>,
    endpoint: Url,
    referer: String,
    title: String,
}

impl OpenRouterClient {
    pub fn new(
        client: Client,
        api_key: Option<String>,
        endpoint: Url,
        referer: String,
        title: String,
    ) -> Self {
        Self {
            client,
            api_key,
            endpoint,
            referer,
            title,
        }
    }

    pub fn from_config(config: &Config, client: Client) -> Result<Self> {
        Ok(Self::new(
            client,
            config.openrouter_api_key.clone(),
            config.completions_url()?,
            config.app_referer.clone(),
            config.app_title.clone(),
        ))
    }
}

#[async_trait]
impl CompletionClient for OpenRouterClient {
    async fn complete(&self, request: ChatRequest) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Config("OPENROUTER_API_KEY is not set".to_string()))?;

        tracing::info!(model = %request.model, "Sending chat completion request");
        let res = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title)
            .json(&request)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let text = match res.text().await {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(status = status.as_u16(), error = %e, "Could not read model API error body");
                    String::new()
                }
            };
            let body = excerpt(&text);
            tracing::error!(status = status.as_u16(), body = %body, "Model API returned an error");
            return Err(Error::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let text = res.text().await?;
        let parsed: CompletionResponse = serde_json::from_str(&text).map_err(|e| {
            tracing::error!(error = %e, body = %excerpt(&text), "Unreadable completion body");
            Error::Generation(format!("Model API returned an unreadable body: {}", e))
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| Error::Generation("Model API returned no message content".to_string()))
    }
}

fn excerpt(text: &str) -> String {
    let mut out: String = text.chars().take(BODY_EXCERPT_CHARS).collect();
    if text.chars().nth(BODY_EXCERPT_CHARS).is_some() {
        out.push_str("...");
    }
    out
}

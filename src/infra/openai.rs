use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use serde::{Deserialize, Serialize};

use crate::domain::prompt::{CompletionResult, PromptRequest};
use crate::error::{AppError, AppResult};
use crate::services::CompletionService;

pub struct OpenAiClient {
    http: Client,
    api_key: Option<String>,
    model: String,
    endpoint: String,
}

impl OpenAiClient {
    pub fn new(
        api_key: Option<String>,
        model: String,
        endpoint: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AppError::Configuration(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            http,
            api_key,
            model,
            endpoint,
        })
    }

    fn api_key(&self) -> AppResult<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| AppError::Configuration("OpenAI API key not configured".to_string()))
    }
}

fn validate(request: &PromptRequest) -> AppResult<()> {
    if request.last_comment.trim().is_empty() {
        return Err(AppError::Validation("last comment is empty".to_string()));
    }
    if request.draft_text.trim().is_empty() {
        return Err(AppError::Validation("draft text is empty".to_string()));
    }
    Ok(())
}

#[async_trait]
impl CompletionService for OpenAiClient {
    async fn request_completion(&self, request: &PromptRequest) -> AppResult<CompletionResult> {
        let api_key = self.api_key()?;
        validate(request)?;

        let body = ChatCompletionRequest::new(&self.model, request);

        tracing::debug!(
            endpoint = %self.endpoint,
            model = %self.model,
            action = request.action.as_str(),
            "requesting completion"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("Bearer {api_key}"))
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|err| AppError::Network(format!("failed to call completion API: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            tracing::warn!(status = status.as_u16(), "completion request failed");
            return Err(AppError::CompletionRequest(format!(
                "completion API responded with {status}: {body}"
            )));
        }

        let payload: ChatCompletionResponse = response.json().await.map_err(|err| {
            AppError::CompletionRequest(format!("failed to parse completion response: {err}"))
        })?;

        let content = payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content);

        Ok(CompletionResult::sanitize(content.as_deref()))
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

impl<'a> ChatCompletionRequest<'a> {
    fn new(model: &'a str, request: &PromptRequest) -> Self {
        let messages = request
            .messages()
            .into_iter()
            .map(|message| ChatMessage {
                role: message.role.as_str(),
                content: message.content,
            })
            .collect();
        Self { model, messages }
    }
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

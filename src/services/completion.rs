use async_trait::async_trait;

use crate::domain::prompt::{CompletionResult, PromptRequest};
use crate::error::AppResult;

#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn request_completion(&self, request: &PromptRequest) -> AppResult<CompletionResult>;
}

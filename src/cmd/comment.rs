use crate::context::AppContext;
use crate::domain::comment::LatestComment;
use crate::error::AppResult;
use crate::workflow::reply::{CommentOutcome, load_latest_comment};
use crate::workflow::session::ReplySession;

#[derive(Debug, Clone)]
pub struct CommentCommandArgs {
    pub ticket: Option<String>,
}

pub async fn run(ctx: &AppContext, args: CommentCommandArgs) -> AppResult<String> {
    let session = ReplySession::new();
    session
        .run(async {
            load_latest_comment(ctx, args.ticket.as_deref())
                .await
                .map(|outcome| render(&outcome))
        })
        .await?;
    session.into_result()
}

pub fn render(outcome: &CommentOutcome) -> String {
    match &outcome.latest {
        LatestComment::Found(comment) => comment.body.clone(),
        LatestComment::NoComments => format!("Ticket {} has no comments.", outcome.ticket),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::config::{AppConfig, StoredConfig};
    use crate::domain::prompt::{CompletionResult, PromptRequest};
    use crate::domain::ticket::TicketId;
    use crate::error::AppError;
    use crate::services::page_url::StaticPageUrl;
    use crate::services::{CompletionService, HelpdeskService};

    struct EmptyTicket;

    #[async_trait]
    impl HelpdeskService for EmptyTicket {
        async fn fetch_latest_comment(&self, _ticket: &TicketId) -> AppResult<LatestComment> {
            Ok(LatestComment::NoComments)
        }
    }

    struct Unused;

    #[async_trait]
    impl CompletionService for Unused {
        async fn request_completion(
            &self,
            _request: &PromptRequest,
        ) -> AppResult<CompletionResult> {
            Err(AppError::CompletionRequest("not expected".to_string()))
        }
    }

    fn context() -> AppContext {
        AppContext::new(
            AppConfig::from_sources(StoredConfig::default(), |_| None),
            Arc::new(EmptyTicket),
            Arc::new(Unused),
            Arc::new(StaticPageUrl(None)),
        )
    }

    #[tokio::test]
    async fn reports_tickets_without_comments() {
        let text = run(&context(), CommentCommandArgs {
            ticket: Some("https://acme.zendesk.com/agent/tickets/4521".to_string()),
        })
        .await
        .expect("comment");
        assert_eq!(text, "Ticket 4521 has no comments.");
    }

    #[tokio::test]
    async fn surfaces_resolution_failures() {
        let error = run(&context(), CommentCommandArgs { ticket: None })
            .await
            .expect_err("should fail");
        assert!(matches!(error, AppError::Validation(_)));
    }
}

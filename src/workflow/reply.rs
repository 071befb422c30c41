use crate::context::AppContext;
use crate::domain::comment::LatestComment;
use crate::domain::prompt::{ActionKind, CompletionResult, PromptRequest};
use crate::domain::ticket::TicketId;
use crate::error::{AppError, AppResult};

pub struct CommentOutcome {
    pub ticket: TicketId,
    pub latest: LatestComment,
}

/// Picks the ticket from explicit input, falling back to the current page URL.
pub fn resolve_ticket(ctx: &AppContext, input: Option<&str>) -> AppResult<TicketId> {
    if let Some(raw) = input.map(str::trim).filter(|raw| !raw.is_empty()) {
        return TicketId::resolve(raw)
            .ok_or_else(|| AppError::Validation(format!("invalid ticket reference: {raw}")));
    }

    let url = ctx.page_url.current_url().ok_or_else(|| {
        AppError::Validation(
            "no ticket reference given and no current page URL available".to_string(),
        )
    })?;
    tracing::debug!(%url, "resolving ticket from current page");
    TicketId::resolve(&url)
        .ok_or_else(|| AppError::Validation(format!("current page is not a ticket: {url}")))
}

pub async fn load_latest_comment(
    ctx: &AppContext,
    input: Option<&str>,
) -> AppResult<CommentOutcome> {
    let ticket = resolve_ticket(ctx, input)?;
    let latest = ctx.helpdesk.fetch_latest_comment(&ticket).await?;
    if let LatestComment::Found(comment) = &latest {
        tracing::debug!(
            %ticket,
            created_at = ?comment.created_at,
            has_html = comment.html_body.is_some(),
            "loaded latest comment"
        );
    }
    Ok(CommentOutcome { ticket, latest })
}

pub async fn rewrite_draft(
    ctx: &AppContext,
    action: ActionKind,
    last_comment: &str,
    draft: &str,
) -> AppResult<CompletionResult> {
    let request = PromptRequest::new(action, last_comment, draft);
    tracing::debug!(
        model = %ctx.config.openai_model,
        action = request.action.as_str(),
        "rewriting draft"
    );
    ctx.completion.request_completion(&request).await
}

/// Fetches the newest comment on the ticket and rewrites the draft against it.
pub async fn rewrite_for_ticket(
    ctx: &AppContext,
    action: ActionKind,
    ticket_input: Option<&str>,
    draft: &str,
) -> AppResult<CompletionResult> {
    let outcome = load_latest_comment(ctx, ticket_input).await?;
    let comment = match outcome.latest {
        LatestComment::Found(comment) => comment,
        LatestComment::NoComments => {
            return Err(AppError::Validation(format!(
                "ticket {} has no comments to reply to",
                outcome.ticket
            )));
        }
    };
    rewrite_draft(ctx, action, &comment.body, draft).await
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::config::{AppConfig, StoredConfig};
    use crate::domain::comment::Comment;
    use crate::services::page_url::StaticPageUrl;
    use crate::services::{CompletionService, HelpdeskService};

    struct FakeHelpdesk {
        latest: LatestComment,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl HelpdeskService for FakeHelpdesk {
        async fn fetch_latest_comment(&self, ticket: &TicketId) -> AppResult<LatestComment> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(ticket.as_str(), "4521");
            Ok(self.latest.clone())
        }
    }

    #[derive(Default)]
    struct FakeCompletion {
        requests: Mutex<Vec<PromptRequest>>,
    }

    #[async_trait]
    impl CompletionService for FakeCompletion {
        async fn request_completion(
            &self,
            request: &PromptRequest,
        ) -> AppResult<CompletionResult> {
            self.requests
                .lock()
                .expect("requests lock")
                .push(request.clone());
            Ok(CompletionResult::sanitize(Some(
                "Summary:\nWe are fixing it and will update you soon.",
            )))
        }
    }

    fn context(
        latest: LatestComment,
        page_url: Option<&str>,
    ) -> (AppContext, Arc<FakeHelpdesk>, Arc<FakeCompletion>) {
        let helpdesk = Arc::new(FakeHelpdesk {
            latest,
            calls: AtomicUsize::new(0),
        });
        let completion = Arc::new(FakeCompletion::default());
        let config = AppConfig::from_sources(StoredConfig::default(), |_| None);
        let ctx = AppContext::new(
            config,
            helpdesk.clone(),
            completion.clone(),
            Arc::new(StaticPageUrl(page_url.map(str::to_string))),
        );
        (ctx, helpdesk, completion)
    }

    fn found(body: &str) -> LatestComment {
        LatestComment::Found(Comment {
            body: body.to_string(),
            html_body: None,
            created_at: None,
        })
    }

    #[test]
    fn explicit_input_wins_over_page_url() {
        let (ctx, _, _) = context(LatestComment::NoComments, Some("https://x.test/tickets/1"));
        assert_eq!(
            resolve_ticket(&ctx, Some("https://acme.zendesk.com/agent/tickets/4521"))
                .expect("ticket")
                .as_str(),
            "4521"
        );
    }

    #[test]
    fn falls_back_to_page_url() {
        let (ctx, _, _) = context(
            LatestComment::NoComments,
            Some("https://acme.zendesk.com/agent/tickets/4521"),
        );
        assert_eq!(resolve_ticket(&ctx, Some("  ")).expect("ticket").as_str(), "4521");
    }

    #[test]
    fn missing_or_unusable_references_are_validation_errors() {
        let (ctx, _, _) = context(LatestComment::NoComments, None);
        assert!(matches!(
            resolve_ticket(&ctx, None),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            resolve_ticket(&ctx, Some("not-a-ticket")),
            Err(AppError::Validation(_))
        ));

        let (ctx, _, _) = context(LatestComment::NoComments, Some("https://acme.test/home"));
        assert!(matches!(
            resolve_ticket(&ctx, None),
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn invalid_reference_skips_the_helpdesk() {
        let (ctx, helpdesk, _) = context(found("unused"), None);
        assert!(load_latest_comment(&ctx, Some("abc")).await.is_err());
        assert_eq!(helpdesk.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn rewrites_against_latest_comment() {
        let (ctx, helpdesk, completion) = context(found("Thanks for the update"), None);

        let result = rewrite_for_ticket(
            &ctx,
            ActionKind::Concise,
            Some("https://acme.zendesk.com/agent/tickets/4521"),
            "We will fix it soon and let you know",
        )
        .await
        .expect("rewrite");

        assert_eq!(result.as_str(), "We are fixing it and will update you soon.");
        assert_eq!(helpdesk.calls.load(Ordering::SeqCst), 1);
        let requests = completion.requests.lock().expect("requests lock");
        assert_eq!(
            requests[0],
            PromptRequest::new(
                ActionKind::Concise,
                "Thanks for the update",
                "We will fix it soon and let you know",
            )
        );
    }

    #[tokio::test]
    async fn ticket_without_comments_cannot_be_rewritten() {
        let (ctx, _, completion) = context(LatestComment::NoComments, None);
        let error = rewrite_for_ticket(&ctx, ActionKind::Rephrase, Some("4521"), "Draft")
            .await
            .expect_err("should fail");
        assert!(matches!(error, AppError::Validation(_)));
        assert!(completion.requests.lock().expect("requests lock").is_empty());
    }
}

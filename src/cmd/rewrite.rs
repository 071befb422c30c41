use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use crate::context::AppContext;
use crate::domain::prompt::ActionKind;
use crate::error::AppResult;
use crate::workflow::reply::{rewrite_draft, rewrite_for_ticket};
use crate::workflow::session::ReplySession;

#[derive(Debug, Clone)]
pub struct RewriteCommandArgs {
    pub action: String,
    pub ticket: Option<String>,
    pub comment: Option<String>,
    pub draft: Option<String>,
    pub draft_file: Option<PathBuf>,
}

pub async fn run(ctx: &AppContext, args: RewriteCommandArgs) -> AppResult<String> {
    let RewriteCommandArgs {
        action,
        ticket,
        comment,
        draft,
        draft_file,
    } = args;
    let draft = read_draft(draft, draft_file)?;
    let action = ActionKind::parse(&action);
    if let ActionKind::Other(name) = &action {
        tracing::info!(action = %name, "unknown action kind, using polish instruction");
    }

    let session = ReplySession::new();
    session
        .run(async {
            let result = match comment.as_deref() {
                Some(comment) => rewrite_draft(ctx, action, comment, &draft).await,
                None => rewrite_for_ticket(ctx, action, ticket.as_deref(), &draft).await,
            };
            result.map(|completion| completion.as_str().to_string())
        })
        .await?;
    tracing::debug!(output = ?session.display_text(), "rewrite settled");

    session.into_result()
}

fn read_draft(inline: Option<String>, file: Option<PathBuf>) -> AppResult<String> {
    if let Some(text) = inline {
        return Ok(text);
    }
    if let Some(path) = file {
        return Ok(fs::read_to_string(path)?);
    }
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

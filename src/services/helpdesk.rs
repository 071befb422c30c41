use async_trait::async_trait;

use crate::domain::comment::LatestComment;
use crate::domain::ticket::TicketId;
use crate::error::AppResult;

#[async_trait]
pub trait HelpdeskService: Send + Sync {
    async fn fetch_latest_comment(&self, ticket: &TicketId) -> AppResult<LatestComment>;
}

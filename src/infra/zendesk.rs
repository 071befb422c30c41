use std::time::Duration;

use async_trait::async_trait;
use base64::prelude::{BASE64_STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use reqwest::{
    Client,
    header::{ACCEPT, AUTHORIZATION},
};
use serde::Deserialize;

use crate::config::Credentials;
use crate::domain::comment::{Comment, LatestComment};
use crate::domain::ticket::TicketId;
use crate::error::{AppError, AppResult};
use crate::services::HelpdeskService;

pub struct ZendeskClient {
    http: Client,
    credentials: Credentials,
    base_url: Option<String>,
}

impl ZendeskClient {
    pub fn new(
        credentials: Credentials,
        base_url: Option<String>,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AppError::Configuration(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            http,
            credentials,
            base_url,
        })
    }

    fn api_details(&self) -> AppResult<(&str, &str, &str)> {
        let subdomain = required(&self.credentials.subdomain, "helpdesk subdomain")?;
        let email = required(&self.credentials.email, "helpdesk email")?;
        let token = required(&self.credentials.api_token, "helpdesk API token")?;
        Ok((subdomain, email, token))
    }

    fn auth_header(email: &str, token: &str) -> AppResult<String> {
        if !email.is_ascii() || !token.is_ascii() {
            return Err(AppError::Configuration(
                "helpdesk email and API token must be ASCII".to_string(),
            ));
        }
        let credentials = format!("{email}/token:{token}");
        let encoded = BASE64_STANDARD.encode(credentials);
        Ok(format!("Basic {encoded}"))
    }

    fn comments_endpoint(&self, subdomain: &str, ticket: &TicketId) -> String {
        let base = match self.base_url.as_deref() {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{subdomain}.zendesk.com"),
        };
        format!("{base}/api/v2/tickets/{ticket}/comments.json")
    }
}

fn required<'a>(value: &'a Option<String>, field: &str) -> AppResult<&'a str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Configuration(format!("{field} not configured")))
}

#[async_trait]
impl HelpdeskService for ZendeskClient {
    async fn fetch_latest_comment(&self, ticket: &TicketId) -> AppResult<LatestComment> {
        let (subdomain, email, token) = self.api_details()?;
        let auth = Self::auth_header(email, token)?;
        let endpoint = self.comments_endpoint(subdomain, ticket);

        tracing::debug!(%ticket, %endpoint, "fetching latest helpdesk comment");

        let response = self
            .http
            .get(&endpoint)
            .query(&[("sort", "-created_at"), ("page[size]", "1")])
            .header(AUTHORIZATION, auth)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| AppError::Network(format!("failed to call helpdesk: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            tracing::warn!(%ticket, status = status.as_u16(), "helpdesk request failed");
            return Err(AppError::HelpdeskApi {
                status: status.as_u16(),
                body,
            });
        }

        let payload: CommentsResponse = response.json().await.map_err(|err| AppError::HelpdeskApi {
            status: status.as_u16(),
            body: format!("failed to parse helpdesk response: {err}"),
        })?;

        let latest = payload
            .comments
            .into_iter()
            .next()
            .and_then(|raw| Comment::from_parts(raw.body, raw.html_body, raw.created_at));

        Ok(match latest {
            Some(comment) => LatestComment::Found(comment),
            None => {
                tracing::debug!(%ticket, "ticket has no usable comments");
                LatestComment::NoComments
            }
        })
    }
}

#[derive(Deserialize)]
struct CommentsResponse {
    #[serde(default)]
    comments: Vec<RawComment>,
}

#[derive(Deserialize)]
struct RawComment {
    body: Option<String>,
    html_body: Option<String>,
    created_at: Option<DateTime<Utc>>,
}

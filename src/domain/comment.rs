use chrono::{DateTime, Utc};
use scraper::Html;

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub body: String,
    pub html_body: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Comment {
    /// Builds a comment from raw API fields, preferring the plain body.
    ///
    /// `html_body` is only consulted when `body` is missing or empty, and its
    /// visible text content is used. Returns `None` when no text survives
    /// trimming.
    pub fn from_parts(
        body: Option<String>,
        html_body: Option<String>,
        created_at: Option<DateTime<Utc>>,
    ) -> Option<Self> {
        let text = match body.as_deref().filter(|b| !b.is_empty()) {
            Some(plain) => plain.trim().to_string(),
            None => html_body
                .as_deref()
                .map(html_text_content)
                .unwrap_or_default(),
        };

        if text.is_empty() {
            return None;
        }

        Some(Self {
            body: text,
            html_body,
            created_at,
        })
    }
}

/// Visible text of a markup fragment, trimmed.
pub fn html_text_content(markup: &str) -> String {
    let fragment = Html::parse_fragment(markup);
    fragment
        .root_element()
        .text()
        .collect::<String>()
        .trim()
        .to_string()
}

/// Outcome of a latest-comment lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum LatestComment {
    Found(Comment),
    NoComments,
}

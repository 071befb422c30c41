use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static TICKET_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|/)tickets/([0-9]+)").expect("ticket path pattern is valid")
});

/// Numeric helpdesk ticket identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketId(pub String);

impl TicketId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extracts a ticket id from a ticket URL or a bare digit string.
    ///
    /// A `tickets/<digits>` path segment anywhere in the input wins over the
    /// bare-digit form. Anything else resolves to `None`.
    pub fn resolve(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }

        if let Some(captures) = TICKET_PATH.captures(trimmed) {
            return captures.get(1).map(|m| Self(m.as_str().to_string()));
        }

        if trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Some(Self(trimmed.to_string()));
        }

        None
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
